use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::services::entry_status_service::{self, ApplyPageView, ApplyQuery};
use crate::web::render;
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "apply.html")]
pub struct ApplyTemplate {
    pub active: &'static str,
    pub page: ApplyPageView,
}

pub async fn apply_handler(
    State(state): State<AppState>,
    Query(query): Query<ApplyQuery>,
) -> Response {
    let page = entry_status_service::load_apply_page(state.backend.as_ref(), &query).await;
    render(&ApplyTemplate {
        active: "apply",
        page,
    })
}
