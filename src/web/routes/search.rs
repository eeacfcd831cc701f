use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::services::search_service::{self, SearchPageView, SearchQuery};
use crate::web::render;
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub active: &'static str,
    pub page: SearchPageView,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let page = search_service::load_search_page(state.backend.as_ref(), &query).await;
    render(&SearchTemplate {
        active: "search",
        page,
    })
}
