use askama::Template;
use axum::{extract::State, response::Response};

use crate::services::notice_service::{self, NoticeView};
use crate::web::render;
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "notices.html")]
pub struct NoticesTemplate {
    pub active: &'static str,
    pub items: Vec<NoticeView>,
}

pub async fn notices_handler(State(state): State<AppState>) -> Response {
    let items = notice_service::load_notices(state.backend.as_ref()).await;
    render(&NoticesTemplate {
        active: "notice",
        items,
    })
}
