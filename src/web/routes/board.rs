use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
    Form,
};
use serde::Deserialize;

use crate::models::BoardCategory;
use crate::services::board_service::{self, BoardPageView, BoardPostRequest};
use crate::services::notifier::{FlashMessages, Notice, Notifier};
use crate::web::render;
use crate::web::state::AppState;

/// Rendered straight from the POST handlers so the PIN is never stored or
/// echoed back.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub page: BoardPageView,
}

#[derive(Debug, Deserialize, Default)]
pub struct BoardQuery {
    pub tab: Option<String>,
}

pub async fn board_page(Query(query): Query<BoardQuery>) -> Response {
    render(&BoardTemplate {
        active: "board",
        notices: Vec::new(),
        page: BoardPageView::new(query.tab.as_deref() == Some("mine")),
    })
}

#[derive(Debug, Deserialize)]
pub struct WritePostForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn write_handler(
    State(state): State<AppState>,
    Form(form): Form<WritePostForm>,
) -> Response {
    let request = BoardPostRequest {
        name: form.name,
        pin: form.pin,
        category: BoardCategory::parse(&form.category).unwrap_or_default(),
        title: form.title,
        content: form.content,
    };

    let mut flash = FlashMessages::default();
    let mut page = BoardPageView::new(false);
    page.name = request.name.clone();
    match board_service::create_post(state.backend.as_ref(), &request).await {
        Ok(()) => flash.success("글이 등록되었습니다."),
        Err(e) => {
            flash.error(&e.to_string());
            page.category = request.category;
            page.title = request.title;
            page.content = request.content;
        }
    }

    render(&BoardTemplate {
        active: "board",
        notices: flash.take(),
        page,
    })
}

#[derive(Debug, Deserialize)]
pub struct MyPostsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pin: String,
}

pub async fn my_posts_handler(
    State(state): State<AppState>,
    Form(form): Form<MyPostsForm>,
) -> Response {
    let mut flash = FlashMessages::default();
    let mut page = BoardPageView::new(true);
    match board_service::my_posts(state.backend.as_ref(), &form.name, &form.pin).await {
        Ok(posts) => {
            if posts.is_empty() {
                flash.success("작성한 글이 없습니다.");
            }
            page.posts = Some(posts);
        }
        Err(e) => flash.error(&e.to_string()),
    }
    page.name = form.name;

    render(&BoardTemplate {
        active: "board",
        notices: flash.take(),
        page,
    })
}
