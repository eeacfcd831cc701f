use chrono::{DateTime, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::board_repo::{self, NewBoardPost};
use crate::models::{BoardCategory, BoardPostRow};
use crate::services::identity_service::validate_credentials;

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Default)]
pub struct BoardPostRequest {
    pub name: String,
    pub pin: String,
    pub category: BoardCategory,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("제목과 내용을 입력해주세요.")]
    MissingBody,

    #[error("제목은 100자, 내용은 2000자까지 입력할 수 있습니다.")]
    TooLong,

    #[error("등록 실패: {0}")]
    CreateFailed(String),

    #[error("조회 실패: {0}")]
    LoadFailed(String),

    #[error("{0}")]
    Rejected(String),
}

pub struct BoardPostView {
    pub category_label: &'static str,
    pub title: String,
    pub content: String,
    pub date_label: String,
    pub reply: Option<String>,
    pub reply_date_label: String,
}

impl BoardPostView {
    pub fn status_label(&self) -> &'static str {
        if self.reply.is_some() {
            "답변완료"
        } else {
            "대기중"
        }
    }
}

/// Either the write form or the "my posts" list. PINs are never carried.
pub struct BoardPageView {
    pub mine: bool,
    pub name: String,
    pub categories: Vec<BoardCategory>,
    pub category: BoardCategory,
    pub title: String,
    pub content: String,
    /// `None` until the list has been requested.
    pub posts: Option<Vec<BoardPostView>>,
}

impl BoardPageView {
    pub fn new(mine: bool) -> Self {
        Self {
            mine,
            name: String::new(),
            categories: BoardCategory::ALL.to_vec(),
            category: BoardCategory::default(),
            title: String::new(),
            content: String::new(),
            posts: None,
        }
    }

    pub fn is_category(&self, category: &BoardCategory) -> bool {
        self.category == *category
    }
}

impl BoardPostRequest {
    pub fn validate(&self) -> Result<(), BoardError> {
        validate_credentials(&self.name, &self.pin)
            .map_err(|e| BoardError::InvalidCredentials(e.to_string()))?;
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(BoardError::MissingBody);
        }
        if title.chars().count() > TITLE_MAX_CHARS || content.chars().count() > CONTENT_MAX_CHARS {
            return Err(BoardError::TooLong);
        }
        Ok(())
    }
}

pub async fn create_post(backend: &dyn Backend, request: &BoardPostRequest) -> Result<(), BoardError> {
    request.validate()?;
    let outcome = board_repo::create_board_post(
        backend,
        NewBoardPost {
            name: request.name.trim(),
            pin: &request.pin,
            category: request.category.value(),
            title: request.title.trim(),
            content: request.content.trim(),
        },
    )
    .await
    .map_err(|e| {
        warn!(error = %e, "board post call failed");
        BoardError::CreateFailed(e.to_string())
    })?;

    if !outcome.ok {
        return Err(BoardError::Rejected(
            outcome
                .message
                .unwrap_or_else(|| "글을 등록할 수 없습니다.".to_string()),
        ));
    }
    info!(category = request.category.value(), "board post created");
    Ok(())
}

/// Posts written by the owner of `name` + `pin`, as the backend returns them.
pub async fn my_posts(
    backend: &dyn Backend,
    name: &str,
    pin: &str,
) -> Result<Vec<BoardPostView>, BoardError> {
    validate_credentials(name, pin).map_err(|e| BoardError::InvalidCredentials(e.to_string()))?;
    let response = board_repo::list_my_board_posts(backend, name.trim(), pin)
        .await
        .map_err(|e| {
            warn!(error = %e, "board post list call failed");
            BoardError::LoadFailed(e.to_string())
        })?;
    if !response.ok {
        return Err(BoardError::Rejected(
            response
                .message
                .unwrap_or_else(|| "글을 불러올 수 없습니다.".to_string()),
        ));
    }
    Ok(response.posts.into_iter().map(post_view).collect())
}

fn post_view(row: BoardPostRow) -> BoardPostView {
    let category = row
        .category
        .as_deref()
        .and_then(BoardCategory::parse)
        .unwrap_or(BoardCategory::General);
    BoardPostView {
        category_label: category.label(),
        title: row.title.unwrap_or_default(),
        content: row.content.unwrap_or_default(),
        date_label: row.created_at.as_deref().map(short_date).unwrap_or_default(),
        reply: row.admin_reply.filter(|r| !r.trim().is_empty()),
        reply_date_label: row
            .admin_replied_at
            .as_deref()
            .map(short_date)
            .unwrap_or_default(),
    }
}

/// `M/D`, the compact form used in post lists.
fn short_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%-m/%-d").to_string();
    }
    match raw.get(0..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        Some(date) => date.format("%-m/%-d").to_string(),
        None => raw.to_string(),
    }
}
