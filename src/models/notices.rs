use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NoticeRow {
    pub id: serde_json::Value,
    pub title: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: Option<String>,
}
