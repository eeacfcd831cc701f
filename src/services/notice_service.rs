use chrono::{DateTime, NaiveDate};
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::notices_repo;
use crate::models::NoticeRow;

pub struct NoticeView {
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub pinned: bool,
    pub date_label: String,
}

pub async fn load_notices(backend: &dyn Backend) -> Vec<NoticeView> {
    match notices_repo::list_notices(backend).await {
        Ok(rows) => rows.into_iter().map(build_view).collect(),
        Err(e) => {
            warn!(error = %e, "notice list load failed");
            Vec::new()
        }
    }
}

fn build_view(row: NoticeRow) -> NoticeView {
    NoticeView {
        title: row.title.unwrap_or_default(),
        content: row.content.unwrap_or_default(),
        link: row
            .link
            .map(|s| s.trim().to_string())
            .filter(|s| s.starts_with("http://") || s.starts_with("https://")),
        pinned: row.pinned,
        date_label: row.created_at.as_deref().map(format_date).unwrap_or_default(),
    }
}

/// `YYYY.MM.DD`; unparseable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y.%m.%d").to_string();
    }
    match raw.get(0..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        Some(date) => date.format("%Y.%m.%d").to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use serde_json::json;

    #[test]
    fn formats_timestamps_and_plain_dates() {
        assert_eq!(format_date("2026-03-07T09:30:00+09:00"), "2026.03.07");
        assert_eq!(format_date("2026-03-07 09:30:00"), "2026.03.07");
        assert_eq!(format_date("soon"), "soon");
    }

    #[tokio::test]
    async fn keeps_backend_order_and_drops_unsafe_links() {
        let backend = MemoryBackend::new().with_table(
            "notices",
            json!([
                { "id": 2, "title": "고정", "content": "본문", "link": "javascript:alert(1)", "pinned": true, "created_at": "2026-01-02T00:00:00Z" },
                { "id": 1, "title": "일반", "content": null, "link": "https://example.org", "pinned": false, "created_at": "2026-02-01T00:00:00Z" }
            ]),
        );
        let notices = load_notices(&backend).await;
        assert_eq!(notices[0].title, "고정");
        assert!(notices[0].link.is_none());
        assert_eq!(notices[1].link.as_deref(), Some("https://example.org"));

        let query = &backend.select_calls("notices")[0];
        assert_eq!(query.order, vec!["pinned.desc", "created_at.desc"]);
    }
}
