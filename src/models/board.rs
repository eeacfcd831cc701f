use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardCategory {
    #[default]
    Suggestion,
    Question,
    Complaint,
    General,
}

impl BoardCategory {
    pub const ALL: [BoardCategory; 4] = [
        Self::Suggestion,
        Self::Question,
        Self::Complaint,
        Self::General,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "suggestion" => Some(Self::Suggestion),
            "question" => Some(Self::Question),
            "complaint" => Some(Self::Complaint),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Question => "question",
            Self::Complaint => "complaint",
            Self::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Suggestion => "건의",
            Self::Question => "문의",
            Self::Complaint => "불만",
            Self::General => "기타",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardPostRow {
    pub id: serde_json::Value,
    pub category: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: Option<String>,
    pub admin_reply: Option<String>,
    pub admin_replied_at: Option<String>,
}

/// Response of `rpc_get_my_board_posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct MyBoardPostsResponse {
    pub ok: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub posts: Vec<BoardPostRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_values_round_trip_and_unknown_is_rejected() {
        for c in BoardCategory::ALL {
            assert_eq!(BoardCategory::parse(c.value()), Some(c));
        }
        assert_eq!(BoardCategory::parse("spam"), None);
        assert_eq!(BoardCategory::default().label(), "건의");
    }
}
