use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Dormant,
    Deleted,
}

impl MemberStatus {
    /// Backend labels are Korean; English spellings are accepted too.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "활성" | "active" => Some(Self::Active),
            "휴면" | "dormant" => Some(Self::Dormant),
            "삭제" | "삭제됨" | "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "활성",
            Self::Dormant => "휴면",
            Self::Deleted => "삭제",
        }
    }
}

/// Row shape of `members_public`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRow {
    pub member_id: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub club: Option<String>,
    pub division: Option<String>,
    pub grade: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

/// Row of `get_grade_options`.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeOptionRow {
    pub grade_value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub member_id: String,
    pub name: String,
    /// Always populated; equals `name` when the member has no alias.
    pub display_name: String,
    pub club: String,
    pub division: String,
    pub grade: String,
    pub gender: String,
    pub status: MemberStatus,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn gender_label(&self) -> &'static str {
        gender_label(&self.gender)
    }
}

pub fn gender_label(gender: &str) -> &'static str {
    match gender {
        "M" => "남",
        "F" => "여",
        _ => "",
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        let name = non_empty(row.name).unwrap_or_default();
        let display_name = non_empty(row.display_name).unwrap_or_else(|| name.clone());
        // Unknown labels are treated as dormant so they never become eligible.
        let status = row
            .status
            .as_deref()
            .and_then(MemberStatus::parse)
            .unwrap_or(MemberStatus::Dormant);
        Member {
            member_id: row.member_id,
            name,
            display_name,
            club: non_empty(row.club).unwrap_or_default(),
            division: non_empty(row.division).unwrap_or_default(),
            grade: non_empty(row.grade).unwrap_or_default(),
            gender: non_empty(row.gender).unwrap_or_default(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(display_name: Option<&str>, status: Option<&str>) -> MemberRow {
        MemberRow {
            member_id: "M001".to_string(),
            name: Some("김철수".to_string()),
            display_name: display_name.map(|s| s.to_string()),
            club: Some(" 한라 ".to_string()),
            division: None,
            grade: Some("A".to_string()),
            gender: Some("M".to_string()),
            status: status.map(|s| s.to_string()),
        }
    }

    #[test]
    fn display_name_defaults_to_name() {
        assert_eq!(Member::from(row(None, Some("활성"))).display_name, "김철수");
        assert_eq!(Member::from(row(Some("  "), Some("활성"))).display_name, "김철수");
        assert_eq!(Member::from(row(Some("철수2"), Some("활성"))).display_name, "철수2");
    }

    #[test]
    fn club_is_trimmed() {
        assert_eq!(Member::from(row(None, Some("활성"))).club, "한라");
    }

    #[test]
    fn status_labels_map_to_enum() {
        assert!(Member::from(row(None, Some("활성"))).is_active());
        assert_eq!(
            Member::from(row(None, Some("삭제"))).status,
            MemberStatus::Deleted
        );
        assert_eq!(
            Member::from(row(None, Some("???"))).status,
            MemberStatus::Dormant
        );
        assert_eq!(Member::from(row(None, None)).status, MemberStatus::Dormant);
    }
}
