use serde::Deserialize;
use tracing::warn;

use crate::database::backend::Backend;
use crate::database::members_repo;
use crate::models::Member;

pub const SEARCH_RESULT_LIMIT: usize = 100;
const NO_CLUB_LABEL: &str = "소속 없음";

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub view: Option<String>,
}

pub struct MemberLineView {
    pub member_id: String,
    pub name: String,
    pub club: String,
    pub division: String,
    pub grade: String,
    pub status_label: &'static str,
}

pub struct ClubGroupView {
    pub club: String,
    pub members: Vec<MemberLineView>,
}

pub struct SearchPageView {
    pub query: String,
    pub searched: bool,
    pub by_club: bool,
    pub club_view_available: bool,
    pub members: Vec<MemberLineView>,
    pub groups: Vec<ClubGroupView>,
}

pub async fn load_search_page(backend: &dyn Backend, query: &SearchQuery) -> SearchPageView {
    let needle = query.q.as_deref().map(str::trim).unwrap_or_default().to_string();
    if needle.is_empty() {
        return SearchPageView {
            query: needle,
            searched: false,
            by_club: false,
            club_view_available: false,
            members: Vec::new(),
            groups: Vec::new(),
        };
    }

    let members = match members_repo::search_members(backend, &needle, SEARCH_RESULT_LIMIT).await {
        Ok(members) => members,
        Err(e) => {
            warn!(error = %e, "member search failed");
            Vec::new()
        }
    };

    let lowered = needle.to_lowercase();
    let club_view_available = members
        .iter()
        .any(|m| !m.club.is_empty() && m.club.to_lowercase().contains(&lowered));
    let by_club = club_view_available && query.view.as_deref() == Some("club");

    let groups = if by_club {
        group_by_club(&members)
    } else {
        Vec::new()
    };

    SearchPageView {
        query: needle,
        searched: true,
        by_club,
        club_view_available,
        members: members.iter().map(line_view).collect(),
        groups,
    }
}

fn line_view(m: &Member) -> MemberLineView {
    MemberLineView {
        member_id: m.member_id.clone(),
        name: m.display_name.clone(),
        club: m.club.clone(),
        division: m.division.clone(),
        grade: m.grade.clone(),
        status_label: m.status.label(),
    }
}

/// Largest club first; members without a club are grouped together.
fn group_by_club(members: &[Member]) -> Vec<ClubGroupView> {
    let mut groups: Vec<ClubGroupView> = Vec::new();
    for m in members {
        let club = if m.club.is_empty() {
            NO_CLUB_LABEL
        } else {
            m.club.as_str()
        };
        match groups.iter_mut().find(|g| g.club == club) {
            Some(group) => group.members.push(line_view(m)),
            None => groups.push(ClubGroupView {
                club: club.to_string(),
                members: vec![line_view(m)],
            }),
        }
    }
    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{member_json, MemoryBackend};
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_table(
            "members_public",
            json!([
                member_json("1", "Kim", "Sunrise", "활성"),
                member_json("2", "Sun", "", "휴면"),
                member_json("3", "Lee", "Sunrise", "활성"),
                member_json("4", "Sunny", "Harbor", "활성"),
            ]),
        )
    }

    #[tokio::test]
    async fn blank_query_does_not_hit_backend() {
        let backend = backend();
        let view = load_search_page(&backend, &SearchQuery::default()).await;
        assert!(!view.searched);
        assert!(backend.select_calls("members_public").is_empty());
    }

    #[tokio::test]
    async fn club_view_groups_largest_first() {
        let backend = backend();
        let query = SearchQuery {
            q: Some("sun".to_string()),
            view: Some("club".to_string()),
        };
        let view = load_search_page(&backend, &query).await;
        assert!(view.club_view_available);
        assert!(view.by_club);
        let clubs: Vec<_> = view.groups.iter().map(|g| g.club.as_str()).collect();
        assert_eq!(clubs, vec!["Sunrise", "소속 없음", "Harbor"]);
        assert_eq!(view.members.len(), 4);

        let q = &backend.select_calls("members_public")[0];
        assert!(q.filters.contains(&("status".to_string(), "neq.삭제".to_string())));
        assert_eq!(q.limit, Some(100));
    }

    #[tokio::test]
    async fn club_view_needs_a_club_match() {
        let backend = MemoryBackend::new().with_table(
            "members_public",
            json!([member_json("1", "Kim", "Harbor", "활성")]),
        );
        let query = SearchQuery {
            q: Some("kim".to_string()),
            view: Some("club".to_string()),
        };
        let view = load_search_page(&backend, &query).await;
        assert!(!view.club_view_available);
        assert!(!view.by_club);
        assert!(view.groups.is_empty());
    }
}
