use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::database::backend::Backend;
use crate::database::members_repo;
use crate::models::Member;

pub const ROSTER_SEARCH_LIMIT: usize = 10;

/// Snapshot of members fetched once per page load. All filtering happens on
/// the cached list.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: Vec<Member>,
}

impl MemberDirectory {
    pub fn new(mut members: Vec<Member>) -> Self {
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Self { members }
    }

    /// Active members only. A failed fetch yields an empty directory.
    pub async fn load_active(backend: &dyn Backend) -> Self {
        match members_repo::list_active_members(backend).await {
            Ok(members) => {
                Self::new(members.into_iter().filter(Member::is_active).collect())
            }
            Err(e) => {
                warn!(error = %e, "active member directory load failed");
                Self::default()
            }
        }
    }

    /// Everyone except deleted members, so pickers can flag unpaid players.
    pub async fn load_non_deleted(backend: &dyn Backend) -> Self {
        match members_repo::list_non_deleted_members(backend).await {
            Ok(members) => Self::new(members),
            Err(e) => {
                warn!(error = %e, "member directory load failed");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn get(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    pub fn list_clubs(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.club.as_str())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn members_in_club(&self, club: &str) -> Vec<&Member> {
        self.members.iter().filter(|m| m.club == club).collect()
    }

    /// Case-insensitive substring match on name or display name, skipping
    /// `exclude_ids`.
    pub fn search_by_name(
        &self,
        query: &str,
        exclude_ids: &HashSet<&str>,
        limit: usize,
    ) -> Vec<&Member> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.members
            .iter()
            .filter(|m| !exclude_ids.contains(m.member_id.as_str()))
            .filter(|m| {
                m.name.to_lowercase().contains(&q) || m.display_name.to_lowercase().contains(&q)
            })
            .take(limit)
            .collect()
    }

    /// Like `search_by_name`, but also matches the member id.
    pub fn search_by_name_or_id(&self, query: &str, limit: usize) -> Vec<&Member> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.members
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&q)
                    || m.display_name.to_lowercase().contains(&q)
                    || m.member_id.to_lowercase().contains(&q)
            })
            .take(limit)
            .collect()
    }
}
