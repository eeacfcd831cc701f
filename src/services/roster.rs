use std::collections::HashSet;

use thiserror::Error;

use crate::database::entry_commands_repo::TeamEntryMember;
use crate::models::Member;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub member_id: String,
    pub name: String,
    pub gender: String,
    pub grade: String,
}

impl From<&Member> for RosterEntry {
    fn from(m: &Member) -> Self {
        RosterEntry {
            member_id: m.member_id.clone(),
            name: m.display_name.clone(),
            gender: m.gender.clone(),
            grade: m.grade.clone(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("이미 명단에 있습니다.")]
    Duplicate { member_id: String },

    #[error("인원 제한({limit}명)을 초과합니다.")]
    Capacity { limit: usize, exceeded_by: usize },
}

/// Ordered, duplicate-free list of entered players. Never grows past the
/// event limit.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    limit: Option<usize>,
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            entries: Vec::new(),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.entries.len() >= limit)
    }

    pub fn contains(&self, member_id: &str) -> bool {
        self.entries.iter().any(|e| e.member_id == member_id)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn member_ids(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.member_id.as_str()).collect()
    }

    /// How many slots adding `additional` more entries would overflow by.
    pub fn overflow_for(&self, additional: usize) -> Option<RosterError> {
        let limit = self.limit?;
        let wanted = self.entries.len() + additional;
        (wanted > limit).then(|| RosterError::Capacity {
            limit,
            exceeded_by: wanted - limit,
        })
    }

    /// Appends every candidate not already present. Either all of them fit
    /// or nothing changes. Returns how many were appended.
    pub fn add_many<'a, I>(&mut self, candidates: I) -> Result<usize, RosterError>
    where
        I: IntoIterator<Item = &'a Member>,
    {
        let mut seen = self.member_ids().into_iter().map(str::to_string).collect::<HashSet<_>>();
        let fresh: Vec<RosterEntry> = candidates
            .into_iter()
            .filter(|m| seen.insert(m.member_id.clone()))
            .map(RosterEntry::from)
            .collect();

        if let Some(err) = self.overflow_for(fresh.len()) {
            return Err(err);
        }
        let added = fresh.len();
        self.entries.extend(fresh);
        Ok(added)
    }

    pub fn add_one(&mut self, member: &Member) -> Result<(), RosterError> {
        if self.contains(&member.member_id) {
            return Err(RosterError::Duplicate {
                member_id: member.member_id.clone(),
            });
        }
        if let Some(err) = self.overflow_for(1) {
            return Err(err);
        }
        self.entries.push(RosterEntry::from(member));
        Ok(())
    }

    /// Removing an absent id is a no-op.
    pub fn remove(&mut self, member_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.member_id != member_id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Payload lines with a 1-based `order` following insertion order.
    pub fn to_entry_members(&self) -> Vec<TeamEntryMember> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| TeamEntryMember {
                member_id: e.member_id.clone(),
                name: e.name.clone(),
                gender: e.gender.clone(),
                grade: e.grade.clone(),
                order: i + 1,
            })
            .collect()
    }
}
