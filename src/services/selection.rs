//! The two ways of filling a roster: ticking members of a club, or picking
//! search hits one at a time. Neither keeps roster state of its own.

use std::collections::HashSet;

use crate::models::Member;
use crate::services::member_directory::{MemberDirectory, ROSTER_SEARCH_LIMIT};
use crate::services::roster::{Roster, RosterError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    #[default]
    Club,
    Search,
}

impl AddMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "club" => Some(Self::Club),
            "search" => Some(Self::Search),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Club => "club",
            Self::Search => "search",
        }
    }
}

/// Checkbox state for one club. Members already on the roster show up
/// checked and cannot be unticked here.
#[derive(Debug, Clone)]
pub struct ClubSelection {
    club: String,
    members: Vec<Member>,
    checked: HashSet<String>,
}

impl ClubSelection {
    pub fn open(club: &str, directory: &MemberDirectory, roster: &Roster) -> Self {
        let members: Vec<Member> = directory
            .members_in_club(club)
            .into_iter()
            .cloned()
            .collect();
        let checked = members
            .iter()
            .filter(|m| roster.contains(&m.member_id))
            .map(|m| m.member_id.clone())
            .collect();
        Self {
            club: club.to_string(),
            members,
            checked,
        }
    }

    pub fn club(&self) -> &str {
        &self.club
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_checked(&self, member_id: &str) -> bool {
        self.checked.contains(member_id)
    }

    pub fn is_locked(&self, member_id: &str, roster: &Roster) -> bool {
        roster.contains(member_id)
    }

    pub fn toggle(&mut self, member_id: &str, roster: &Roster) {
        if roster.contains(member_id) || !self.members.iter().any(|m| m.member_id == member_id) {
            return;
        }
        if !self.checked.remove(member_id) {
            self.checked.insert(member_id.to_string());
        }
    }

    /// Ticks everyone, unless that would overflow the roster; then nothing
    /// changes.
    pub fn select_all(&mut self, roster: &Roster) -> Result<(), RosterError> {
        let would_add = self
            .members
            .iter()
            .filter(|m| !roster.contains(&m.member_id))
            .count();
        if let Some(err) = roster.overflow_for(would_add) {
            return Err(err);
        }
        self.checked = self.members.iter().map(|m| m.member_id.clone()).collect();
        Ok(())
    }

    /// Back to exactly the members already on the roster.
    pub fn deselect_all(&mut self, roster: &Roster) {
        self.checked = self
            .members
            .iter()
            .filter(|m| roster.contains(&m.member_id))
            .map(|m| m.member_id.clone())
            .collect();
    }

    pub fn newly_checked<'a>(&'a self, roster: &'a Roster) -> impl Iterator<Item = &'a Member> {
        self.members
            .iter()
            .filter(move |m| self.checked.contains(&m.member_id) && !roster.contains(&m.member_id))
    }

    pub fn newly_checked_count(&self, roster: &Roster) -> usize {
        self.newly_checked(roster).count()
    }

    /// Commits the ticked, not yet entered members in one `add_many`.
    pub fn commit(&self, roster: &mut Roster) -> Result<usize, RosterError> {
        let picked: Vec<Member> = self.newly_checked(roster).cloned().collect();
        roster.add_many(picked.iter())
    }
}

/// Search hits for the name box, excluding members already entered.
pub fn search_candidates<'a>(
    directory: &'a MemberDirectory,
    query: &str,
    roster: &Roster,
) -> Vec<&'a Member> {
    directory.search_by_name(query, &roster.member_ids(), ROSTER_SEARCH_LIMIT)
}

/// Adds one search hit by id.
pub fn add_search_hit(
    directory: &MemberDirectory,
    member_id: &str,
    roster: &mut Roster,
) -> Result<Option<String>, RosterError> {
    let Some(member) = directory.get(member_id) else {
        return Ok(None);
    };
    roster.add_one(member)?;
    Ok(Some(member.display_name.clone()))
}
