use crate::models::members::gender_label;
use crate::models::Member;
use crate::services::selection::AddMode;
use crate::services::team_entry_service::{SubmissionState, TeamEntryForm};

pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct MemberCardView {
    pub member_id: String,
    pub name: String,
    pub club: String,
    pub grade: String,
    pub gender: &'static str,
}

impl From<&Member> for MemberCardView {
    fn from(m: &Member) -> Self {
        MemberCardView {
            member_id: m.member_id.clone(),
            name: m.display_name.clone(),
            club: m.club.clone(),
            grade: m.grade.clone(),
            gender: m.gender_label(),
        }
    }
}

pub struct ClubMemberRowView {
    pub member: MemberCardView,
    pub checked: bool,
    pub locked: bool,
}

pub struct ClubPanelView {
    pub club: String,
    pub rows: Vec<ClubMemberRowView>,
    pub new_count: usize,
}

pub struct RosterRowView {
    pub order: usize,
    pub member_id: String,
    pub name: String,
    pub gender: &'static str,
    pub grade: String,
}

/// Everything the team entry page renders, flattened for the template.
pub struct TeamEntryView {
    pub events: Vec<OptionView>,
    pub event_selected: bool,
    pub limit_label: String,
    pub captain_name: String,
    pub verified_label: Option<String>,
    pub club_name: String,
    pub can_edit_roster: bool,
    pub club_mode: bool,
    pub clubs: Vec<OptionView>,
    pub club_panel: Option<ClubPanelView>,
    pub search_query: String,
    pub search_results: Vec<MemberCardView>,
    pub roster: Vec<RosterRowView>,
    pub roster_count_label: String,
    pub roster_full: bool,
    pub can_submit: bool,
    pub submitting: bool,
    pub failure: Option<String>,
    pub succeeded: bool,
}

pub fn build_view(form: &TeamEntryForm) -> TeamEntryView {
    let selected_id = form.selected_event().map(|e| e.event_id.as_str());
    let events = form
        .events()
        .iter()
        .map(|e| OptionView {
            value: e.event_id.clone(),
            label: if e.date.is_empty() {
                e.name.clone()
            } else {
                format!("{} ({})", e.name, e.date)
            },
            selected: Some(e.event_id.as_str()) == selected_id,
        })
        .collect();

    let roster = form.roster();
    let limit_label = match roster.limit() {
        Some(limit) => format!("최대 {}명", limit),
        None => "인원 제한 없음".to_string(),
    };
    let roster_count_label = match roster.limit() {
        Some(limit) => format!("{}/{}명", roster.len(), limit),
        None => format!("{}명", roster.len()),
    };

    let verified_label = form.captain().verified().map(|v| {
        if v.club.is_empty() {
            format!("{} ({})", v.name, v.grade)
        } else {
            format!("{} · {} ({})", v.name, v.club, v.grade)
        }
    });

    let chosen_club = form.club_selection().map(|s| s.club());
    let clubs = form
        .directory()
        .list_clubs()
        .into_iter()
        .map(|club| OptionView {
            selected: Some(club.as_str()) == chosen_club,
            label: club.clone(),
            value: club,
        })
        .collect();

    let club_panel = form.club_selection().map(|sel| ClubPanelView {
        club: sel.club().to_string(),
        rows: sel
            .members()
            .iter()
            .map(|m| ClubMemberRowView {
                member: MemberCardView::from(m),
                checked: sel.is_checked(&m.member_id),
                locked: sel.is_locked(&m.member_id, roster),
            })
            .collect(),
        new_count: sel.newly_checked_count(roster),
    });

    let (submitting, failure, succeeded) = match form.submission() {
        SubmissionState::Submitting => (true, None, false),
        SubmissionState::Failed(message) => (false, Some(message.clone()), false),
        SubmissionState::Succeeded => (false, None, true),
        SubmissionState::Idle | SubmissionState::Validating => (false, None, false),
    };

    TeamEntryView {
        events,
        event_selected: selected_id.is_some(),
        limit_label,
        captain_name: form.captain().name().to_string(),
        verified_label,
        club_name: form.club_name().to_string(),
        can_edit_roster: form.can_edit_roster(),
        club_mode: form.add_mode() == AddMode::Club,
        clubs,
        club_panel,
        search_query: form.search_query().to_string(),
        search_results: form
            .search_results()
            .into_iter()
            .map(MemberCardView::from)
            .collect(),
        roster: roster
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| RosterRowView {
                order: i + 1,
                member_id: e.member_id.clone(),
                name: e.name.clone(),
                gender: gender_label(&e.gender),
                grade: e.grade.clone(),
            })
            .collect(),
        roster_count_label,
        roster_full: roster.is_full(),
        can_submit: form.can_submit(),
        submitting,
        failure,
        succeeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entry_commands_repo;
    use crate::services::notifier::FlashMessages;
    use crate::testing::{event_json, member_json, MemoryBackend};
    use serde_json::json;

    #[tokio::test]
    async fn club_panel_marks_roster_members_locked() {
        let backend = MemoryBackend::new()
            .with_table("events", json!([event_json("E1", Some(3))]))
            .with_table(
                "members_public",
                json!([
                    member_json("K", "Kim", "Sunrise", "활성"),
                    member_json("X", "Xavier", "Sunrise", "활성"),
                ]),
            )
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({ "ok": true, "member_id": "K", "name": "Kim", "club": "Sunrise", "grade": "B" })),
            );
        let mut form = TeamEntryForm::default();
        let mut flash = FlashMessages::default();
        form.reload(&backend).await;
        form.select_event("E1");
        form.verify_captain(&backend, "Kim", "123456", &mut flash).await;
        form.set_add_mode(AddMode::Search);
        form.add_from_search("X", &mut flash);
        form.set_add_mode(AddMode::Club);
        form.choose_club("Sunrise");

        let view = build_view(&form);
        assert_eq!(view.limit_label, "최대 3명");
        assert_eq!(view.roster_count_label, "1/3명");
        assert_eq!(view.verified_label.as_deref(), Some("Kim · Sunrise (B)"));
        assert!(view.can_submit);

        let panel = view.club_panel.unwrap();
        let locked: Vec<_> = panel
            .rows
            .iter()
            .map(|r| (r.member.member_id.as_str(), r.locked, r.checked))
            .collect();
        assert_eq!(locked, vec![("K", false, false), ("X", true, true)]);
        assert_eq!(panel.new_count, 0);
        assert_eq!(view.roster[0].gender, "남");
    }
}
