use crate::models::Member;
use crate::services::entry_status_service::format_won;
use crate::services::event_entry_service::{EventEntryForm, Slot};
use crate::services::team_entry_view::OptionView;

pub struct PickedMemberView {
    pub name: String,
    pub club: String,
    pub grade: String,
    pub active: bool,
}

pub struct CandidateView {
    pub member_id: String,
    pub name: String,
    pub club: String,
    pub active: bool,
}

pub struct PickerView {
    pub slot: &'static str,
    pub title: &'static str,
    pub query: String,
    pub picked: Option<PickedMemberView>,
    pub candidates: Vec<CandidateView>,
}

pub struct EventEntryView {
    pub events: Vec<OptionView>,
    pub fee_label: Option<String>,
    pub event_selected: bool,
    pub divisions: Vec<OptionView>,
    pub pickers: Vec<PickerView>,
    pub pin_entered: bool,
}

fn picker(form: &EventEntryForm, slot: Slot) -> PickerView {
    let (slot_value, title) = match slot {
        Slot::First => ("1", "선수 1 (본인)"),
        Slot::Second => ("2", "선수 2"),
    };
    PickerView {
        slot: slot_value,
        title,
        query: form.query(slot).to_string(),
        picked: form.picked(slot).map(|m: &Member| PickedMemberView {
            name: m.display_name.clone(),
            club: m.club.clone(),
            grade: m.grade.clone(),
            active: m.is_active(),
        }),
        candidates: form
            .candidates(slot)
            .into_iter()
            .map(|m| CandidateView {
                member_id: m.member_id.clone(),
                name: m.display_name.clone(),
                club: m.club.clone(),
                active: m.is_active(),
            })
            .collect(),
    }
}

pub fn build_view(form: &EventEntryForm) -> EventEntryView {
    let selected = form.selected_event();
    let events = form
        .events()
        .iter()
        .map(|e| OptionView {
            value: e.event_id.clone(),
            label: e.name.clone(),
            selected: selected.is_some_and(|s| s.event_id == e.event_id),
        })
        .collect();

    let divisions = form
        .divisions()
        .iter()
        .map(|d| OptionView {
            value: d.division_id.clone(),
            label: d.division_name.clone(),
            selected: form.selected_division() == Some(d.division_id.as_str()),
        })
        .collect();

    EventEntryView {
        events,
        fee_label: selected
            .and_then(|e| e.entry_fee_team)
            .map(|fee| format!("참가비 {}원", format_won(fee))),
        event_selected: selected.is_some(),
        divisions,
        pickers: vec![picker(form, Slot::First), picker(form, Slot::Second)],
        pin_entered: form.has_pin(),
    }
}
