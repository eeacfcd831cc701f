use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::entry_commands_repo::{self, NewDoublesEntry};
use crate::database::events_repo;
use crate::models::{Event, EventDivisionRow, Member};
use crate::services::identity_service::{self, sanitize_pin_input, VerificationError};
use crate::services::member_directory::MemberDirectory;
use crate::services::notifier::Notifier;

pub const PICKER_SEARCH_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MemberPick {
    query: String,
    member_id: Option<String>,
}

/// Session-scoped state of the doubles entry page.
#[derive(Debug, Default)]
pub struct EventEntryForm {
    loaded: bool,
    events: Vec<Event>,
    selected_event: Option<Event>,
    divisions: Vec<EventDivisionRow>,
    selected_division: Option<String>,
    directory: MemberDirectory,
    first: MemberPick,
    second: MemberPick,
    first_pin: String,
    submitting: bool,
}

impl EventEntryForm {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected_event.as_ref()
    }

    pub fn divisions(&self) -> &[EventDivisionRow] {
        &self.divisions
    }

    pub fn selected_division(&self) -> Option<&str> {
        self.selected_division.as_deref()
    }

    pub fn query(&self, slot: Slot) -> &str {
        &self.pick(slot).query
    }

    pub fn picked(&self, slot: Slot) -> Option<&Member> {
        self.pick(slot)
            .member_id
            .as_deref()
            .and_then(|id| self.directory.get(id))
    }

    pub fn has_pin(&self) -> bool {
        identity_service::is_valid_pin(&self.first_pin)
    }

    pub fn pin_len(&self) -> usize {
        self.first_pin.len()
    }

    /// Hits are only listed while nobody is picked for the slot.
    pub fn candidates(&self, slot: Slot) -> Vec<&Member> {
        let pick = self.pick(slot);
        if pick.member_id.is_some() {
            return Vec::new();
        }
        self.directory
            .search_by_name_or_id(&pick.query, PICKER_SEARCH_LIMIT)
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting
            && self.selected_division.is_some()
            && self.first.member_id.is_some()
            && self.second.member_id.is_some()
            && self.has_pin()
    }

    fn pick(&self, slot: Slot) -> &MemberPick {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    fn pick_mut(&mut self, slot: Slot) -> &mut MemberPick {
        match slot {
            Slot::First => &mut self.first,
            Slot::Second => &mut self.second,
        }
    }

    pub async fn reload(&mut self, backend: &dyn Backend) {
        self.events = match events_repo::list_open_events(backend).await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "open event list load failed");
                Vec::new()
            }
        };
        self.directory = MemberDirectory::load_non_deleted(backend).await;
        self.loaded = true;
    }

    /// Picking an event loads its divisions and clears the division choice.
    pub async fn select_event(&mut self, backend: &dyn Backend, event_id: &str) {
        self.selected_event = self.events.iter().find(|e| e.event_id == event_id).cloned();
        self.selected_division = None;
        self.divisions = match &self.selected_event {
            Some(event) => match events_repo::list_event_divisions(backend, &event.event_id).await {
                Ok(divisions) => divisions,
                Err(e) => {
                    warn!(event_id = %event.event_id, error = %e, "division list load failed");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
    }

    pub fn select_division(&mut self, division_id: &str) {
        self.selected_division = self
            .divisions
            .iter()
            .find(|d| d.division_id == division_id)
            .map(|d| d.division_id.clone());
    }

    /// Typing in a picker drops its current pick (and, for the first slot,
    /// the PIN).
    pub fn set_query(&mut self, slot: Slot, query: &str) {
        let pick = self.pick_mut(slot);
        pick.query = query.to_string();
        pick.member_id = None;
        if slot == Slot::First {
            self.first_pin.clear();
        }
    }

    pub fn pick_member(&mut self, slot: Slot, member_id: &str) {
        let Some(label) = self.directory.get(member_id).map(|m| m.display_name.clone()) else {
            return;
        };
        let pick = self.pick_mut(slot);
        pick.member_id = Some(member_id.to_string());
        pick.query = label;
        if slot == Slot::First {
            self.first_pin.clear();
        }
    }

    pub fn set_pin(&mut self, raw: &str) {
        self.first_pin = sanitize_pin_input(raw);
    }

    /// Local checks, then marks the form as submitting. The returned payload
    /// is what the remote calls need; the form may be released meanwhile.
    pub fn begin_submission(&mut self) -> Result<DoublesPayload, String> {
        if self.submitting {
            return Err("신청이 이미 진행 중입니다.".to_string());
        }
        let (Some(event), Some(division_id), Some(first), Some(second)) = (
            self.selected_event.as_ref(),
            self.selected_division.as_ref(),
            self.picked(Slot::First),
            self.picked(Slot::Second),
        ) else {
            return Err("대회, 부서, 팀원 2명을 모두 선택해주세요.".to_string());
        };
        if first.member_id == second.member_id {
            return Err("서로 다른 두 선수를 선택해주세요.".to_string());
        }
        if !self.has_pin() {
            return Err("PIN 6자리를 입력해주세요.".to_string());
        }

        let payload = DoublesPayload {
            event_id: event.event_id.clone(),
            division_id: division_id.clone(),
            first_member_id: first.member_id.clone(),
            first_name: first.name.clone(),
            second_member_id: second.member_id.clone(),
            pin: self.first_pin.clone(),
        };
        self.submitting = true;
        Ok(payload)
    }

    /// Success clears both picks and the PIN; event and division stay.
    pub fn finish_submission(&mut self, outcome: Result<(), String>, notifier: &mut dyn Notifier) {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                notifier.success("참가 신청 완료!");
                self.first = MemberPick::default();
                self.second = MemberPick::default();
                self.first_pin.clear();
            }
            Err(message) => notifier.error(&message),
        }
    }

    /// The request went away while the remote calls were in flight.
    pub fn abandon_submission(&mut self, notifier: &mut dyn Notifier) {
        if self.submitting {
            self.submitting = false;
            notifier.error("신청 결과를 확인하지 못했습니다. 신청확인 페이지에서 확인해주세요.");
        }
    }

    pub async fn submit(&mut self, backend: &dyn Backend, notifier: &mut dyn Notifier) {
        let payload = match self.begin_submission() {
            Ok(payload) => payload,
            Err(message) => {
                notifier.error(&message);
                return;
            }
        };
        let outcome = send_doubles_entry(backend, &payload).await;
        self.finish_submission(outcome, notifier);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoublesPayload {
    pub event_id: String,
    pub division_id: String,
    pub first_member_id: String,
    pub first_name: String,
    pub second_member_id: String,
    pub pin: String,
}

/// Verifies the first member's PIN, then applies the pair to the event.
pub async fn send_doubles_entry(backend: &dyn Backend, payload: &DoublesPayload) -> Result<(), String> {
    let identity = identity_service::verify(backend, &payload.first_name, &payload.pin)
        .await
        .map_err(|e| match e {
            VerificationError::Transport(msg) => format!("PIN 확인 실패: {}", msg),
            other => other.to_string(),
        })?;
    if identity.member_id != payload.first_member_id {
        return Err("PIN이 선택한 선수와 일치하지 않습니다.".to_string());
    }

    let outcome = entry_commands_repo::apply_team_to_event(
        backend,
        NewDoublesEntry {
            event_id: &payload.event_id,
            division_id: &payload.division_id,
            member1_id: &payload.first_member_id,
            member2_id: &payload.second_member_id,
        },
    )
    .await
    .map_err(|e| {
        warn!(event_id = %payload.event_id, error = %e, "doubles entry call failed");
        format!("신청 실패: {}", e)
    })?;

    if !outcome.ok {
        return Err(outcome
            .message
            .unwrap_or_else(|| "신청할 수 없습니다.".to_string()));
    }
    info!(
        event_id = %payload.event_id,
        division_id = %payload.division_id,
        "doubles entry submitted"
    );
    Ok(())
}
