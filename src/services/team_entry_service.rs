use thiserror::Error;
use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::entry_commands_repo::{self, NewTeamEntry, TeamEntryMember};
use crate::database::events_repo;
use crate::models::{Event, Member};
use crate::services::identity_service::{Credentials, VerificationError};
use crate::services::member_directory::MemberDirectory;
use crate::services::notifier::Notifier;
use crate::services::roster::Roster;
use crate::services::selection::{self, AddMode, ClubSelection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("대회를 선택해주세요.")]
    NoEvent,

    #[error("대표자 본인확인을 해주세요.")]
    NotVerified,

    #[error("클럽명을 입력해주세요.")]
    NoClubName,

    #[error("선수를 1명 이상 추가해주세요.")]
    EmptyRoster,

    #[error("신청이 이미 진행 중입니다.")]
    AlreadySubmitting,

    #[error("신청 실패: {0}")]
    Transport(String),

    #[error("신청 결과를 확인하지 못했습니다. 신청확인 페이지에서 확인해주세요.")]
    Interrupted,

    #[error("{0}")]
    Rejected(String),
}

/// Everything the remote submission needs. The PIN goes along again so the
/// backend re-checks it as part of the same call.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamEntryPayload {
    pub event_id: String,
    pub captain_name: String,
    pub captain_pin: String,
    pub club_name: String,
    pub members: Vec<TeamEntryMember>,
}

/// Session-scoped state of the team entry page.
#[derive(Debug, Default)]
pub struct TeamEntryForm {
    loaded: bool,
    events: Vec<Event>,
    selected_event: Option<Event>,
    captain: Credentials,
    /// Member the current roster was built for; survives failed or edited
    /// verifications in between.
    roster_owner: Option<String>,
    club_name: String,
    directory: MemberDirectory,
    roster: Roster,
    add_mode: AddMode,
    club_selection: Option<ClubSelection>,
    search_query: String,
    submission: SubmissionState,
}

impl TeamEntryForm {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected_event.as_ref()
    }

    pub fn captain(&self) -> &Credentials {
        &self.captain
    }

    pub fn club_name(&self) -> &str {
        &self.club_name
    }

    pub fn directory(&self) -> &MemberDirectory {
        &self.directory
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn add_mode(&self) -> AddMode {
        self.add_mode
    }

    pub fn club_selection(&self) -> Option<&ClubSelection> {
        self.club_selection.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn search_results(&self) -> Vec<&Member> {
        selection::search_candidates(&self.directory, &self.search_query, &self.roster)
    }

    /// Roster editing is offered once a captain is verified and a club named.
    pub fn can_edit_roster(&self) -> bool {
        self.captain.verified().is_some() && !self.club_name.trim().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.can_edit_roster()
            && !self.roster.is_empty()
            && self.submission != SubmissionState::Submitting
    }

    /// Fetches open events and the active member directory.
    pub async fn reload(&mut self, backend: &dyn Backend) {
        self.events = match events_repo::list_open_events(backend).await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "open event list load failed");
                Vec::new()
            }
        };
        self.directory = MemberDirectory::load_active(backend).await;
        self.loaded = true;

        // Keep the chosen event only if it is still open.
        if let Some(id) = self.selected_event.as_ref().map(|e| e.event_id.clone()) {
            match self.events.iter().find(|e| e.event_id == id).cloned() {
                Some(fresh) => self.selected_event = Some(fresh),
                None => self.select_event(""),
            }
        }
        self.club_selection = None;
    }

    /// A new event starts an empty roster bounded by that event's limit.
    pub fn select_event(&mut self, event_id: &str) {
        let event = self.events.iter().find(|e| e.event_id == event_id).cloned();
        if self.selected_event.as_ref().map(|e| &e.event_id) == event.as_ref().map(|e| &e.event_id)
        {
            return;
        }
        let limit = event.as_ref().and_then(|e| e.team_member_limit);
        self.selected_event = event;
        self.roster = Roster::new(limit);
        self.club_selection = None;
        self.search_query.clear();
    }

    /// Updates the captain inputs and verifies them. Changed inputs always
    /// drop the previous identity first.
    pub async fn verify_captain(
        &mut self,
        backend: &dyn Backend,
        name: &str,
        pin: &str,
        notifier: &mut dyn Notifier,
    ) {
        self.captain.set_name(name);
        self.captain.set_pin(pin);

        match self.captain.verify(backend).await {
            Ok(identity) => {
                let member_id = identity.member_id.clone();
                self.club_name = identity.club.clone();
                notifier.success("본인 확인 완료");
                if self.roster_owner.as_deref() != Some(member_id.as_str()) {
                    self.roster.clear();
                    self.club_selection = None;
                    self.search_query.clear();
                }
                self.roster_owner = Some(member_id);
            }
            Err(VerificationError::Transport(msg)) => {
                notifier.error(&format!("확인 실패: {}", msg));
            }
            Err(e) => notifier.error(&e.to_string()),
        }
    }

    pub fn set_club_name(&mut self, club_name: &str) {
        self.club_name = club_name.to_string();
    }

    pub fn set_add_mode(&mut self, mode: AddMode) {
        self.add_mode = mode;
    }

    pub fn choose_club(&mut self, club: &str) {
        if club.is_empty() {
            self.club_selection = None;
            return;
        }
        self.club_selection = Some(ClubSelection::open(club, &self.directory, &self.roster));
    }

    pub fn toggle_club_member(&mut self, member_id: &str) {
        if let Some(sel) = self.club_selection.as_mut() {
            sel.toggle(member_id, &self.roster);
        }
    }

    pub fn select_all_in_club(&mut self, notifier: &mut dyn Notifier) {
        if let Some(sel) = self.club_selection.as_mut() {
            if let Err(e) = sel.select_all(&self.roster) {
                notifier.error(&e.to_string());
            }
        }
    }

    pub fn deselect_all_in_club(&mut self) {
        if let Some(sel) = self.club_selection.as_mut() {
            sel.deselect_all(&self.roster);
        }
    }

    pub fn add_checked_from_club(&mut self, notifier: &mut dyn Notifier) {
        let Some(sel) = self.club_selection.as_ref() else {
            return;
        };
        match sel.commit(&mut self.roster) {
            Ok(added) => {
                self.club_selection = None;
                if added > 0 {
                    notifier.success(&format!("{}명 추가됨", added));
                }
            }
            Err(e) => notifier.error(&e.to_string()),
        }
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn add_from_search(&mut self, member_id: &str, notifier: &mut dyn Notifier) {
        match selection::add_search_hit(&self.directory, member_id, &mut self.roster) {
            Ok(Some(_)) => self.search_query.clear(),
            Ok(None) => notifier.error("회원을 찾을 수 없습니다."),
            Err(e) => notifier.error(&e.to_string()),
        }
    }

    pub fn remove_from_roster(&mut self, member_id: &str) {
        self.roster.remove(member_id);
    }

    /// `Idle -> Validating -> Submitting`. On error the state is `Failed`
    /// and no remote call may be made.
    pub fn begin_submission(&mut self) -> Result<TeamEntryPayload, SubmissionError> {
        if self.submission == SubmissionState::Submitting {
            return Err(SubmissionError::AlreadySubmitting);
        }
        self.submission = SubmissionState::Validating;
        match self.validate() {
            Ok(payload) => {
                self.submission = SubmissionState::Submitting;
                Ok(payload)
            }
            Err(e) => {
                self.submission = SubmissionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn validate(&self) -> Result<TeamEntryPayload, SubmissionError> {
        let event = self.selected_event.as_ref().ok_or(SubmissionError::NoEvent)?;
        if self.captain.verified().is_none() {
            return Err(SubmissionError::NotVerified);
        }
        let club_name = self.club_name.trim();
        if club_name.is_empty() {
            return Err(SubmissionError::NoClubName);
        }
        if self.roster.is_empty() {
            return Err(SubmissionError::EmptyRoster);
        }
        Ok(TeamEntryPayload {
            event_id: event.event_id.clone(),
            captain_name: self.captain.name().trim().to_string(),
            captain_pin: self.captain.pin().to_string(),
            club_name: club_name.to_string(),
            members: self.roster.to_entry_members(),
        })
    }

    /// `Submitting -> Succeeded | Failed`. Success wipes roster, identity,
    /// club and credentials.
    pub fn finish_submission(
        &mut self,
        outcome: Result<(), SubmissionError>,
        notifier: &mut dyn Notifier,
    ) {
        match outcome {
            Ok(()) => {
                self.submission = SubmissionState::Succeeded;
                self.roster.clear();
                self.club_name.clear();
                self.captain.clear();
                self.roster_owner = None;
                self.club_selection = None;
                self.search_query.clear();
                notifier.success("단체전 참가 신청 완료!");
            }
            Err(e) => {
                let message = e.to_string();
                notifier.error(&message);
                self.submission = SubmissionState::Failed(message);
            }
        }
    }

    /// The call carrying the payload was dropped before an outcome came
    /// back; the backend may or may not have recorded the entry.
    pub fn abandon_submission(&mut self, notifier: &mut dyn Notifier) {
        if self.submission == SubmissionState::Submitting {
            let message = SubmissionError::Interrupted.to_string();
            notifier.error(&message);
            self.submission = SubmissionState::Failed(message);
        }
    }

    /// Returns to `Idle` once the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if matches!(
            self.submission,
            SubmissionState::Succeeded | SubmissionState::Failed(_)
        ) {
            self.submission = SubmissionState::Idle;
        }
    }

    /// Validation, remote call and outcome in one step, for callers that can
    /// hold the form for the whole call.
    pub async fn submit(&mut self, backend: &dyn Backend, notifier: &mut dyn Notifier) {
        let payload = match self.begin_submission() {
            Ok(payload) => payload,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        let outcome = send_team_entry(backend, &payload).await;
        self.finish_submission(outcome, notifier);
    }
}

/// Issues `rpc_submit_team_entry`. No retry.
pub async fn send_team_entry(
    backend: &dyn Backend,
    payload: &TeamEntryPayload,
) -> Result<(), SubmissionError> {
    let result = entry_commands_repo::submit_team_entry(
        backend,
        NewTeamEntry {
            event_id: &payload.event_id,
            captain_name: &payload.captain_name,
            captain_pin: &payload.captain_pin,
            club_name: &payload.club_name,
            members: &payload.members,
        },
    )
    .await;

    match result {
        Ok(outcome) if outcome.ok => {
            info!(
                event_id = %payload.event_id,
                club = %payload.club_name,
                members = payload.members.len(),
                "team entry submitted"
            );
            Ok(())
        }
        Ok(outcome) => {
            let message = outcome
                .message
                .unwrap_or_else(|| "신청할 수 없습니다.".to_string());
            warn!(event_id = %payload.event_id, message = %message, "team entry rejected");
            Err(SubmissionError::Rejected(message))
        }
        Err(e) => {
            warn!(event_id = %payload.event_id, error = %e, "team entry call failed");
            Err(SubmissionError::Transport(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::backend::BackendError;
    use crate::services::notifier::FlashMessages;
    use crate::testing::{event_json, member_json, MemoryBackend};
    use serde_json::json;

    fn backend(limit: Option<i64>) -> MemoryBackend {
        MemoryBackend::new()
            .with_table("events", json!([event_json("E1", limit), event_json("E2", None)]))
            .with_table(
                "members_public",
                json!([
                    member_json("X", "Xavier", "Sunrise", "활성"),
                    member_json("Y", "Yuna", "Sunrise", "활성"),
                    member_json("Z", "Zoe", "Sunrise", "활성"),
                    member_json("K", "Kim", "Sunrise", "활성"),
                ]),
            )
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({
                    "ok": true, "member_id": "K", "name": "Kim",
                    "club": "Sunrise", "grade": "A"
                })),
            )
    }

    async fn ready_form(backend: &MemoryBackend, flash: &mut FlashMessages) -> TeamEntryForm {
        let mut form = TeamEntryForm::default();
        form.reload(backend).await;
        form.select_event("E1");
        form.verify_captain(backend, "Kim", "123456", flash).await;
        form
    }

    #[tokio::test]
    async fn verification_prefills_club() {
        let backend = backend(Some(2));
        let mut flash = FlashMessages::default();
        let form = ready_form(&backend, &mut flash).await;
        assert_eq!(form.club_name(), "Sunrise");
        assert!(form.can_edit_roster());
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn rejected_pin_keeps_submit_disabled() {
        let backend = backend(None).on_rpc(
            entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
            Ok(json!({ "ok": false, "message": "PIN mismatch" })),
        );
        // The first queued answer accepts; the second rejects.
        let mut flash = FlashMessages::default();
        let mut form = TeamEntryForm::default();
        form.reload(&backend).await;
        form.select_event("E1");
        form.verify_captain(&backend, "Someone", "111111", &mut flash).await;
        flash.take();

        form.verify_captain(&backend, "Kim", "123456", &mut flash).await;
        let notices = flash.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "PIN mismatch");
        assert!(form.captain().verified().is_none());
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn club_select_all_over_limit_then_search_hits_capacity() {
        let backend = backend(Some(2));
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        flash.take();

        form.choose_club("Sunrise");
        form.select_all_in_club(&mut flash);
        let notices = flash.take();
        assert_eq!(notices[0].message, "인원 제한(2명)을 초과합니다.");
        assert!(form.roster().is_empty());

        form.toggle_club_member("X");
        form.toggle_club_member("Y");
        form.add_checked_from_club(&mut flash);
        assert_eq!(form.roster().len(), 2);
        assert!(form.club_selection().is_none());

        form.set_add_mode(AddMode::Search);
        form.set_search_query("zo");
        assert_eq!(form.search_results().len(), 1);
        flash.take();
        form.add_from_search("Z", &mut flash);
        assert_eq!(form.roster().len(), 2);
        assert!(flash.take()[0].is_error());
    }

    #[tokio::test]
    async fn preconditions_fail_without_remote_call() {
        let backend = backend(None);
        let mut flash = FlashMessages::default();
        let mut form = TeamEntryForm::default();
        form.reload(&backend).await;

        assert_eq!(form.begin_submission(), Err(SubmissionError::NoEvent));
        form.select_event("E1");
        assert_eq!(form.begin_submission(), Err(SubmissionError::NotVerified));
        form.verify_captain(&backend, "Kim", "123456", &mut flash).await;
        form.set_club_name("  ");
        assert_eq!(form.begin_submission(), Err(SubmissionError::NoClubName));
        form.set_club_name("Sunrise");
        assert_eq!(form.begin_submission(), Err(SubmissionError::EmptyRoster));
        assert_eq!(
            form.submission(),
            &SubmissionState::Failed("선수를 1명 이상 추가해주세요.".to_string())
        );

        assert!(backend
            .rpc_calls(entry_commands_repo::RPC_SUBMIT_TEAM_ENTRY)
            .is_empty());
    }

    #[tokio::test]
    async fn successful_submission_resets_everything() {
        let backend = backend(Some(2)).on_rpc(
            entry_commands_repo::RPC_SUBMIT_TEAM_ENTRY,
            Ok(json!({ "ok": true })),
        );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.set_add_mode(AddMode::Search);
        form.add_from_search("X", &mut flash);
        form.add_from_search("Y", &mut flash);

        form.submit(&backend, &mut flash).await;

        let calls = backend.rpc_calls(entry_commands_repo::RPC_SUBMIT_TEAM_ENTRY);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["p_event_id"], "E1");
        assert_eq!(calls[0]["p_captain_pin"], "123456");
        assert_eq!(calls[0]["p_club_name"], "Sunrise");
        assert_eq!(calls[0]["p_members"][0]["member_id"], "X");
        assert_eq!(calls[0]["p_members"][0]["order"], 1);
        assert_eq!(calls[0]["p_members"][1]["order"], 2);

        assert_eq!(form.submission(), &SubmissionState::Succeeded);
        assert!(form.roster().is_empty());
        assert!(form.captain().verified().is_none());
        assert_eq!(form.captain().pin(), "");
        assert_eq!(form.captain().name(), "");
        assert_eq!(form.club_name(), "");

        form.acknowledge();
        assert_eq!(form.submission(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn remote_rejection_keeps_input() {
        let backend = backend(None).on_rpc(
            entry_commands_repo::RPC_SUBMIT_TEAM_ENTRY,
            Ok(json!({ "ok": false, "message": "이미 신청된 클럽입니다." })),
        );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("X", &mut flash);
        flash.take();

        form.submit(&backend, &mut flash).await;
        assert_eq!(
            form.submission(),
            &SubmissionState::Failed("이미 신청된 클럽입니다.".to_string())
        );
        assert_eq!(form.roster().len(), 1);
        assert!(form.captain().verified().is_some());
        assert_eq!(flash.take()[0].message, "이미 신청된 클럽입니다.");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let backend = backend(None).on_rpc(
            entry_commands_repo::RPC_SUBMIT_TEAM_ENTRY,
            Err(BackendError::Transport("timed out".to_string())),
        );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("X", &mut flash);
        flash.take();

        form.submit(&backend, &mut flash).await;
        assert_eq!(
            form.submission(),
            &SubmissionState::Failed("신청 실패: timed out".to_string())
        );
    }

    #[tokio::test]
    async fn second_submission_while_in_flight_is_rejected() {
        let backend = backend(None);
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("X", &mut flash);

        assert!(form.begin_submission().is_ok());
        assert!(!form.can_submit());
        assert_eq!(
            form.begin_submission(),
            Err(SubmissionError::AlreadySubmitting)
        );
    }

    #[tokio::test]
    async fn changing_event_starts_a_new_roster() {
        let backend = backend(Some(2));
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("X", &mut flash);

        form.select_event("E1");
        assert_eq!(form.roster().len(), 1);

        form.select_event("E2");
        assert!(form.roster().is_empty());
        assert_eq!(form.roster().limit(), None);
    }

    #[tokio::test]
    async fn verifying_a_different_captain_discards_roster() {
        let backend = backend(None).on_rpc(
            entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
            Ok(json!({ "ok": true, "member_id": "X", "name": "Xavier", "club": "Harbor" })),
        );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("Y", &mut flash);

        form.verify_captain(&backend, "Xavier", "654321", &mut flash).await;
        assert_eq!(form.captain().verified().map(|v| v.member_id.as_str()), Some("X"));
        assert_eq!(form.club_name(), "Harbor");
        assert!(form.roster().is_empty());
    }

    #[tokio::test]
    async fn failed_verification_in_between_still_discards_previous_roster() {
        let backend = backend(None)
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({ "ok": false, "message": "PIN mismatch" })),
            )
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({ "ok": true, "member_id": "X", "name": "Xavier", "club": "Sunrise" })),
            );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("Y", &mut flash);
        assert_eq!(form.roster().len(), 1);

        form.verify_captain(&backend, "Xavier", "000000", &mut flash).await;
        assert!(form.captain().verified().is_none());

        form.verify_captain(&backend, "Xavier", "654321", &mut flash).await;
        assert_eq!(form.captain().verified().map(|v| v.member_id.as_str()), Some("X"));
        assert!(form.roster().is_empty());
    }

    #[tokio::test]
    async fn same_captain_after_failed_retry_keeps_roster() {
        let backend = backend(None)
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({ "ok": false, "message": "PIN mismatch" })),
            )
            .on_rpc(
                entry_commands_repo::RPC_VERIFY_MEMBER_PIN,
                Ok(json!({ "ok": true, "member_id": "K", "name": "Kim", "club": "Sunrise" })),
            );
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("Y", &mut flash);

        form.verify_captain(&backend, "Kim", "999999", &mut flash).await;
        form.verify_captain(&backend, "Kim", "123456", &mut flash).await;
        assert_eq!(form.roster().len(), 1);
    }

    #[tokio::test]
    async fn abandoned_submission_unblocks_the_next_one() {
        let backend = backend(None);
        let mut flash = FlashMessages::default();
        let mut form = ready_form(&backend, &mut flash).await;
        form.add_from_search("X", &mut flash);
        flash.take();

        form.begin_submission().unwrap();
        form.abandon_submission(&mut flash);
        assert!(matches!(form.submission(), SubmissionState::Failed(_)));
        assert!(flash.take()[0].is_error());
        assert_eq!(form.roster().len(), 1);

        // Only an in-flight submission can be abandoned.
        form.acknowledge();
        form.abandon_submission(&mut flash);
        assert_eq!(form.submission(), &SubmissionState::Idle);
        assert!(flash.take().is_empty());
        assert!(form.begin_submission().is_ok());
    }
}
