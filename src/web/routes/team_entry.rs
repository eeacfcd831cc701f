use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::debug;

use crate::services::notifier::{FlashMessages, Notice, Notifier};
use crate::services::selection::AddMode;
use crate::services::team_entry_service::{self, TeamEntryForm};
use crate::services::team_entry_view::{self, TeamEntryView};
use crate::web::middleware::session::CurrentSession;
use crate::web::render;
use crate::web::session::{InFlight, PortalSession};
use crate::web::state::AppState;

const PAGE: &str = "/entry/team";

#[derive(Template)]
#[template(path = "team_entry.html")]
pub struct TeamEntryTemplate {
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub view: TeamEntryView,
}

fn back() -> Response {
    Redirect::to(PAGE).into_response()
}

pub async fn team_entry_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    if !s.team_entry.is_loaded() {
        s.team_entry.reload(state.backend.as_ref()).await;
    }
    let view = team_entry_view::build_view(&s.team_entry);
    // The outcome has now been rendered once.
    s.team_entry.acknowledge();

    render(&TeamEntryTemplate {
        active: "team",
        notices: s.team_flash.take(),
        view,
    })
}

pub async fn reload_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.team_entry.reload(state.backend.as_ref()).await;
    back()
}

#[derive(Debug, Deserialize)]
pub struct SelectEventForm {
    #[serde(default)]
    pub event_id: String,
}

pub async fn select_event_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SelectEventForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.team_entry.select_event(&form.event_id);
    back()
}

#[derive(Debug, Deserialize)]
pub struct VerifyCaptainForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pin: String,
}

pub async fn verify_captain_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<VerifyCaptainForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    s.team_entry
        .verify_captain(state.backend.as_ref(), &form.name, &form.pin, &mut s.team_flash)
        .await;
    back()
}

#[derive(Debug, Deserialize)]
pub struct ClubNameForm {
    #[serde(default)]
    pub club_name: String,
}

pub async fn club_name_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<ClubNameForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.team_entry.set_club_name(&form.club_name);
    back()
}

#[derive(Debug, Deserialize)]
pub struct AddModeForm {
    pub mode: String,
}

pub async fn add_mode_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<AddModeForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    if let Some(mode) = AddMode::parse(&form.mode) {
        guard.team_entry.set_add_mode(mode);
    }
    back()
}

/// Runs a roster edit, refusing it until a captain is verified and a club
/// is named.
async fn edit_roster<F>(session: &CurrentSession, edit: F) -> Response
where
    F: FnOnce(&mut TeamEntryForm, &mut FlashMessages) + Send,
{
    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    if s.team_entry.can_edit_roster() {
        edit(&mut s.team_entry, &mut s.team_flash);
    } else {
        debug!(session = %session.id, "roster edit before captain verification");
        s.team_flash.error("대표자 본인확인 후 클럽명을 입력해주세요.");
    }
    back()
}

#[derive(Debug, Deserialize)]
pub struct ChooseClubForm {
    #[serde(default)]
    pub club: String,
}

pub async fn choose_club_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<ChooseClubForm>,
) -> Response {
    edit_roster(&session, |team, _| team.choose_club(&form.club)).await
}

#[derive(Debug, Deserialize)]
pub struct MemberForm {
    pub member_id: String,
}

pub async fn toggle_member_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<MemberForm>,
) -> Response {
    edit_roster(&session, |team, _| team.toggle_club_member(&form.member_id)).await
}

pub async fn select_all_handler(Extension(session): Extension<CurrentSession>) -> Response {
    edit_roster(&session, |team, flash| team.select_all_in_club(flash)).await
}

pub async fn deselect_all_handler(Extension(session): Extension<CurrentSession>) -> Response {
    edit_roster(&session, |team, _| team.deselect_all_in_club()).await
}

pub async fn add_checked_handler(Extension(session): Extension<CurrentSession>) -> Response {
    edit_roster(&session, |team, flash| team.add_checked_from_club(flash)).await
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

pub async fn search_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SearchForm>,
) -> Response {
    edit_roster(&session, |team, _| team.set_search_query(&form.q)).await
}

pub async fn add_search_hit_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<MemberForm>,
) -> Response {
    edit_roster(&session, |team, flash| {
        team.add_from_search(&form.member_id, flash)
    })
    .await
}

pub async fn remove_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<MemberForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.team_entry.remove_from_roster(&form.member_id);
    back()
}

/// The session lock is released while the remote call runs; the
/// `Submitting` state keeps a second submit from starting meanwhile.
pub async fn submit_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let payload = {
        let mut guard = session.handle.lock().await;
        let s = &mut *guard;
        match s.team_entry.begin_submission() {
            Ok(payload) => payload,
            Err(e) => {
                s.team_flash.error(&e.to_string());
                return back();
            }
        }
    };

    let in_flight = InFlight::new(session.handle.clone(), PortalSession::abandon_team_submission);
    let outcome = team_entry_service::send_team_entry(state.backend.as_ref(), &payload).await;

    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    s.team_entry.finish_submission(outcome, &mut s.team_flash);
    drop(guard);
    in_flight.settle();
    back()
}
