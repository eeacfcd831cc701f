use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::services::event_entry_service::{self, Slot};
use crate::services::event_entry_view::{self, EventEntryView};
use crate::services::notifier::{Notice, Notifier};
use crate::web::middleware::session::CurrentSession;
use crate::web::render;
use crate::web::session::{InFlight, PortalSession};
use crate::web::state::AppState;

const PAGE: &str = "/entry";

#[derive(Template)]
#[template(path = "event_entry.html")]
pub struct EventEntryTemplate {
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub view: EventEntryView,
}

fn back() -> Response {
    Redirect::to(PAGE).into_response()
}

pub async fn event_entry_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    if !s.event_entry.is_loaded() {
        s.event_entry.reload(state.backend.as_ref()).await;
    }
    render(&EventEntryTemplate {
        active: "entry",
        notices: s.event_flash.take(),
        view: event_entry_view::build_view(&s.event_entry),
    })
}

pub async fn reload_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.event_entry.reload(state.backend.as_ref()).await;
    back()
}

#[derive(Debug, Deserialize)]
pub struct SelectEventForm {
    #[serde(default)]
    pub event_id: String,
}

pub async fn select_event_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SelectEventForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard
        .event_entry
        .select_event(state.backend.as_ref(), &form.event_id)
        .await;
    back()
}

#[derive(Debug, Deserialize)]
pub struct SelectDivisionForm {
    #[serde(default)]
    pub division_id: String,
}

pub async fn select_division_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SelectDivisionForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    guard.event_entry.select_division(&form.division_id);
    back()
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    pub slot: String,
    #[serde(default)]
    pub q: String,
}

pub async fn query_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<QueryForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    if let Some(slot) = Slot::parse(&form.slot) {
        guard.event_entry.set_query(slot, &form.q);
    }
    back()
}

#[derive(Debug, Deserialize)]
pub struct PickForm {
    pub slot: String,
    pub member_id: String,
}

pub async fn pick_handler(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<PickForm>,
) -> Response {
    let mut guard = session.handle.lock().await;
    if let Some(slot) = Slot::parse(&form.slot) {
        guard.event_entry.pick_member(slot, &form.member_id);
    }
    back()
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub pin: String,
}

pub async fn submit_handler(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<SubmitForm>,
) -> Response {
    let payload = {
        let mut guard = session.handle.lock().await;
        let s = &mut *guard;
        s.event_entry.set_pin(&form.pin);
        match s.event_entry.begin_submission() {
            Ok(payload) => payload,
            Err(message) => {
                s.event_flash.error(&message);
                return back();
            }
        }
    };

    let in_flight = InFlight::new(session.handle.clone(), PortalSession::abandon_event_submission);
    let outcome = event_entry_service::send_doubles_entry(state.backend.as_ref(), &payload).await;

    let mut guard = session.handle.lock().await;
    let s = &mut *guard;
    s.event_entry.finish_submission(outcome, &mut s.event_flash);
    drop(guard);
    in_flight.settle();
    back()
}
