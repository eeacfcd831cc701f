use askama::Template;
use axum::{extract::State, response::Response, Form};
use serde::Deserialize;

use crate::services::notifier::{FlashMessages, Notice, Notifier};
use crate::services::pin_service::{self, PinChangeRequest};
use crate::web::render;
use crate::web::state::AppState;

/// PIN fields are never echoed back; only the name survives a round trip.
#[derive(Template)]
#[template(path = "pin.html")]
pub struct PinTemplate {
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub name: String,
}

pub async fn pin_page() -> Response {
    render(&PinTemplate {
        active: "pin",
        notices: Vec::new(),
        name: String::new(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PinChangeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_pin: String,
    #[serde(default)]
    pub new_pin: String,
    #[serde(default)]
    pub confirm_pin: String,
}

pub async fn pin_change_handler(
    State(state): State<AppState>,
    Form(form): Form<PinChangeForm>,
) -> Response {
    let request = PinChangeRequest {
        name: form.name,
        current_pin: form.current_pin,
        new_pin: form.new_pin,
        confirm_pin: form.confirm_pin,
    };

    let mut flash = FlashMessages::default();
    match pin_service::change_pin(state.backend.as_ref(), &request).await {
        Ok(()) => flash.success("PIN이 변경되었습니다."),
        Err(e) => flash.error(&e.to_string()),
    }

    render(&PinTemplate {
        active: "pin",
        notices: flash.take(),
        name: request.name,
    })
}
