use askama::Template;
use axum::{extract::State, response::Response, Form};
use chrono::Utc;
use serde::Deserialize;

use crate::services::notifier::{FlashMessages, Notice, Notifier};
use crate::services::registration_service::{self, RegisterPageView, RegistrationRequest};
use crate::web::render;
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub active: &'static str,
    pub notices: Vec<Notice>,
    pub page: RegisterPageView,
}

pub async fn register_page(State(state): State<AppState>) -> Response {
    let grades = registration_service::load_grade_options(state.backend.as_ref()).await;
    render(&RegisterTemplate {
        active: "register",
        notices: Vec::new(),
        page: RegisterPageView::new(grades, RegistrationRequest::default()),
    })
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub club: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub grade: String,
    /// Present only when the checkbox is ticked.
    pub agreed: Option<String>,
}

pub async fn register_handler(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let request = RegistrationRequest {
        name: form.name,
        gender: form.gender,
        phone: form.phone,
        club: form.club,
        division: form.division,
        grade: form.grade,
        agreed: form.agreed.is_some(),
    };

    let mut flash = FlashMessages::default();
    let page = match registration_service::register(state.backend.as_ref(), &request, Utc::now()).await
    {
        Ok(_) => {
            flash.success("동호인 등록 신청이 완료되었습니다!");
            RegisterPageView::completed()
        }
        Err(e) => {
            flash.error(&e.to_string());
            let grades = registration_service::load_grade_options(state.backend.as_ref()).await;
            RegisterPageView::new(grades, request)
        }
    };

    render(&RegisterTemplate {
        active: "register",
        notices: flash.take(),
        page,
    })
}
