use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use cookie::{Cookie, SameSite};

use crate::web::session::SessionHandle;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "portal_session";

#[derive(Clone)]
pub struct CurrentSession {
    pub id: String,
    pub handle: SessionHandle,
}

pub async fn attach_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            Cookie::split_parse(cookies)
                .filter_map(Result::ok)
                .find(|c| c.name() == SESSION_COOKIE)
                .map(|c| c.value().to_string())
        });

    let (id, handle, created) = state.sessions.get_or_create(existing.as_deref());
    request.extensions_mut().insert(CurrentSession {
        id: id.clone(),
        handle,
    });

    let mut response = next.run(request).await;

    if created {
        let mut session_cookie = Cookie::new(SESSION_COOKIE, id);
        session_cookie.set_path("/");
        session_cookie.set_http_only(true);
        session_cookie.set_same_site(SameSite::Lax);
        if let Ok(value) = HeaderValue::from_str(&session_cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
