pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

use askama::Template;
use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{Html, IntoResponse, Response},
    routing::{get, get_service, post},
    Router,
};
use chrono::Datelike;
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::web::middleware::session::attach_session;
use crate::web::routes::{
    apply, board, event_entry, notices, pin, player, rankings, register, search, team_entry,
    tournaments,
};
use crate::web::state::AppState;

pub fn router(state: AppState) -> Router {
    // Entry pages keep per-browser form state and need a session.
    let entry_routes = Router::new()
        .route("/entry", get(event_entry::event_entry_page))
        .route("/entry/reload", post(event_entry::reload_handler))
        .route("/entry/event", post(event_entry::select_event_handler))
        .route("/entry/division", post(event_entry::select_division_handler))
        .route("/entry/query", post(event_entry::query_handler))
        .route("/entry/pick", post(event_entry::pick_handler))
        .route("/entry/submit", post(event_entry::submit_handler))
        .route("/entry/team", get(team_entry::team_entry_page))
        .route("/entry/team/reload", post(team_entry::reload_handler))
        .route("/entry/team/event", post(team_entry::select_event_handler))
        .route("/entry/team/verify", post(team_entry::verify_captain_handler))
        .route("/entry/team/club-name", post(team_entry::club_name_handler))
        .route("/entry/team/mode", post(team_entry::add_mode_handler))
        .route("/entry/team/club", post(team_entry::choose_club_handler))
        .route("/entry/team/club/toggle", post(team_entry::toggle_member_handler))
        .route("/entry/team/club/select-all", post(team_entry::select_all_handler))
        .route("/entry/team/club/deselect-all", post(team_entry::deselect_all_handler))
        .route("/entry/team/club/add", post(team_entry::add_checked_handler))
        .route("/entry/team/search", post(team_entry::search_handler))
        .route("/entry/team/search/add", post(team_entry::add_search_hit_handler))
        .route("/entry/team/remove", post(team_entry::remove_handler))
        .route("/entry/team/submit", post(team_entry::submit_handler))
        .layer(from_fn_with_state(state.clone(), attach_session));

    Router::new()
        .route("/", get(rankings::rankings_handler))
        .route("/tournament", get(tournaments::tournaments_handler))
        .route("/notice", get(notices::notices_handler))
        .route("/search", get(search::search_handler))
        .route("/player/:member_id", get(player::player_handler))
        .route("/apply", get(apply::apply_handler))
        .route("/register", get(register::register_page).post(register::register_handler))
        .route("/board", get(board::board_page))
        .route("/board/write", post(board::write_handler))
        .route("/board/mine", post(board::my_posts_handler))
        .route("/pin", get(pin::pin_page).post(pin::pin_change_handler))
        .merge(entry_routes)
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Renders a template, turning render failures into a logged 500.
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "template render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
