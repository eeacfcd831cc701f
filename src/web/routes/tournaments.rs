use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::services::tournament_service::{self, TournamentPageView, TournamentQuery};
use crate::web::state::AppState;
use crate::web::{current_year, render};

#[derive(Template)]
#[template(path = "tournaments.html")]
pub struct TournamentsTemplate {
    pub active: &'static str,
    pub page: TournamentPageView,
}

pub async fn tournaments_handler(
    State(state): State<AppState>,
    Query(query): Query<TournamentQuery>,
) -> Response {
    let page =
        tournament_service::load_tournament_page(state.backend.as_ref(), &query, current_year())
            .await;
    render(&TournamentsTemplate {
        active: "tournament",
        page,
    })
}
