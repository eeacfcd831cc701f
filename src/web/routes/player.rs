use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};

use crate::services::player_service::{self, PlayerPageView, PlayerQuery};
use crate::web::state::AppState;
use crate::web::{current_year, render};

#[derive(Template)]
#[template(path = "player.html")]
pub struct PlayerTemplate {
    pub active: &'static str,
    pub page: PlayerPageView,
}

pub async fn player_handler(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Query(query): Query<PlayerQuery>,
) -> Response {
    let page =
        player_service::load_player_page(state.backend.as_ref(), &member_id, &query, current_year())
            .await;
    render(&PlayerTemplate {
        active: "rankings",
        page,
    })
}
