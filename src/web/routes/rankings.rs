use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::services::ranking_service::{self, RankingPageView, RankingQuery};
use crate::web::state::AppState;
use crate::web::{current_year, render};

#[derive(Template)]
#[template(path = "rankings.html")]
pub struct RankingsTemplate {
    pub active: &'static str,
    pub page: RankingPageView,
}

pub async fn rankings_handler(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Response {
    let page =
        ranking_service::load_ranking_page(state.backend.as_ref(), &query, current_year()).await;
    render(&RankingsTemplate {
        active: "rankings",
        page,
    })
}
