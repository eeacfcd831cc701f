use crate::database::backend::{Backend, BackendResult, RowQuery};
use crate::models::{TournamentResultRow, TournamentRow};

pub async fn list_tournaments_in_season(
    backend: &dyn Backend,
    season_year: i32,
) -> BackendResult<Vec<TournamentRow>> {
    let query = RowQuery::select("tournament_id, tournament_name, date")
        .gte("date", format!("{}-01-01", season_year))
        .lte("date", format!("{}-12-31", season_year))
        .order_desc("date");
    let value = backend.select("tournaments_master", &query).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn list_tournament_results(
    backend: &dyn Backend,
    tournament_name: &str,
    season_year: i32,
) -> BackendResult<Vec<TournamentResultRow>> {
    let query = RowQuery::select("*")
        .eq("tournament_name", tournament_name)
        .eq("season_year", season_year)
        .order_asc("division")
        .order_desc("points");
    let value = backend.select("tournament_results", &query).await?;
    Ok(serde_json::from_value(value)?)
}
