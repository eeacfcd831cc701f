use crate::database::backend::{Backend, BackendResult, RowQuery};
use crate::models::{Event, EventDivisionRow, EventRow};

pub async fn list_open_events(backend: &dyn Backend) -> BackendResult<Vec<Event>> {
    let query = RowQuery::select("*")
        .eq("status", "OPEN")
        .order_desc("event_date");
    let value = backend.select("events", &query).await?;
    let rows: Vec<EventRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(Event::from).collect())
}

/// Every event regardless of status, newest first.
pub async fn list_all_events(backend: &dyn Backend) -> BackendResult<Vec<Event>> {
    let query = RowQuery::select("*").order_desc("event_date");
    let value = backend.select("events", &query).await?;
    let rows: Vec<EventRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(Event::from).collect())
}

pub async fn list_event_divisions(
    backend: &dyn Backend,
    event_id: &str,
) -> BackendResult<Vec<EventDivisionRow>> {
    let query = RowQuery::select("division_id, division_name")
        .eq("event_id", event_id)
        .order_asc("division_name");
    let value = backend.select("event_divisions", &query).await?;
    Ok(serde_json::from_value(value)?)
}
