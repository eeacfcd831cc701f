use crate::database::backend::{Backend, BackendResult, RowQuery};
use crate::models::EventEntryRow;

const ENTRY_COLUMNS: &str = "*, teams ( team_name ), event_divisions ( division_name )";
const CANCELLED: &str = "취소";

/// Entries of one event, newest first, cancelled ones left out.
pub async fn list_event_entries(
    backend: &dyn Backend,
    event_id: &str,
) -> BackendResult<Vec<EventEntryRow>> {
    let query = RowQuery::select(ENTRY_COLUMNS)
        .eq("event_id", event_id)
        .neq("entry_status", CANCELLED)
        .order_desc("applied_at");
    let value = backend.select("event_entries", &query).await?;
    Ok(serde_json::from_value(value)?)
}
