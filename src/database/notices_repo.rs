use crate::database::backend::{Backend, BackendResult, RowQuery};
use crate::models::NoticeRow;

pub async fn list_notices(backend: &dyn Backend) -> BackendResult<Vec<NoticeRow>> {
    let query = RowQuery::select("*")
        .order_desc("pinned")
        .order_desc("created_at");
    let value = backend.select("notices", &query).await?;
    Ok(serde_json::from_value(value)?)
}
