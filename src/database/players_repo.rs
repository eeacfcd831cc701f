use serde_json::json;

use crate::database::backend::{Backend, BackendResult};
use crate::models::MemberHistoryResponse;

pub const RPC_GET_MEMBER_HISTORY: &str = "get_member_history";

pub async fn get_member_history(
    backend: &dyn Backend,
    member_id: &str,
    season_year: i32,
) -> BackendResult<MemberHistoryResponse> {
    let value = backend
        .rpc(
            RPC_GET_MEMBER_HISTORY,
            json!({ "p_member_id": member_id, "p_season_year": season_year }),
        )
        .await?;
    Ok(serde_json::from_value(value)?)
}
