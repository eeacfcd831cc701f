use serde::Serialize;
use serde_json::json;

use crate::database::backend::{Backend, BackendResult};
use crate::models::GradeOptionRow;

pub const RPC_GET_GRADE_OPTIONS: &str = "get_grade_options";
const MEMBERS_TABLE: &str = "members";

/// A self-registered member row; written with `status = 휴면` until the fee
/// is confirmed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewMember {
    pub member_id: String,
    pub name: String,
    pub display_name: String,
    pub name_norm: String,
    pub gender: String,
    pub phone: String,
    pub club: String,
    pub division: String,
    pub grade: String,
    pub status: String,
    pub grade_source: String,
    pub registered_at: String,
}

pub async fn list_grade_options(backend: &dyn Backend) -> BackendResult<Vec<String>> {
    let value = backend.rpc(RPC_GET_GRADE_OPTIONS, json!({})).await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let rows: Vec<GradeOptionRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(|r| r.grade_value).collect())
}

pub async fn insert_member(backend: &dyn Backend, member: &NewMember) -> BackendResult<()> {
    backend.insert(MEMBERS_TABLE, json!([member])).await
}
