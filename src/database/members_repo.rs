use crate::database::backend::{Backend, BackendResult, RowQuery};
use crate::models::{Member, MemberRow, MemberStatus};

const MEMBERS_TABLE: &str = "members_public";
const MEMBER_COLUMNS: &str = "member_id, name, display_name, club, division, grade, gender, status";

pub async fn list_active_members(backend: &dyn Backend) -> BackendResult<Vec<Member>> {
    let query = RowQuery::select(MEMBER_COLUMNS)
        .eq("status", MemberStatus::Active.label())
        .order_asc("name");
    let value = backend.select(MEMBERS_TABLE, &query).await?;
    let rows: Vec<MemberRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(Member::from).collect())
}

pub async fn list_non_deleted_members(backend: &dyn Backend) -> BackendResult<Vec<Member>> {
    let query = RowQuery::select(MEMBER_COLUMNS)
        .neq("status", MemberStatus::Deleted.label())
        .order_asc("name");
    let value = backend.select(MEMBERS_TABLE, &query).await?;
    let rows: Vec<MemberRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(Member::from).collect())
}

pub async fn search_members(
    backend: &dyn Backend,
    needle: &str,
    limit: usize,
) -> BackendResult<Vec<Member>> {
    let query = RowQuery::select(MEMBER_COLUMNS)
        .neq("status", MemberStatus::Deleted.label())
        .any_ilike(&["name", "club", "member_id", "display_name"], needle)
        .limit(limit);
    let value = backend.select(MEMBERS_TABLE, &query).await?;
    let rows: Vec<MemberRow> = serde_json::from_value(value)?;
    Ok(rows.into_iter().map(Member::from).collect())
}
