use serde::Serialize;
use serde_json::json;

use crate::database::backend::{Backend, BackendResult};
use crate::models::{RpcOutcome, VerifyPinResponse};

pub const RPC_VERIFY_MEMBER_PIN: &str = "rpc_verify_member_pin";
pub const RPC_SUBMIT_TEAM_ENTRY: &str = "rpc_submit_team_entry";
pub const RPC_APPLY_TEAM_TO_EVENT: &str = "rpc_apply_team_to_event";
pub const RPC_CHANGE_PIN: &str = "rpc_change_pin";

/// One player line of a team entry; `order` is 1-based.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TeamEntryMember {
    pub member_id: String,
    pub name: String,
    pub gender: String,
    pub grade: String,
    pub order: usize,
}

pub struct NewTeamEntry<'a> {
    pub event_id: &'a str,
    pub captain_name: &'a str,
    pub captain_pin: &'a str,
    pub club_name: &'a str,
    pub members: &'a [TeamEntryMember],
}

pub struct NewDoublesEntry<'a> {
    pub event_id: &'a str,
    pub division_id: &'a str,
    pub member1_id: &'a str,
    pub member2_id: &'a str,
}

pub async fn verify_member_pin(
    backend: &dyn Backend,
    name: &str,
    pin: &str,
) -> BackendResult<VerifyPinResponse> {
    let value = backend
        .rpc(RPC_VERIFY_MEMBER_PIN, json!({ "p_name": name, "p_pin": pin }))
        .await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn submit_team_entry(
    backend: &dyn Backend,
    entry: NewTeamEntry<'_>,
) -> BackendResult<RpcOutcome> {
    let value = backend
        .rpc(
            RPC_SUBMIT_TEAM_ENTRY,
            json!({
                "p_event_id": entry.event_id,
                "p_captain_name": entry.captain_name,
                "p_captain_pin": entry.captain_pin,
                "p_club_name": entry.club_name,
                "p_members": entry.members,
            }),
        )
        .await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn apply_team_to_event(
    backend: &dyn Backend,
    entry: NewDoublesEntry<'_>,
) -> BackendResult<RpcOutcome> {
    let value = backend
        .rpc(
            RPC_APPLY_TEAM_TO_EVENT,
            json!({
                "p_event_id": entry.event_id,
                "p_division_id": entry.division_id,
                "p_member1_id": entry.member1_id,
                "p_member2_id": entry.member2_id,
            }),
        )
        .await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn change_pin(
    backend: &dyn Backend,
    name: &str,
    current_pin: &str,
    new_pin: &str,
) -> BackendResult<RpcOutcome> {
    let value = backend
        .rpc(
            RPC_CHANGE_PIN,
            json!({
                "p_name": name,
                "p_current_pin": current_pin,
                "p_new_pin": new_pin,
            }),
        )
        .await?;
    Ok(serde_json::from_value(value)?)
}
