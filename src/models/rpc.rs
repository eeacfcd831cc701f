use serde::Deserialize;

/// The `{ ok, message }` envelope every write procedure returns.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcOutcome {
    pub ok: bool,
    pub message: Option<String>,
}

/// Response of `rpc_verify_member_pin`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPinResponse {
    pub ok: bool,
    pub member_id: Option<String>,
    pub name: Option<String>,
    pub club: Option<String>,
    pub grade: Option<String>,
    pub message: Option<String>,
}
