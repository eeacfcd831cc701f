use thiserror::Error;
use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::entry_commands_repo;

pub const PIN_LENGTH: usize = 6;

/// Proof that the remote side accepted a name + PIN pair. Not a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub member_id: String,
    pub name: String,
    pub club: String,
    pub grade: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),
}

/// Keeps digits only and truncates to six, the way the PIN inputs behave.
pub fn sanitize_pin_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PIN_LENGTH)
        .collect()
}

pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_credentials(name: &str, pin: &str) -> Result<(), VerificationError> {
    if name.trim().is_empty() || !is_valid_pin(pin) {
        return Err(VerificationError::InvalidInput(
            "이름과 PIN 6자리를 입력해주세요.".to_string(),
        ));
    }
    Ok(())
}

/// Asks the backend whether `name` owns `pin`. Nothing about the PIN is kept
/// or checked locally beyond its shape.
pub async fn verify(
    backend: &dyn Backend,
    name: &str,
    pin: &str,
) -> Result<VerifiedIdentity, VerificationError> {
    validate_credentials(name, pin)?;
    let name = name.trim();

    let response = entry_commands_repo::verify_member_pin(backend, name, pin)
        .await
        .map_err(|e| {
            warn!(error = %e, "pin verification call failed");
            VerificationError::Transport(e.to_string())
        })?;

    if !response.ok {
        return Err(VerificationError::Rejected(
            response
                .message
                .unwrap_or_else(|| "본인 확인에 실패했습니다.".to_string()),
        ));
    }

    let Some(member_id) = response.member_id.filter(|id| !id.is_empty()) else {
        return Err(VerificationError::Rejected(
            "본인 확인 응답에 회원 정보가 없습니다.".to_string(),
        ));
    };

    info!(member_id = %member_id, "identity verified");
    Ok(VerifiedIdentity {
        member_id,
        name: response.name.unwrap_or_else(|| name.to_string()),
        club: response.club.unwrap_or_default(),
        grade: response.grade.unwrap_or_default(),
    })
}

/// Name and PIN as typed, plus the identity they produced. Editing either
/// input drops the identity.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    name: String,
    pin: String,
    verified: Option<VerifiedIdentity>,
}

impl Credentials {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn verified(&self) -> Option<&VerifiedIdentity> {
        self.verified.as_ref()
    }

    pub fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.verified = None;
        }
    }

    pub fn set_pin(&mut self, raw: &str) {
        let pin = sanitize_pin_input(raw);
        if self.pin != pin {
            self.pin = pin;
            self.verified = None;
        }
    }

    pub fn can_verify(&self) -> bool {
        validate_credentials(&self.name, &self.pin).is_ok()
    }

    /// Runs verification against the current inputs; the identity is kept
    /// only on success.
    pub async fn verify(
        &mut self,
        backend: &dyn Backend,
    ) -> Result<&VerifiedIdentity, VerificationError> {
        self.verified = None;
        let identity = verify(backend, &self.name, &self.pin).await?;
        Ok(&*self.verified.insert(identity))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
