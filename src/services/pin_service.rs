use thiserror::Error;
use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::entry_commands_repo;
use crate::services::identity_service::is_valid_pin;

#[derive(Debug, Clone, Default)]
pub struct PinChangeRequest {
    pub name: String,
    pub current_pin: String,
    pub new_pin: String,
    pub confirm_pin: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PinChangeError {
    #[error("이름을 입력해주세요.")]
    MissingName,

    #[error("현재 PIN 6자리를 입력해주세요.")]
    InvalidCurrentPin,

    #[error("새 PIN 6자리를 입력해주세요.")]
    InvalidNewPin,

    #[error("새 PIN이 일치하지 않습니다.")]
    ConfirmationMismatch,

    #[error("현재 PIN과 동일합니다.")]
    Unchanged,

    #[error("변경 실패: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),
}

impl PinChangeRequest {
    /// Checks run in the order the form presents its fields.
    pub fn validate(&self) -> Result<(), PinChangeError> {
        if self.name.trim().is_empty() {
            return Err(PinChangeError::MissingName);
        }
        if !is_valid_pin(&self.current_pin) {
            return Err(PinChangeError::InvalidCurrentPin);
        }
        if !is_valid_pin(&self.new_pin) {
            return Err(PinChangeError::InvalidNewPin);
        }
        if self.new_pin != self.confirm_pin {
            return Err(PinChangeError::ConfirmationMismatch);
        }
        if self.current_pin == self.new_pin {
            return Err(PinChangeError::Unchanged);
        }
        Ok(())
    }
}

pub async fn change_pin(
    backend: &dyn Backend,
    request: &PinChangeRequest,
) -> Result<(), PinChangeError> {
    request.validate()?;
    let name = request.name.trim();

    let outcome =
        entry_commands_repo::change_pin(backend, name, &request.current_pin, &request.new_pin)
            .await
            .map_err(|e| {
                warn!(error = %e, "pin change call failed");
                PinChangeError::Transport(e.to_string())
            })?;

    if !outcome.ok {
        return Err(PinChangeError::Rejected(
            outcome
                .message
                .unwrap_or_else(|| "PIN을 변경할 수 없습니다.".to_string()),
        ));
    }
    info!("pin changed");
    Ok(())
}
