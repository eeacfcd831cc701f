use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::database::backend::Backend;
use crate::database::registration_repo::{self, NewMember};
use crate::models::MemberStatus;
use crate::services::ranking_service::DIVISIONS;

pub const GENDERS: [&str; 2] = ["남", "여"];

#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub club: String,
    pub division: String,
    pub grade: String,
    pub agreed: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("이름, 성별, 전화번호, 소속클럽, 랭킹부서, 등급은 필수입니다.")]
    MissingFields,

    #[error("약관에 동의해주세요.")]
    NotAgreed,

    #[error("등록 실패: {0}")]
    Transport(String),
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let filled = [
            &self.name,
            &self.gender,
            &self.phone,
            &self.club,
            &self.division,
            &self.grade,
        ]
        .iter()
        .all(|v| !v.trim().is_empty());
        let gender = self.gender.trim();
        let division = self.division.trim();
        if !filled
            || !GENDERS.iter().any(|g| *g == gender)
            || !DIVISIONS.iter().any(|d| *d == division)
        {
            return Err(RegistrationError::MissingFields);
        }
        if !self.agreed {
            return Err(RegistrationError::NotAgreed);
        }
        Ok(())
    }

    fn to_new_member(&self, now: DateTime<Utc>) -> NewMember {
        let name = self.name.trim().to_string();
        NewMember {
            member_id: new_member_id(now),
            display_name: name.clone(),
            name_norm: normalize_name(&name),
            name,
            gender: self.gender.trim().to_string(),
            phone: self.phone.trim().to_string(),
            club: self.club.trim().to_string(),
            division: self.division.trim().to_string(),
            grade: self.grade.trim().to_string(),
            status: MemberStatus::Dormant.label().to_string(),
            grade_source: "auto".to_string(),
            registered_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub struct RegisterPageView {
    pub grades: Vec<String>,
    pub divisions: Vec<&'static str>,
    pub genders: Vec<&'static str>,
    /// Values to put back into the form after a rejected submission.
    pub form: RegistrationRequest,
    pub completed: bool,
}

impl RegisterPageView {
    pub fn new(grades: Vec<String>, form: RegistrationRequest) -> Self {
        Self {
            grades,
            divisions: DIVISIONS.to_vec(),
            genders: GENDERS.to_vec(),
            form,
            completed: false,
        }
    }

    pub fn completed() -> Self {
        Self {
            completed: true,
            ..Self::new(Vec::new(), RegistrationRequest::default())
        }
    }

    pub fn is_gender(&self, gender: &str) -> bool {
        self.form.gender == gender
    }

    pub fn is_division(&self, division: &str) -> bool {
        self.form.division == division
    }

    pub fn is_grade(&self, grade: &str) -> bool {
        self.form.grade == grade
    }
}

/// `M` followed by the last eight digits of the epoch milliseconds.
pub fn new_member_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs().to_string();
    let tail = &millis[millis.len().saturating_sub(8)..];
    format!("M{}", tail)
}

/// Hangul syllables and ASCII letters/digits only, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('가'..='힣').contains(c))
        .collect::<String>()
        .to_lowercase()
}

pub async fn load_grade_options(backend: &dyn Backend) -> Vec<String> {
    match registration_repo::list_grade_options(backend).await {
        Ok(grades) => grades,
        Err(e) => {
            warn!(error = %e, "grade option load failed");
            Vec::new()
        }
    }
}

/// New members start dormant; an operator activates them once the
/// registration fee is paid.
pub async fn register(
    backend: &dyn Backend,
    request: &RegistrationRequest,
    now: DateTime<Utc>,
) -> Result<NewMember, RegistrationError> {
    request.validate()?;
    let member = request.to_new_member(now);
    registration_repo::insert_member(backend, &member)
        .await
        .map_err(|e| {
            warn!(error = %e, "member registration insert failed");
            RegistrationError::Transport(e.to_string())
        })?;
    info!(member_id = %member.member_id, club = %member.club, "member registered");
    Ok(member)
}
