use super::domain::BackgroundCheckResult;
use serde::{Deserialize, Serialize};

/// Business decision taken on a background check response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskDecision {
    Acceptable,
    Declined(DeclineReason),
}

impl RiskDecision {
    pub fn summary(&self) -> String {
        match self {
            RiskDecision::Acceptable => "risk acceptable".to_string(),
            RiskDecision::Declined(reason) => reason.summary().to_string(),
        }
    }
}

/// Why an applicant was turned away before any account id was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    NoBackgroundCheckResult,
    UnacceptableRiskProfile,
}

impl DeclineReason {
    pub const fn summary(self) -> &'static str {
        match self {
            DeclineReason::NoBackgroundCheckResult => "declined: no background check result",
            DeclineReason::UnacceptableRiskProfile => "declined: unacceptable risk profile",
        }
    }
}

pub(crate) fn assess_risk(result: Option<&BackgroundCheckResult>) -> RiskDecision {
    match result {
        None => RiskDecision::Declined(DeclineReason::NoBackgroundCheckResult),
        Some(result) if result.is_unacceptable() => {
            RiskDecision::Declined(DeclineReason::UnacceptableRiskProfile)
        }
        Some(_) => RiskDecision::Acceptable,
    }
}
