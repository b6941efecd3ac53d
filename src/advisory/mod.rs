//! Advisory collaborator: prompts a hosted generative-language API for
//! structured farm advice and turns the reply into typed, validated results.

pub mod generative;
pub mod prompts;
pub mod schema;
pub mod types;
pub mod validate;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use generative::GenerativeClient;
pub use types::*;
pub use validate::Validate;

#[derive(Debug, Clone, Error)]
pub enum AdvisoryError {
    #[error("advisory API key is missing or too short")]
    MissingApiKey,
    #[error("network error: {0}")]
    Transport(String),
    #[error("advisory request timed out")]
    Timeout,
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("advisory reply was empty")]
    EmptyResponse,
    #[error("advisory reply is not valid JSON for this request: {0}")]
    Parse(String),
    #[error("advisory reply failed validation: {0}")]
    Validation(String),
}

/// Parses a JSON reply into `T` and runs its validation rules.
pub fn parse_reply<T>(text: &str) -> Result<T, AdvisoryError>
where
    T: DeserializeOwned + Validate,
{
    let trimmed = strip_code_fence(text.trim());
    if trimmed.is_empty() {
        return Err(AdvisoryError::EmptyResponse);
    }
    let value: T =
        serde_json::from_str(trimmed).map_err(|err| AdvisoryError::Parse(err.to_string()))?;
    value.validate()?;
    Ok(value)
}

// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Every advice the farm can ask for. Implementations own transport and
/// schema details; callers only see typed results.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn flock_plan(&self, request: &FlockPlanRequest) -> Result<FlockPlan, AdvisoryError>;
    async fn formulate_feed(
        &self,
        request: &FormulationRequest,
    ) -> Result<FormulationResult, AdvisoryError>;
    async fn finance_advice(&self, request: &FinanceRequest)
        -> Result<FinanceAdvice, AdvisoryError>;
    async fn vet_triage(&self, request: &VetRequest) -> Result<VetDiagnosis, AdvisoryError>;
    async fn biosecurity_check(
        &self,
        request: &BiosecurityRequest,
    ) -> Result<BiosecurityReport, AdvisoryError>;
    async fn handling_checklist(
        &self,
        request: &HandlingRequest,
    ) -> Result<HandlingChecklist, AdvisoryError>;
    async fn inventory_report(
        &self,
        flocks: &[InventoryLine],
    ) -> Result<InventoryReport, AdvisoryError>;
    async fn egg_ad(&self, egg_type: &str) -> Result<String, AdvisoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reply_accepts_fenced_json() {
        let reply = "```json\n{\"diagnosis\":\"Coriza\",\"signsObserved\":[],\"firstAidSteps\":[],\"importantNotice\":\"Procure um veterinário\"}\n```";
        let parsed: VetDiagnosis = parse_reply(reply).unwrap();
        assert_eq!(parsed.diagnosis, "Coriza");
    }

    #[test]
    fn parse_reply_reports_missing_fields() {
        let err = parse_reply::<VetDiagnosis>("{\"diagnosis\":\"x\"}").unwrap_err();
        assert!(matches!(err, AdvisoryError::Parse(_)), "unexpected: {err:?}");
    }

    #[test]
    fn parse_reply_rejects_blank_text() {
        let err = parse_reply::<VetDiagnosis>("   ").unwrap_err();
        assert!(matches!(err, AdvisoryError::EmptyResponse));
    }
}
