//! Client for the hosted generative-language `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::utils::describe_body;

use super::{parse_reply, prompts, schema, types::*, AdvisoryError, AdvisoryService, Validate};
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const MIN_API_KEY_LEN: usize = 10;
const JSON_MIME: &str = "application/json";
const IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    pub(crate) fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Strips a `data:<mime>;base64,` prefix when present.
pub(crate) fn strip_data_url(image: &str) -> &str {
    match image.split_once(',') {
        Some((head, body)) if head.starts_with("data:") => body,
        _ => image,
    }
}

pub(crate) fn build_request(prompt: String, images: &[String], schema: Option<Value>) -> GenerateRequest {
    let mut parts: Vec<Part> = images
        .iter()
        .map(|image| Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: IMAGE_MIME.into(),
                data: strip_data_url(image).to_string(),
            }),
        })
        .collect();
    parts.push(Part {
        text: Some(prompt),
        inline_data: None,
    });
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".into()),
            parts,
        }],
        generation_config: schema.map(|response_schema| GenerationConfig {
            response_mime_type: JSON_MIME.into(),
            response_schema,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct GenerativeClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GenerativeClient {
    /// Builds a client; a missing or implausibly short key is rejected
    /// before any request is made.
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        model: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, AdvisoryError> {
        let api_key = api_key.trim();
        if api_key.len() < MIN_API_KEY_LEN || api_key == "undefined" {
            return Err(AdvisoryError::MissingApiKey);
        }
        let mut builder =
            Client::builder().user_agent(concat!("coop_core/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdvisoryError> {
        debug!(model = %self.model, "sending advisory request");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status.as_u16(), &body));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| AdvisoryError::Parse(err.to_string()))?;
        payload.text().ok_or(AdvisoryError::EmptyResponse)
    }

    async fn structured<T>(
        &self,
        prompt: String,
        images: &[String],
        schema: Value,
    ) -> Result<T, AdvisoryError>
    where
        T: DeserializeOwned + Validate,
    {
        let request = build_request(prompt, images, Some(schema));
        let text = self.generate(&request).await?;
        parse_reply(&text)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AdvisoryError {
    if err.is_timeout() {
        AdvisoryError::Timeout
    } else {
        AdvisoryError::Transport(err.to_string())
    }
}

fn http_error(status: u16, body: &str) -> AdvisoryError {
    AdvisoryError::Http {
        status,
        message: describe_body(body),
    }
}

#[async_trait]
impl AdvisoryService for GenerativeClient {
    async fn flock_plan(&self, request: &FlockPlanRequest) -> Result<FlockPlan, AdvisoryError> {
        self.structured(prompts::flock_plan(request), &[], schema::flock_plan())
            .await
    }

    async fn formulate_feed(
        &self,
        request: &FormulationRequest,
    ) -> Result<FormulationResult, AdvisoryError> {
        self.structured(prompts::formulation(request), &[], schema::formulation())
            .await
    }

    async fn finance_advice(
        &self,
        request: &FinanceRequest,
    ) -> Result<FinanceAdvice, AdvisoryError> {
        self.structured(prompts::finance(request), &[], schema::finance())
            .await
    }

    async fn vet_triage(&self, request: &VetRequest) -> Result<VetDiagnosis, AdvisoryError> {
        info!(images = request.images.len(), "requesting veterinary triage");
        self.structured(prompts::vet(request), &request.images, schema::vet_diagnosis())
            .await
    }

    async fn biosecurity_check(
        &self,
        request: &BiosecurityRequest,
    ) -> Result<BiosecurityReport, AdvisoryError> {
        self.structured(prompts::biosecurity(request), &[], schema::biosecurity())
            .await
    }

    async fn handling_checklist(
        &self,
        request: &HandlingRequest,
    ) -> Result<HandlingChecklist, AdvisoryError> {
        self.structured(prompts::handling(request), &[], schema::handling())
            .await
    }

    async fn inventory_report(
        &self,
        flocks: &[InventoryLine],
    ) -> Result<InventoryReport, AdvisoryError> {
        self.structured(prompts::inventory(flocks), &[], schema::inventory())
            .await
    }

    async fn egg_ad(&self, egg_type: &str) -> Result<String, AdvisoryError> {
        let request = build_request(prompts::egg_ad(egg_type), &[], None);
        let text = self.generate(&request).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keys_are_rejected_up_front() {
        let err = GenerativeClient::new("abc", None, None, None).unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingApiKey));
        let err = GenerativeClient::new("undefined", None, None, None).unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingApiKey));
    }

    #[test]
    fn request_carries_schema_and_inline_images() {
        let images = vec!["data:image/jpeg;base64,QUJD".to_string(), "REVG".to_string()];
        let request = build_request("diga oi".into(), &images, Some(schema::vet_diagnosis()));
        let json = serde_json::to_value(&request).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert_eq!(parts[1]["inlineData"]["data"], "REVG");
        assert_eq!(parts[2]["text"], "diga oi");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn plain_text_request_has_no_generation_config() {
        let request = build_request("anúncio".into(), &[], None);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.text().is_none());
    }

    #[test]
    fn api_error_bodies_become_one_line() {
        let body = r#"{"error":{"code":403,"message":"Permission denied.","status":"PERMISSION_DENIED"}}"#;
        let err = http_error(403, body);
        assert!(matches!(&err, AdvisoryError::Http { status: 403, message } if message.starts_with("Permission denied.")));
        assert!(err.to_string().ends_with("(Código: 403)"));
    }

    #[test]
    fn endpoint_uses_model_path() {
        let client = GenerativeClient::new(
            "0123456789abcdef",
            Some("http://localhost:9999/"),
            Some("test-model"),
            None,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/test-model:generateContent"
        );
    }
}
