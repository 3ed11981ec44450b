//! AnalyzePropertyHandler - asks the language model for a structured valuation.
//!
//! The model's text is reduced to one JSON object (code fences and surrounding
//! prose are tolerated), then checked with the same `validate_analysis` the
//! estimate client uses. Nothing is returned unless the whole payload passes.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{RequestId, ValidationError};
use crate::domain::valuation::{validate_analysis, AIAnalysis, EstimateError, ValuationRequest};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, MessageRole, RequestMetadata,
};

const SYSTEM_PROMPT: &str = r#"You are an experienced UK property valuer.
Given a property address and type, estimate its current market value in GBP.
Respond with a single JSON object and nothing else, using this schema:
{
  "estimatedValue": {"lower": number, "upper": number},
  "confidence": "low" | "medium" | "high",
  "analysis": string,
  "details": {
    "location": {"description": string, "amenities": [string]},
    "education": {"description": string, "schools": [string]},
    "transport": {"description": string, "links": [string]},
    "marketActivity": {
      "recentSales": [{"address": string, "price": number, "date": "YYYY-MM-DD"}] | string,
      "priceChanges": string
    }
  },
  "buyerPersona": {"summary": string, "demographics": [string], "motivations": [string]}
}
Both bounds are whole pounds greater than zero with lower <= upper.
Omit any section you cannot support with reasonable confidence."#;

/// Command to analyze one property.
#[derive(Debug, Clone)]
pub struct AnalyzePropertyCommand {
    pub request: ValuationRequest,
}

/// Successful analysis plus provenance for logging.
#[derive(Debug, Clone)]
pub struct AnalyzePropertyResult {
    pub request_id: RequestId,
    pub model: String,
    pub analysis: AIAnalysis,
}

/// Why an analysis request failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("AI provider failed: {0}")]
    Provider(#[from] AIError),

    #[error("model returned an invalid valuation: {0}")]
    InvalidModelOutput(String),
}

impl AnalysisError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "VALIDATION_FAILED",
            AnalysisError::Provider(AIError::Timeout { .. }) => "PROVIDER_TIMEOUT",
            AnalysisError::Provider(AIError::RateLimited { .. })
            | AnalysisError::Provider(AIError::Unavailable { .. }) => "PROVIDER_UNAVAILABLE",
            AnalysisError::Provider(_) => "PROVIDER_ERROR",
            AnalysisError::InvalidModelOutput(_) => "INVALID_MODEL_OUTPUT",
        }
    }

    /// Message safe to show the caller. Provider internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AnalysisError::Validation(err) if err.field() == "address" => {
                "Address is required".to_string()
            }
            AnalysisError::Validation(err) => err.to_string(),
            AnalysisError::Provider(AIError::Timeout { .. }) => {
                "The valuation model took too long to respond".to_string()
            }
            AnalysisError::Provider(AIError::RateLimited { .. })
            | AnalysisError::Provider(AIError::Unavailable { .. }) => {
                "The valuation model is temporarily unavailable. Please try again shortly."
                    .to_string()
            }
            AnalysisError::Provider(_) => "Failed to analyze property".to_string(),
            AnalysisError::InvalidModelOutput(_) => {
                "The valuation model returned an invalid response".to_string()
            }
        }
    }
}

/// Handler for `POST /api/analyze-property`.
pub struct AnalyzePropertyHandler {
    provider: Arc<dyn AIProvider>,
    max_tokens: u32,
}

impl AnalyzePropertyHandler {
    pub fn new(provider: Arc<dyn AIProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzePropertyCommand,
    ) -> Result<AnalyzePropertyResult, AnalysisError> {
        cmd.request.validate()?;

        let request_id = RequestId::new();
        let completion = CompletionRequest::new(RequestMetadata::new(
            request_id,
            "analyze-property",
        ))
        .with_system_prompt(SYSTEM_PROMPT)
        .with_message(MessageRole::User, user_prompt(&cmd.request))
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.2)
        .with_json_response();

        let response = self.provider.complete(completion).await.map_err(|err| {
            tracing::error!(request_id = %request_id, error = %err, "AI provider call failed");
            AnalysisError::Provider(err)
        })?;

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                request_id = %request_id,
                max_tokens = self.max_tokens,
                "model hit the token limit; output may be truncated"
            );
        }

        let analysis = parse_model_output(&response.content).map_err(|err| {
            tracing::warn!(
                request_id = %request_id,
                model = %response.model,
                error = %err,
                "model output rejected"
            );
            err
        })?;

        tracing::info!(
            request_id = %request_id,
            model = %response.model,
            property_type = %cmd.request.property_type(),
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "property analysis completed"
        );

        Ok(AnalyzePropertyResult {
            request_id,
            model: response.model,
            analysis,
        })
    }
}

fn user_prompt(request: &ValuationRequest) -> String {
    format!(
        "Estimate the current market value of this {}.\nAddress: {}",
        request.property_type().prompt_label(),
        request.address()
    )
}

/// Extracts, parses and validates the model's JSON object.
fn parse_model_output(content: &str) -> Result<AIAnalysis, AnalysisError> {
    let json = extract_json_object(content)
        .ok_or_else(|| AnalysisError::InvalidModelOutput("no JSON object in response".into()))?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| AnalysisError::InvalidModelOutput(e.to_string()))?;

    validate_analysis(&value).map_err(|err| match err {
        EstimateError::MalformedResponse { detail } => AnalysisError::InvalidModelOutput(detail),
        other => AnalysisError::InvalidModelOutput(other.to_string()),
    })
}

/// Finds the first balanced `{...}` in `text`, preferring a fenced block.
fn extract_json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let body = fenced_block(trimmed).unwrap_or(trimmed);
    let start = body.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in body[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    // Skip an info string such as `json`.
    let content_start = after.find('\n')? + 1;
    let content = &after[content_start..];
    let close = content.find("```")?;
    Some(content[..close].trim())
}
