//! AI brand style checker
//!
//! Packages a brand's style guide together with text and/or an image,
//! sends it to a generative model with a fixed response schema and
//! validates the structured answer.

use async_trait::async_trait;
use base64::Engine as _;
use brandhub_common::config::GeminiConfig;
use brandhub_common::db::Brand;
use brandhub_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("BrandHub/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Content submitted for a style check; at least one part is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleCheckInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInput>,
}

/// An inline image as base64 (a `data:` URL prefix is accepted)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: String,
}

/// Validated request handed to the analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct StyleCheckRequest {
    pub prompt: String,
    pub image: Option<ImageInput>,
}

/// Structured verdict returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleCheckResult {
    /// 0 to 100
    pub alignment_score: f64,
    pub alignment_summary: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub is_positive: bool,
    pub text: String,
}

/// Backend that turns a style check request into a verdict
#[async_trait]
pub trait StyleAnalyzer: Send + Sync {
    async fn analyze(&self, request: &StyleCheckRequest) -> Result<StyleCheckResult>;
}

/// Validate the input and run the analyzer once
///
/// Input without text or image is rejected before the analyzer is called.
pub async fn run_style_check(
    analyzer: &dyn StyleAnalyzer,
    brand: &Brand,
    input: StyleCheckInput,
) -> Result<StyleCheckResult> {
    let request = build_request(brand, input)?;
    let result = analyzer.analyze(&request).await?;
    info!(
        "Style check for brand {} scored {:.0}",
        brand.id, result.alignment_score
    );
    Ok(result)
}

/// Validate input and compose the prompt
pub fn build_request(brand: &Brand, input: StyleCheckInput) -> Result<StyleCheckRequest> {
    let text = input
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let image = input.image.map(normalize_image).transpose()?;

    if text.is_none() && image.is_none() {
        return Err(Error::validation("Please provide text or an image to analyze"));
    }

    let mut content = String::new();
    if let Some(text) = &text {
        content.push_str(&format!("Text: \"{}\"\n", text));
    }
    if image.is_some() {
        content.push_str("An image is attached.\n");
    }

    let prompt = format!(
        "Analyze the provided content against this brand style guide:\n\
         {}\n\
         Content to analyze:\n\
         {}\n\
         Provide your analysis in the specified JSON format.\n\
         - alignmentScore is a percentage from 0-100.\n\
         - alignmentSummary is a concise summary.\n\
         - suggestions lists specific, actionable feedback, marked as positive or for improvement.\n",
        brand_context(brand),
        content
    );

    Ok(StyleCheckRequest { prompt, image })
}

/// The style guide section of the prompt
pub fn brand_context(brand: &Brand) -> String {
    let or_unspecified = |v: &Option<String>| v.clone().unwrap_or_else(|| "Not specified".to_string());
    format!(
        "- Brand Name: {}\n\
         - Description: {}\n\
         - Primary Color: {}\n\
         - Secondary Color: {}\n\
         - Font: {}\n\
         - Website: {}\n",
        brand.name,
        or_unspecified(&brand.description),
        or_unspecified(&brand.primary_color),
        or_unspecified(&brand.secondary_color),
        or_unspecified(&brand.font),
        or_unspecified(&brand.website_url),
    )
}

fn normalize_image(image: ImageInput) -> Result<ImageInput> {
    let mime_type = image.mime_type.trim().to_ascii_lowercase();
    if !mime_type.starts_with("image/") {
        return Err(Error::validation(format!(
            "Attachment must be an image (got '{}')",
            image.mime_type
        )));
    }

    let data = match image.data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => image.data.as_str(),
    }
    .trim()
    .to_string();

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&data)
        .map_err(|e| Error::validation(format!("Image is not valid base64: {}", e)))?;
    if decoded.is_empty() {
        return Err(Error::validation("Image is empty"));
    }

    Ok(ImageInput { mime_type, data })
}

/// Parse and validate the model's JSON answer
pub fn parse_result(raw: &str) -> Result<StyleCheckResult> {
    let result: StyleCheckResult = serde_json::from_str(raw)
        .map_err(|e| Error::RemoteService(format!("Malformed analysis response: {}", e)))?;

    if !result.alignment_score.is_finite() || !(0.0..=100.0).contains(&result.alignment_score) {
        return Err(Error::RemoteService(format!(
            "Alignment score out of range: {}",
            result.alignment_score
        )));
    }
    Ok(result)
}

/// JSON schema the model must answer with
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "alignmentScore": { "type": "NUMBER" },
            "alignmentSummary": { "type": "STRING" },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "isPositive": { "type": "BOOLEAN" },
                        "text": { "type": "STRING" }
                    },
                    "required": ["isPositive", "text"]
                }
            }
        },
        "required": ["alignmentScore", "alignmentSummary", "suggestions"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini `generateContent` client
pub struct GeminiAnalyzer {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiAnalyzer {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(request: &StyleCheckRequest) -> serde_json::Value {
        let mut parts = vec![json!({ "text": request.prompt })];
        if let Some(image) = &request.image {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[async_trait]
impl StyleAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, request: &StyleCheckRequest) -> Result<StyleCheckResult> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("Gemini API key is not configured".to_string()))?;

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        debug!(model = %self.model, has_image = request.image.is_some(), "Calling Gemini");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| Error::RemoteService(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteService(format!(
                "Model returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteService(format!("Unreadable response: {}", e)))?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| Error::RemoteService("Response contained no answer".to_string()))?;

        parse_result(&text)
    }
}
