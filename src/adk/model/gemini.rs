// SPDX-License-Identifier: MIT

//! Gemini Model - Google's Gemini API implementation

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::{CaptionError, ModelError, Result};
use crate::adk::tool::Tool;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const PROVIDER: &str = "Gemini";

/// Google Gemini model implementation
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model_name: model_name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        )
    }
}

#[async_trait]
impl Model for GeminiModel {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
        tools: Option<&[Arc<dyn Tool>]>,
    ) -> Result<Content> {
        let body = build_request_body(history, config, tools);

        log::debug!(
            "Gemini request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok());
            return Err(ModelError::RateLimited { retry_after_secs }.into());
        }
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(CaptionError::api(PROVIDER, format!("{}: {}", status, text)));
        }

        let resp_json: Value = resp.json().await?;
        log::debug!("Gemini response: {}", resp_json);

        parse_response(&resp_json)
    }
}

/// Build the `generateContent` request body.
///
/// System-role messages are folded into `systemInstruction`; Gemini only
/// accepts `user` and `model` roles inside `contents`.
pub fn build_request_body(
    history: &[Content],
    config: Option<&GenerationConfig>,
    tools: Option<&[Arc<dyn Tool>]>,
) -> Value {
    let mut system_texts = Vec::new();
    let mut contents = Vec::with_capacity(history.len());

    for c in history {
        if c.role == "system" {
            system_texts.push(c.text());
            continue;
        }
        let parts: Vec<Value> = c.parts.iter().filter_map(part_to_gemini_json).collect();
        contents.push(json!({ "role": c.role, "parts": parts }));
    }

    let mut body = json!({ "contents": contents });

    if !system_texts.is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": system_texts.join("\n\n") }] });
    }

    if let Some(config) = config {
        let generation_config = generation_config_json(config);
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }
    }

    if let Some(tools) = tools {
        if !tools.is_empty() {
            let function_declarations: Vec<Value> =
                tools.iter().map(|t| function_declaration(t.as_ref())).collect();
            body["tools"] = json!([{ "function_declarations": function_declarations }]);
        }
    }

    body
}

fn generation_config_json(config: &GenerationConfig) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(t) = config.temperature {
        out.insert("temperature".to_string(), json!(t));
    }
    if let Some(m) = config.max_output_tokens {
        out.insert("maxOutputTokens".to_string(), json!(m));
    }
    if let Some(p) = config.top_p {
        out.insert("topP".to_string(), json!(p));
    }
    if let Some(k) = config.top_k {
        out.insert("topK".to_string(), json!(k));
    }
    out
}

/// Zero-argument tools are declared without `parameters`; Gemini rejects an
/// object schema with no properties.
fn function_declaration(tool: &dyn Tool) -> Value {
    let mut decl = json!({
        "name": tool.name(),
        "description": tool.description(),
    });
    let schema = tool.schema();
    let has_properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|p| !p.is_empty());
    if has_properties {
        decl["parameters"] = schema.clone();
    }
    decl
}

/// Parse a full `generateContent` response into a model message
pub fn parse_response(resp_json: &Value) -> Result<Content> {
    let candidate = resp_json["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| CaptionError::invalid_response("no candidates in Gemini response"))?;

    if let Some(finish_reason) = candidate.get("finishReason").and_then(Value::as_str) {
        log::debug!("Gemini finish reason: {}", finish_reason);
        match finish_reason {
            "SAFETY" => return Err(ModelError::Blocked(finish_reason.to_string()).into()),
            "UNEXPECTED_TOOL_CALL" => {
                return Err(CaptionError::invalid_response(
                    "Gemini returned UNEXPECTED_TOOL_CALL",
                ))
            }
            "MALFORMED_FUNCTION_CALL" => {
                let msg = candidate
                    .get("finishMessage")
                    .and_then(Value::as_str)
                    .unwrap_or("no finish message");
                log::warn!("Gemini malformed function call: {}", msg);
                return Err(CaptionError::invalid_response(format!(
                    "Gemini malformed function call: {}",
                    msg
                )));
            }
            _ => {}
        }
    }

    let parts_json = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            log::error!("No parts in candidate. Full response: {}", resp_json);
            CaptionError::invalid_response(format!("no content parts in candidate: {}", candidate))
        })?;

    Ok(Content {
        role: "model".to_string(),
        parts: parts_json.iter().filter_map(parse_gemini_part).collect(),
    })
}

/// Serialize a Part to Gemini API JSON format.
/// Returns None for parts that are never sent back (Thinking).
pub fn part_to_gemini_json(part: &Part) -> Option<Value> {
    match part {
        Part::Text(t) => Some(json!({ "text": t })),
        Part::Thinking(_) => None,
        Part::FunctionCall {
            name,
            args,
            thought_signature,
        } => {
            let mut fc = json!({ "functionCall": { "name": name, "args": args } });
            if let Some(sig) = thought_signature {
                fc["thoughtSignature"] = json!(sig);
            }
            Some(fc)
        }
        Part::FunctionResponse { name, response } => {
            Some(json!({ "functionResponse": { "name": name, "response": response } }))
        }
    }
}

/// Parse a Gemini API JSON part
pub fn parse_gemini_part(p: &Value) -> Option<Part> {
    if let Some(fc) = p.get("functionCall") {
        return Some(Part::FunctionCall {
            name: fc["name"].as_str().unwrap_or_default().to_string(),
            args: fc.get("args").cloned().unwrap_or_else(|| json!({})),
            // thoughtSignature is a sibling of functionCall, not inside it
            thought_signature: p
                .get("thoughtSignature")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let text = p.get("text").and_then(Value::as_str)?;
    if p.get("thought").and_then(Value::as_bool).unwrap_or(false) {
        Some(Part::Thinking(text.to_string()))
    } else {
        Some(Part::Text(text.to_string()))
    }
}
