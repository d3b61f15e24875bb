//! # Description Provider
//!
//! Produces the text attached to a new alert. With no credential configured
//! the text is a deterministic template; with one, a single call to the
//! generation endpoint is made and any failure falls back to a second
//! template. The result carries which branch produced it so callers and
//! tests can tell them apart. Failures never reach the caller.

use gloo_net::http::Request;
use serde_json::{Value, json};

use hazard_domain::AlertCategory;

use crate::config::Config;

/// Which branch produced the description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    /// Text returned by the generation endpoint.
    Generated,
    /// No credential configured; deterministic template.
    StaticTemplate,
    /// Generation failed; deterministic fallback template.
    FallbackTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub source: DescriptionSource,
}

#[derive(Debug, Clone)]
pub struct DescriptionProvider {
    api_key: Option<String>,
    model: String,
}

impl DescriptionProvider {
    #[must_use]
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.genai_key.clone(), config.genai_model.clone())
    }

    /// Describe a hazard category. Bounded by the underlying request's own
    /// timeout; never returns an error and never returns empty text.
    pub async fn describe(&self, category: AlertCategory) -> Description {
        let Some(key) = self.api_key.as_deref() else {
            return Description {
                text: static_template(category),
                source: DescriptionSource::StaticTemplate,
            };
        };
        match self.generate(key, category).await {
            Ok(text) => Description {
                text,
                source: DescriptionSource::Generated,
            },
            Err(err) => {
                log::warn!("description generation failed, using fallback: {err}");
                Description {
                    text: fallback_template(category),
                    source: DescriptionSource::FallbackTemplate,
                }
            }
        }
    }

    async fn generate(&self, key: &str, category: AlertCategory) -> Result<String, String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, key
        );
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt_for(category) }] }]
        });
        let response = Request::post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.ok() {
            return Err(format!("generation endpoint returned {}", response.status()));
        }
        let body: Value = response.json().await.map_err(|e| e.to_string())?;
        extract_text(&body).ok_or_else(|| "no text in generation response".to_string())
    }
}

fn prompt_for(category: AlertCategory) -> String {
    format!(
        "Write a brief but detailed description for a {} hazard alert.",
        category.as_str()
    )
}

fn static_template(category: AlertCategory) -> String {
    format!(
        "A {} condition has been detected in the area.",
        category.as_str()
    )
}

fn fallback_template(category: AlertCategory) -> String {
    format!(
        "A {} emergency has been reported. Take the necessary precautions.",
        category.as_str()
    )
}

/// Pulls `candidates[0].content.parts[0].text` out of a generation response.
/// Absence at any level is a failure, as is whitespace-only text.
fn extract_text(body: &Value) -> Option<String> {
    let text = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_credential_yields_static_template_without_network() {
        let provider = DescriptionProvider::new(None, "gemini-1.5-flash-latest");
        // The credential check happens before any request is built, so this
        // future resolves immediately.
        let description =
            futures::executor::block_on(provider.describe(AlertCategory::Flood));

        assert_eq!(description.source, DescriptionSource::StaticTemplate);
        assert!(description.text.contains("flood"));
    }

    #[test]
    fn test_templates_embed_the_category() {
        for category in AlertCategory::ALL {
            assert!(static_template(category).contains(category.as_str()));
            assert!(fallback_template(category).contains(category.as_str()));
            assert_ne!(static_template(category), fallback_template(category));
        }
    }

    #[test]
    fn test_extract_text_happy_path() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  Heavy rain expected.  " }] }
            }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("Heavy rain expected."));
    }

    #[test]
    fn test_extract_text_rejects_malformed_bodies() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": { "parts": [] } }] })),
            None
        );
        assert_eq!(
            extract_text(&json!({
                "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
            })),
            None
        );
    }

    #[test]
    fn test_prompt_names_the_category() {
        assert!(prompt_for(AlertCategory::Storm).contains("storm"));
    }
}
