//! # Build Configuration
//!
//! Compile-time configuration for the dashboard. WASM has no process
//! environment, so the variables are read with `option_env!` at build time
//! and handed to the app state as one owned struct.

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, e.g. `http://127.0.0.1:5000`. Absent means local
    /// mode: alerts live in memory and nothing is polled.
    pub api_base: Option<String>,

    /// Credential for the text-generation endpoint. Absent means alert
    /// descriptions come from the static template.
    pub genai_key: Option<String>,

    /// Generation model identifier.
    pub genai_model: String,
}

impl Config {
    /// Reads `HAZARD_API_URL`, `HAZARD_GENAI_KEY`, and `HAZARD_GENAI_MODEL`
    /// from the build environment.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self {
            api_base: option_env!("HAZARD_API_URL").and_then(non_empty),
            genai_key: option_env!("HAZARD_GENAI_KEY").and_then(non_empty),
            genai_model: option_env!("HAZARD_GENAI_MODEL")
                .and_then(non_empty)
                .unwrap_or_else(|| "gemini-1.5-flash-latest".to_string()),
        }
    }

    /// Remote mode: a backend owns the alert set and serves sensor data.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.api_base.is_some()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_and_strips_trailing_slash() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(
            non_empty("http://127.0.0.1:5000/"),
            Some("http://127.0.0.1:5000".to_string())
        );
    }

    #[test]
    fn test_default_model_is_set() {
        let config = Config::from_build_env();
        assert!(!config.genai_model.is_empty());
    }
}
