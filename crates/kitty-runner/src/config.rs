//! Run configuration
//!
//! Read once at startup from the environment (and `.env`), then passed by
//! reference through the pipeline.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use kitty_allocator::{AllocationPolicy, WeightConfig};
use kitty_common::{ConfigError, DEFAULT_JUSTIFICATION_THRESHOLD};
use kitty_justifier::{
    infra::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL},
    GeminiClient, GeminiSettings, GeneratorSettings, JustificationGenerator, TemplateJustifier,
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS,
};

/// How justifications are written for the whole run
#[derive(Debug, Clone)]
pub enum JustificationMode {
    /// Seeded templates only
    Template,
    /// Gemini first, templates when a call fails
    External(GeminiSettings),
}

/// Justification settings
#[derive(Debug, Clone)]
pub struct JustificationSettings {
    pub mode: JustificationMode,
    /// Share of the kitty at or above which the tone is praising
    pub threshold: f64,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum external calls in flight
    pub concurrency: usize,
    /// Template RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl Default for JustificationSettings {
    fn default() -> Self {
        Self {
            mode: JustificationMode::Template,
            threshold: DEFAULT_JUSTIFICATION_THRESHOLD,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            concurrency: DEFAULT_CONCURRENCY,
            seed: None,
        }
    }
}

/// Kitty allocator configuration
#[derive(Debug, Clone)]
pub struct KittyConfig {
    pub weights: WeightConfig,
    pub policy: AllocationPolicy,
    pub justification: JustificationSettings,
}

impl KittyConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    ///
    /// Every variable that is present must be valid; nothing is silently
    /// defaulted over a bad value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::Missing(key.to_string()));

        let weights = WeightConfig::parse(&required("PARAM_WEIGHTS")?)?;

        let base_percent = parse_percent("BASE_PERCENT", &required("BASE_PERCENT")?)?;
        let cap_percent = parse_percent("MAX_AGENT_CAP_PERCENT", &required("MAX_AGENT_CAP_PERCENT")?)?;
        let allow_leftover = match get("ALLOW_LEFTOVER") {
            Some(raw) => parse_bool("ALLOW_LEFTOVER", &raw)?,
            None => false,
        };
        let policy = AllocationPolicy::new(base_percent, cap_percent, allow_leftover)?;

        let mut justification = JustificationSettings::default();
        if let Some(raw) = get("JUSTIFICATION_THRESHOLD") {
            justification.threshold = parse_percent("JUSTIFICATION_THRESHOLD", &raw)?;
        }
        if let Some(raw) = get("JUSTIFICATION_TIMEOUT_MS") {
            justification.timeout_ms = parse_number("JUSTIFICATION_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = get("JUSTIFICATION_CONCURRENCY") {
            let concurrency: usize = parse_number("JUSTIFICATION_CONCURRENCY", &raw)?;
            if concurrency == 0 {
                return Err(invalid("JUSTIFICATION_CONCURRENCY", &raw, "must be at least 1"));
            }
            justification.concurrency = concurrency;
        }
        if let Some(raw) = get("JUSTIFICATION_SEED") {
            justification.seed = Some(parse_number("JUSTIFICATION_SEED", &raw)?);
        }

        let use_gemini = match get("USE_GEMINI") {
            Some(raw) => parse_bool("USE_GEMINI", &raw)?,
            None => false,
        };
        if use_gemini {
            let api_key = get("GEMINI_API_KEY").ok_or_else(|| ConfigError::Missing("GEMINI_API_KEY".to_string()))?;
            justification.mode = JustificationMode::External(GeminiSettings {
                endpoint: get("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key,
            });
        }

        Ok(Self {
            weights,
            policy,
            justification,
        })
    }

    /// Build the generator for this run
    pub fn generator(&self) -> Result<JustificationGenerator, ConfigError> {
        let settings = &self.justification;
        let templates = match settings.seed {
            Some(seed) => TemplateJustifier::from_seed(seed),
            None => TemplateJustifier::from_entropy(),
        };
        let generator_settings = GeneratorSettings {
            threshold: settings.threshold,
            timeout: Duration::from_millis(settings.timeout_ms),
            concurrency: settings.concurrency,
        };

        match &settings.mode {
            JustificationMode::Template => Ok(JustificationGenerator::templates(templates, generator_settings)),
            JustificationMode::External(gemini) => {
                let client = GeminiClient::new(gemini.clone(), generator_settings.timeout)
                    .map_err(|e| invalid("GEMINI_ENDPOINT", &gemini.endpoint, &e.to_string()))?;
                Ok(JustificationGenerator::external(
                    Arc::new(client),
                    templates,
                    generator_settings,
                ))
            }
        }
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, raw, "not a valid number"))
}

fn parse_percent(key: &str, raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = parse_number(key, raw)?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::PercentOutOfRange {
            name: key.to_string(),
            value,
        });
    }
    Ok(value)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, raw, "expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("PARAM_WEIGHTS", "performanceScore:0.6,activeClients:0.4"),
        ("BASE_PERCENT", "0.5"),
        ("MAX_AGENT_CAP_PERCENT", "0.3"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        BASE.iter().chain(extra.iter()).copied().collect()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = KittyConfig::from_lookup(lookup(&BASE)).unwrap();

        assert_eq!(config.weights.len(), 2);
        assert_eq!(config.policy.base_percent, 0.5);
        assert_eq!(config.policy.cap_percent, 0.3);
        assert!(!config.policy.allow_leftover);
        assert_eq!(config.justification.threshold, 0.3);
        assert_eq!(config.justification.concurrency, DEFAULT_CONCURRENCY);
        assert!(matches!(config.justification.mode, JustificationMode::Template));
        assert!(config.justification.seed.is_none());
    }

    #[test]
    fn test_missing_required_setting() {
        let err = KittyConfig::from_lookup(lookup(&BASE[..2])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MAX_AGENT_CAP_PERCENT".to_string()));
    }

    #[test]
    fn test_percent_out_of_range() {
        let pairs = [
            ("PARAM_WEIGHTS", "performanceScore:1"),
            ("BASE_PERCENT", "1.5"),
            ("MAX_AGENT_CAP_PERCENT", "0.3"),
        ];
        let err = KittyConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::PercentOutOfRange { ref name, .. } if name == "BASE_PERCENT"));
    }

    #[test]
    fn test_bad_weights_are_fatal() {
        let pairs = [
            ("PARAM_WEIGHTS", "performanceScore:abc"),
            ("BASE_PERCENT", "0.5"),
            ("MAX_AGENT_CAP_PERCENT", "0.3"),
        ];
        assert!(matches!(
            KittyConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_optional_settings() {
        let pairs = with(&[
            ("ALLOW_LEFTOVER", "true"),
            ("JUSTIFICATION_THRESHOLD", "0.25"),
            ("JUSTIFICATION_TIMEOUT_MS", "2500"),
            ("JUSTIFICATION_CONCURRENCY", "8"),
            ("JUSTIFICATION_SEED", "42"),
        ]);
        let config = KittyConfig::from_lookup(lookup(&pairs)).unwrap();

        assert!(config.policy.allow_leftover);
        assert_eq!(config.justification.threshold, 0.25);
        assert_eq!(config.justification.timeout_ms, 2500);
        assert_eq!(config.justification.concurrency, 8);
        assert_eq!(config.justification.seed, Some(42));
    }

    #[test]
    fn test_invalid_optional_values_rejected() {
        assert!(KittyConfig::from_lookup(lookup(&with(&[("ALLOW_LEFTOVER", "maybe")]))).is_err());
        assert!(KittyConfig::from_lookup(lookup(&with(&[("JUSTIFICATION_CONCURRENCY", "0")]))).is_err());
        assert!(KittyConfig::from_lookup(lookup(&with(&[("JUSTIFICATION_SEED", "-1")]))).is_err());
    }

    #[test]
    fn test_gemini_requires_credential() {
        let err = KittyConfig::from_lookup(lookup(&with(&[("USE_GEMINI", "true")]))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GEMINI_API_KEY".to_string()));

        let config = KittyConfig::from_lookup(lookup(&with(&[
            ("USE_GEMINI", "true"),
            ("GEMINI_API_KEY", "abc"),
        ])))
        .unwrap();
        match &config.justification.mode {
            JustificationMode::External(settings) => {
                assert_eq!(settings.model, DEFAULT_MODEL);
                assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
                assert_eq!(settings.api_key, "abc");
            }
            JustificationMode::Template => panic!("expected external mode"),
        }
        assert!(format!("{:?}", config).contains("<redacted>"));
    }

    #[test]
    fn test_generator_builds_for_both_modes() {
        let config = KittyConfig::from_lookup(lookup(&BASE)).unwrap();
        assert!(config.generator().is_ok());

        let config = KittyConfig::from_lookup(lookup(&with(&[
            ("USE_GEMINI", "true"),
            ("GEMINI_API_KEY", "abc"),
        ])))
        .unwrap();
        assert!(config.generator().is_ok());
    }
}
