// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! thresholds within range, non-empty model names, positive limits.

use crate::diagnostic::ConfigError;
use crate::model::{ConciergeConfig, TierConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.engine.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "engine.log_level `{}` must be one of {}",
            config.engine.log_level,
            LOG_LEVELS.join(", ")
        )));
    }
    if config.engine.backend_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "engine.backend_timeout_secs must be at least 1",
        ));
    }

    if config.anthropic.base_url.trim().is_empty() {
        errors.push(ConfigError::validation("anthropic.base_url must not be empty"));
    }
    if config.anthropic.timeout_secs == 0 {
        errors.push(ConfigError::validation("anthropic.timeout_secs must be at least 1"));
    }

    for (name, tier) in [
        ("light", &config.tiers.light),
        ("standard", &config.tiers.standard),
        ("premium", &config.tiers.premium),
    ] {
        validate_tier(name, tier, &mut errors);
    }

    let router = &config.router;
    require_model("router.model", &router.model, &mut errors);
    require_positive("router.max_tokens", router.max_tokens as usize, &mut errors);
    require_positive("router.max_message_chars", router.max_message_chars, &mut errors);

    let matcher = &config.matcher;
    if matcher.threshold.is_nan() || matcher.threshold <= 0.0 || matcher.threshold > 1.0 {
        errors.push(ConfigError::validation(format!(
            "matcher.threshold must be in (0, 1], got {}",
            matcher.threshold
        )));
    }
    require_model("matcher.semantic_model", &matcher.semantic_model, &mut errors);
    require_positive(
        "matcher.semantic_max_tokens",
        matcher.semantic_max_tokens as usize,
        &mut errors,
    );
    require_positive("matcher.suggestion_limit", matcher.suggestion_limit, &mut errors);

    let temperature = config.responder.temperature;
    if !(0.0..=1.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "responder.temperature must be in [0, 1], got {temperature}"
        )));
    }

    let signals = &config.signals;
    for (key, weight) in [
        ("signals.negative_penalty", signals.negative_penalty),
        ("signals.positive_bonus", signals.positive_bonus),
        ("signals.caps_penalty", signals.caps_penalty),
        ("signals.exclamation_penalty", signals.exclamation_penalty),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            errors.push(ConfigError::validation(format!(
                "{key} must be in [0, 1], got {weight}"
            )));
        }
    }
    if !(0.0..=1.0).contains(&signals.caps_ratio) {
        errors.push(ConfigError::validation(format!(
            "signals.caps_ratio must be in [0, 1], got {}",
            signals.caps_ratio
        )));
    }
    for (key, list) in [
        ("signals.negative_words", &signals.negative_words),
        ("signals.positive_words", &signals.positive_words),
        ("signals.conditional_words", &signals.conditional_words),
        ("signals.comparison_words", &signals.comparison_words),
        ("signals.explanatory_words", &signals.explanatory_words),
    ] {
        if list.iter().any(|w| w.trim().is_empty()) {
            errors.push(ConfigError::validation(format!(
                "{key} must not contain empty entries"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_tier(name: &str, tier: &TierConfig, errors: &mut Vec<ConfigError>) {
    require_model(&format!("tiers.{name}.model"), &tier.model, errors);
    require_positive(&format!("tiers.{name}.max_tokens"), tier.max_tokens as usize, errors);
    if tier.approx_cost_usd.is_nan() || tier.approx_cost_usd < 0.0 {
        errors.push(ConfigError::validation(format!(
            "tiers.{name}.approx_cost_usd must be non-negative, got {}",
            tier.approx_cost_usd
        )));
    }
}

fn require_model(key: &str, model: &str, errors: &mut Vec<ConfigError>) {
    if model.trim().is_empty() {
        errors.push(ConfigError::validation(format!("{key} must not be empty")));
    }
}

fn require_positive(key: &str, value: usize, errors: &mut Vec<ConfigError>) {
    if value == 0 {
        errors.push(ConfigError::validation(format!("{key} must be at least 1")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = ConciergeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.matcher.threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "matcher.threshold"));
    }

    #[test]
    fn empty_tier_model_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.tiers.premium.model = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "tiers.premium.model"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = ConciergeConfig::default();
        config.engine.log_level = "verbose".to_string();
        config.engine.backend_timeout_secs = 0;
        config.tiers.light.approx_cost_usd = -1.0;
        config.responder.temperature = 2.0;
        config.signals.negative_words.push(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(has_error(&errors, "engine.log_level"));
        assert!(has_error(&errors, "backend_timeout_secs"));
        assert!(has_error(&errors, "tiers.light.approx_cost_usd"));
        assert!(has_error(&errors, "responder.temperature"));
        assert!(has_error(&errors, "signals.negative_words"));
    }

    #[test]
    fn zero_router_limits_fail_validation() {
        let mut config = ConciergeConfig::default();
        config.router.max_message_chars = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "router.max_message_chars"));
    }

    #[test]
    fn nan_cost_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.tiers.standard.approx_cost_usd = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "tiers.standard.approx_cost_usd"));
    }

    #[test]
    fn partial_tier_table_keeps_other_defaults() {
        let toml_str = r#"
[tiers.light]
model = "small"
max_tokens = 100
approx_cost_usd = 0.0001
"#;
        let config: ConciergeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tiers.light.model, "small");
        assert_eq!(config.tiers.standard.model, "claude-sonnet-4-20250514");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn tier_tables_deny_unknown_fields() {
        let toml_str = r#"
[tiers.premium]
model = "big"
max_tokens = 100
approx_cost_usd = 0.1
price = 3
"#;
        assert!(toml::from_str::<ConciergeConfig>(toml_str).is_err());
    }
}
