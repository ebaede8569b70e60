// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./concierge.toml` > `~/.config/concierge/concierge.toml`
//! > `/etc/concierge/concierge.toml` with environment variable overrides via the
//! `CONCIERGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ConciergeConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/concierge/concierge.toml";

/// Local config file, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "concierge.toml";

/// Sections addressable from `CONCIERGE_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "engine",
    "anthropic",
    "tiers",
    "router",
    "matcher",
    "responder",
    "signals",
];

/// The per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("concierge").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/concierge/concierge.toml` (system-wide)
/// 3. `~/.config/concierge/concierge.toml` (user XDG config)
/// 4. `./concierge.toml` (local directory)
/// 5. `CONCIERGE_*` environment variables
pub fn load_config() -> Result<ConciergeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and embedded configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ConciergeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConciergeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Map a prefix-stripped, lowercased env key to its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `router_max_message_chars` maps to `router.max_message_chars`. Tier
/// tables nest one level deeper: `tiers_light_model` maps to
/// `tiers.light.model`.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        else {
            continue;
        };
        if *section == "tiers" {
            for tier in ["light", "standard", "premium"] {
                if let Some(field) = rest.strip_prefix(tier).and_then(|r| r.strip_prefix('_')) {
                    return format!("tiers.{tier}.{field}");
                }
            }
        }
        return format!("{section}.{rest}");
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `CONCIERGE_MATCHER_SEMANTIC_MAX_CANDIDATES` must map to
/// `matcher.semantic_max_candidates`.
fn env_provider() -> Env {
    Env::prefixed("CONCIERGE_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("engine_log_level"), "engine.log_level");
        assert_eq!(
            map_env_key("matcher_semantic_max_candidates"),
            "matcher.semantic_max_candidates"
        );
        assert_eq!(map_env_key("anthropic_api_key"), "anthropic.api_key");
        assert_eq!(map_env_key("tiers_premium_max_tokens"), "tiers.premium.max_tokens");
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(map_env_key("nonsense_key"), "nonsense_key");
    }

    #[test]
    fn env_override_applies_through_jail() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONCIERGE_ROUTER_MAX_MESSAGE_CHARS", "280");
            jail.set_env("CONCIERGE_TIERS_LIGHT_MODEL", "tiny-model");
            let config: ConciergeConfig = Figment::new()
                .merge(Serialized::defaults(ConciergeConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.router.max_message_chars, 280);
            assert_eq!(config.tiers.light.model, "tiny-model");
            Ok(())
        });
    }
}
