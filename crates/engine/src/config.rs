//! Engine settings loaded from the environment.
//!
//! Settings are built once at startup and handed to [`RulesEngine`](crate::RulesEngine).
//! Invalid environment values are logged and ignored, leaving the default in
//! place.

use std::path::{Path, PathBuf};

use herofoundry_domain::{EngineConfig, ThresholdPolicyKind};

use crate::error::EngineError;

pub const ENV_XP_THRESHOLD_POLICY: &str = "HEROFOUNDRY_XP_THRESHOLD_POLICY";
pub const ENV_STARTING_XP_THRESHOLD: &str = "HEROFOUNDRY_STARTING_XP_THRESHOLD";
pub const ENV_ENFORCE_RULESET_CONFLICTS: &str = "HEROFOUNDRY_ENFORCE_RULESET_CONFLICTS";
pub const ENV_RULESET_PATH: &str = "RULESET_PATH";

/// Content root used when `RULESET_PATH` is unset.
pub const DEFAULT_RULESET_PATH: &str = "./content/rulesets";

/// Rules configuration plus where ruleset content lives on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub config: EngineConfig,
    /// Relative ruleset content paths are resolved against this directory
    pub content_root: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            content_root: PathBuf::from(DEFAULT_RULESET_PATH),
        }
    }
}

impl EngineSettings {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(lookup);
        settings
    }

    /// Rules configuration from a JSON file; missing keys take defaults.
    ///
    /// The loaded configuration must pass [`EngineConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: EngineConfig = serde_json::from_str(&raw).map_err(|e| {
            EngineError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate().map_err(|e| {
            EngineError::config(format!("Invalid settings in {}: {}", path.display(), e))
        })?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Apply environment overrides on top of the current values.
    ///
    /// Supported variables:
    /// - HEROFOUNDRY_XP_THRESHOLD_POLICY: `static` or `table`
    /// - HEROFOUNDRY_STARTING_XP_THRESHOLD: positive integer
    /// - HEROFOUNDRY_ENFORCE_RULESET_CONFLICTS: boolean
    /// - RULESET_PATH: content root directory
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_XP_THRESHOLD_POLICY) {
            match val.parse::<ThresholdPolicyKind>() {
                Ok(policy) => {
                    self.config.progression.threshold_policy = policy;
                    tracing::info!(%policy, "Applied HEROFOUNDRY_XP_THRESHOLD_POLICY environment variable");
                }
                Err(_) => {
                    tracing::warn!(
                        val = %val,
                        "HEROFOUNDRY_XP_THRESHOLD_POLICY is not one of [static, table], ignoring"
                    );
                }
            }
        }

        if let Some(val) = lookup(ENV_STARTING_XP_THRESHOLD) {
            match val.trim().parse::<i32>() {
                Ok(threshold) if threshold > 0 => {
                    self.config.progression.starting_threshold = threshold;
                    tracing::info!(
                        threshold,
                        "Applied HEROFOUNDRY_STARTING_XP_THRESHOLD environment variable"
                    );
                }
                Ok(threshold) => {
                    tracing::warn!(
                        threshold,
                        "HEROFOUNDRY_STARTING_XP_THRESHOLD must be positive, ignoring"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        val = %val,
                        "HEROFOUNDRY_STARTING_XP_THRESHOLD is not a valid i32, ignoring"
                    );
                }
            }
        }

        if let Some(val) = lookup(ENV_ENFORCE_RULESET_CONFLICTS) {
            match parse_bool(&val) {
                Some(enforce) => {
                    self.config.rulesets.enforce_conflicts_on_activation = enforce;
                    tracing::info!(
                        enforce,
                        "Applied HEROFOUNDRY_ENFORCE_RULESET_CONFLICTS environment variable"
                    );
                }
                None => {
                    tracing::warn!(
                        val = %val,
                        "HEROFOUNDRY_ENFORCE_RULESET_CONFLICTS is not a valid boolean, ignoring"
                    );
                }
            }
        }

        if let Some(val) = lookup(ENV_RULESET_PATH) {
            let trimmed = val.trim();
            if trimmed.is_empty() {
                tracing::warn!("RULESET_PATH is empty, ignoring");
            } else {
                self.content_root = PathBuf::from(trimmed);
                tracing::info!(path = %trimmed, "Applied RULESET_PATH environment variable");
            }
        }
    }
}

/// Load `.env.local` then `.env` from the working directory, if present.
///
/// Values already in the environment win over file values.
pub fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let path = Path::new(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let settings = EngineSettings::from_lookup(|_| None);
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.content_root, PathBuf::from("./content/rulesets"));
        assert_eq!(settings.config.progression.starting_threshold, 300);
        assert!(settings.config.rulesets.enforce_conflicts_on_activation);
    }

    #[test]
    fn valid_overrides_are_applied() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            (ENV_XP_THRESHOLD_POLICY, "Table"),
            (ENV_STARTING_XP_THRESHOLD, " 500 "),
            (ENV_ENFORCE_RULESET_CONFLICTS, "off"),
            (ENV_RULESET_PATH, "/srv/rulesets"),
        ]));

        assert_eq!(
            settings.config.progression.threshold_policy,
            ThresholdPolicyKind::Table
        );
        assert_eq!(settings.config.progression.starting_threshold, 500);
        assert!(!settings.config.rulesets.enforce_conflicts_on_activation);
        assert_eq!(settings.content_root, PathBuf::from("/srv/rulesets"));
    }

    #[test]
    fn invalid_overrides_keep_defaults() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            (ENV_XP_THRESHOLD_POLICY, "exponential"),
            (ENV_STARTING_XP_THRESHOLD, "0"),
            (ENV_ENFORCE_RULESET_CONFLICTS, "maybe"),
            (ENV_RULESET_PATH, "   "),
        ]));
        assert_eq!(settings, EngineSettings::default());

        let settings =
            EngineSettings::from_lookup(lookup_from(&[(ENV_STARTING_XP_THRESHOLD, "lots")]));
        assert_eq!(settings.config.progression.starting_threshold, 300);
    }

    #[test]
    fn json_file_fills_missing_keys_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"progression": {{"threshold_policy": "table"}}, "abilities": {{"max": 25}}}}"#
        )
        .unwrap();

        let settings = EngineSettings::from_json_file(file.path()).unwrap();
        assert_eq!(
            settings.config.progression.threshold_policy,
            ThresholdPolicyKind::Table
        );
        assert_eq!(settings.config.progression.starting_threshold, 300);
        assert_eq!(settings.config.abilities.max, 25);
        assert_eq!(settings.config.abilities.min, 1);
    }

    #[test]
    fn json_file_with_zero_threshold_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"progression": {{"starting_threshold": 0}}}}"#).unwrap();

        let err = EngineSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("Starting XP threshold must be positive"));
    }

    #[test]
    fn json_file_with_inverted_bounds_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"abilities": {{"min": 20, "max": 10, "soft_max": 15}}}}"#).unwrap();

        let err = EngineSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn env_overrides_always_yield_valid_settings() {
        let settings = EngineSettings::from_lookup(lookup_from(&[
            (ENV_STARTING_XP_THRESHOLD, "-10"),
        ]));
        assert_eq!(settings.config.validate(), Ok(()));
    }

    #[test]
    fn unreadable_or_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = EngineSettings::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, EngineError::Config(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let malformed = EngineSettings::from_json_file(file.path()).unwrap_err();
        assert!(matches!(malformed, EngineError::Config(_)));
    }
}
