//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::policy::RulePolicy;

/// Environment variable overriding `degree.repeat_subjects_veto`.
pub const REPEAT_VETO_ENV: &str = "GRADEPATH_REPEAT_VETO";

/// Top-level gradepath configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradepathConfig {
    /// Directory for reports written without an explicit output path.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Progression and graduation thresholds (`[year]` and `[degree]` tables).
    #[serde(flatten)]
    pub rules: RulePolicy,
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("./gradepath-reports")
}

impl Default for GradepathConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            rules: RulePolicy::default(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when `path` is `None`:
/// 1. `gradepath.toml` in the current directory
/// 2. `~/.config/gradepath/config.toml`
///
/// Environment variable override: `GRADEPATH_REPEAT_VETO`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradepathConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradepath.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => GradepathConfig::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

fn parse_config_file(path: &Path) -> Result<GradepathConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<GradepathConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: GradepathConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<GradepathConfig> {
    if let Some(value) = lookup(REPEAT_VETO_ENV) {
        config.rules.degree.repeat_subjects_veto = parse_flag(&value)
            .with_context(|| format!("invalid value for {REPEAT_VETO_ENV}"))?;
    }
    Ok(config)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected true or false, got {other:?}"),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradepath"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GradepathConfig::default();
        assert_eq!(config.report_dir, PathBuf::from("./gradepath-reports"));
        assert_eq!(config.rules, RulePolicy::default());
    }

    #[test]
    fn parse_config_with_rule_tables() {
        let toml_str = r#"
report_dir = "out"

[year]
min_gpa = 2.5

[degree]
repeat_subjects_veto = false
"#;
        let config: GradepathConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report_dir, PathBuf::from("out"));
        assert_eq!(config.rules.year.min_gpa, 2.5);
        assert_eq!(config.rules.year.min_c_credits, 20);
        assert!(!config.rules.degree.repeat_subjects_veto);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config_from(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[degree]\nmin_total_credits = 88\n").unwrap();

        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.rules.degree.min_total_credits, 88);
    }

    #[test]
    fn malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[degree\n").unwrap();

        let err = parse_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn env_override_toggles_veto() {
        let off = apply_env_overrides(GradepathConfig::default(), |name| {
            (name == REPEAT_VETO_ENV).then(|| "false".to_string())
        })
        .unwrap();
        assert!(!off.rules.degree.repeat_subjects_veto);

        let untouched = apply_env_overrides(off.clone(), |_| None).unwrap();
        assert!(!untouched.rules.degree.repeat_subjects_veto);

        let on = apply_env_overrides(off, |_| Some("1".into())).unwrap();
        assert!(on.rules.degree.repeat_subjects_veto);
    }

    #[test]
    fn env_override_rejects_garbage() {
        let err = apply_env_overrides(GradepathConfig::default(), |_| Some("maybe".into()))
            .unwrap_err();
        assert!(format!("{err:#}").contains(REPEAT_VETO_ENV));
    }
}
