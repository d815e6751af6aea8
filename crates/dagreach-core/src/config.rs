use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::graph::RepresentativePolicy;
use crate::reach::ReachOptions;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "dagreach.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub condense: CondenseConfig,
    #[serde(default)]
    pub reach: ReachOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondenseConfig {
    #[serde(default)]
    pub representative: RepresentativePolicy,
    /// Run the acyclicity validator on every condensation.
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for CondenseConfig {
    fn default() -> Self {
        Self {
            representative: RepresentativePolicy::default(),
            validate: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_dag_suffix")]
    pub dag_suffix: String,
    #[serde(default = "default_mapping_suffix")]
    pub mapping_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            dag_suffix: default_dag_suffix(),
            mapping_suffix: default_mapping_suffix(),
        }
    }
}

/// Parse one config file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid TOML for [`Config`].
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `dagreach.toml` from `project_root`, if present.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<Option<Config>> {
    let path = project_root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load `<config_dir>/dagreach/config.toml`, if present.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<Config>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dagreach/config.toml"))
}

/// Pick the effective config: explicit path, then project file, then user
/// file, then defaults. The first file found wins as a whole.
///
/// # Errors
///
/// Fails if the chosen file cannot be read or parsed. An explicit path that
/// does not exist is an error.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    if let Some(config) = load_project_config(project_root)? {
        return Ok(config);
    }
    Ok(load_user_config()?.unwrap_or_default())
}

const fn default_true() -> bool {
    true
}

fn default_dag_suffix() -> String {
    "_DAG".to_string()
}

fn default_mapping_suffix() -> String {
    "_mapping".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reach::ReachRepresentation;

    #[test]
    fn missing_project_config_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_project_config(dir.path()).expect("load").is_none());
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.condense.representative, RepresentativePolicy::Smallest);
        assert!(cfg.condense.validate);
        assert_eq!(cfg.reach.representation, ReachRepresentation::Auto);
        assert_eq!(cfg.reach.bitset_max_nodes, 20_000);
        assert!(!cfg.reach.retain_sets);
        assert_eq!(cfg.output.dag_suffix, "_DAG");
        assert_eq!(cfg.output.mapping_suffix, "_mapping");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"
[condense]
representative = "root"

[reach]
representation = "sets"
"#,
        )
        .expect("write config");

        let cfg = load_project_config(dir.path())
            .expect("load")
            .expect("present");
        assert_eq!(cfg.condense.representative, RepresentativePolicy::Root);
        assert!(cfg.condense.validate, "validate keeps its default");
        assert_eq!(cfg.reach.representation, ReachRepresentation::Sets);
        assert_eq!(cfg.reach.bitset_max_nodes, 20_000);
        assert_eq!(cfg.output.dag_suffix, "_DAG");
    }

    #[test]
    fn explicit_path_wins_over_project_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[reach]\nretain_sets = true\n")
            .expect("write project config");
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[output]\ndag_suffix = \".dag\"\n").expect("write explicit");

        let cfg = resolve_config(dir.path(), Some(&explicit)).expect("resolve");
        assert_eq!(cfg.output.dag_suffix, ".dag");
        assert!(!cfg.reach.retain_sets, "project file ignored");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "[reach\n").expect("write");
        let err = load_config_file(&path).expect_err("parse failure");
        assert!(format!("{err:#}").contains(PROJECT_CONFIG_FILE));
    }
}
