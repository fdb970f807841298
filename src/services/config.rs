use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Exclusion config file. Service names listed here are skipped during
/// scope resolution; policy display names are dropped from the resolved
/// scope before selection. Names unknown to the catalog are harmless.
///
/// ```toml
/// [exclusions]
/// services = ["Guest Configuration"]
/// policies = ["Audit usage of custom RBAC rules"]
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub exclusions: Exclusions,
}

#[derive(Debug, Deserialize, Default)]
pub struct Exclusions {
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub policies: Vec<String>,
}

pub fn default_config() -> ExclusionConfig {
    ExclusionConfig::default()
}

pub fn load_config(path: &Path) -> anyhow::Result<ExclusionConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Config-file service exclusions merged with the comma-separated
/// `--exclude-services` flag value.
pub fn merge_excluded_services(
    config: &ExclusionConfig,
    flag: Option<&str>,
) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = config.exclusions.services.iter().cloned().collect();
    if let Some(csv) = flag {
        out.extend(
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
    }
    out
}
