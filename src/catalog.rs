use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::domain::models::ParameterMode;

/// Default catalog shipped with the binary, pre-scraped from the Azure
/// Policy built-in definitions.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/policies.json");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Catalog {
    pub policies: Vec<PolicyRecord>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PolicyRecord {
    pub display_name: String,
    pub service: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub compliance: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: Option<String>,
    pub default: Option<serde_json::Value>,
    pub allowed: Option<Vec<serde_json::Value>>,
}

#[derive(thiserror::Error, Debug)]
pub enum GuardrailError {
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("invalid render target: {0}")]
    InvalidTarget(String),
    #[error("invalid parameter mode selection: {0}")]
    InvalidParameterMode(String),
    #[error("catalog contains no policies")]
    EmptyCatalog,
    #[error("duplicate policy display name: {0}")]
    DuplicatePolicy(String),
    #[error("policy has an empty display name")]
    UnnamedPolicy,
    #[error("policy has an empty service field: {0}")]
    MissingService(String),
}

impl ParameterSpec {
    /// A parameter without a default must be supplied by the operator.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl PolicyRecord {
    /// Parameter requirement class. The three classes are disjoint and
    /// cover every record: no parameters, all-defaulted, or at least one
    /// mandatory parameter.
    pub fn parameter_mode(&self) -> ParameterMode {
        if self.parameters.is_empty() {
            ParameterMode::NoParams
        } else if self.parameters.iter().all(|p| !p.is_required()) {
            ParameterMode::ParamsOptional
        } else {
            ParameterMode::ParamsRequired
        }
    }
}

impl Catalog {
    pub fn parse(raw: &str) -> anyhow::Result<Catalog> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> anyhow::Result<Catalog> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn embedded() -> anyhow::Result<Catalog> {
        Self::parse(EMBEDDED_CATALOG)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.policies.is_empty() {
            return Err(GuardrailError::EmptyCatalog.into());
        }
        let mut seen = HashSet::new();
        for p in &self.policies {
            if p.display_name.trim().is_empty() {
                return Err(GuardrailError::UnnamedPolicy.into());
            }
            if p.service.trim().is_empty() {
                return Err(GuardrailError::MissingService(p.display_name.clone()).into());
            }
            if !seen.insert(&p.display_name) {
                return Err(GuardrailError::DuplicatePolicy(p.display_name.clone()).into());
            }
        }
        Ok(())
    }

    pub fn get(&self, display_name: &str) -> Option<&PolicyRecord> {
        self.policies.iter().find(|p| p.display_name == display_name)
    }

    /// Rebuilt from the catalog on each run; service and policy names come
    /// out in lexicographic order.
    pub fn index_by_service(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for p in &self.policies {
            index
                .entry(p.service.clone())
                .or_default()
                .insert(p.display_name.clone());
        }
        index
    }
}
