use crate::catalog::GuardrailError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Parameter requirement class of a policy: takes no parameters, takes only
/// defaulted (optional) parameters, or has at least one mandatory parameter.
/// The classes are disjoint; OPTIONAL is not a subset of REQUIRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMode {
    NoParams,
    ParamsOptional,
    ParamsRequired,
}

impl ParameterMode {
    /// Stable tag used in summary file names and listings.
    pub fn tag(&self) -> &'static str {
        match self {
            ParameterMode::NoParams => "no-params",
            ParameterMode::ParamsOptional => "params-optional",
            ParameterMode::ParamsRequired => "params-required",
        }
    }

    /// Maps the three CLI flags to at most one mode. More than one active
    /// flag is a configuration error even if the argument parser let it
    /// through.
    pub fn from_optional_flags(
        no_params: bool,
        params_optional: bool,
        params_required: bool,
    ) -> Result<Option<ParameterMode>, GuardrailError> {
        let active = [no_params, params_optional, params_required]
            .iter()
            .filter(|f| **f)
            .count();
        if active > 1 {
            return Err(GuardrailError::InvalidParameterMode(
                "more than one parameter mode flag is active".to_string(),
            ));
        }
        if no_params {
            Ok(Some(ParameterMode::NoParams))
        } else if params_optional {
            Ok(Some(ParameterMode::ParamsOptional))
        } else if params_required {
            Ok(Some(ParameterMode::ParamsRequired))
        } else {
            Ok(None)
        }
    }

    /// Exactly-one variant of [`ParameterMode::from_optional_flags`].
    pub fn from_flags(
        no_params: bool,
        params_optional: bool,
        params_required: bool,
    ) -> Result<ParameterMode, GuardrailError> {
        Self::from_optional_flags(no_params, params_optional, params_required)?.ok_or_else(|| {
            GuardrailError::InvalidParameterMode(
                "no parameter mode flag is active".to_string(),
            )
        })
    }
}

/// User-supplied selection intent, built once at the boundary.
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    pub service: String,
    pub excluded_services: BTreeSet<String>,
    pub excluded_policies: BTreeSet<String>,
    pub mode: ParameterMode,
}

impl SelectionCriteria {
    pub fn new(
        service: &str,
        excluded_services: BTreeSet<String>,
        excluded_policies: BTreeSet<String>,
        no_params: bool,
        params_optional: bool,
        params_required: bool,
    ) -> Result<SelectionCriteria, GuardrailError> {
        let mode = ParameterMode::from_flags(no_params, params_optional, params_required)?;
        Ok(SelectionCriteria {
            service: service.to_string(),
            excluded_services,
            excluded_policies,
            mode,
        })
    }
}

/// The organizational boundary an assignment applies to. Mutually exclusive
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTarget {
    Subscription(String),
    ManagementGroup(String),
}

impl ScopeTarget {
    pub fn identifier(&self) -> &str {
        match self {
            ScopeTarget::Subscription(name) => name,
            ScopeTarget::ManagementGroup(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub scope: ScopeTarget,
    pub enforce: bool,
}

impl RenderTarget {
    /// Validating factory for the two optional scope inputs. Both present,
    /// neither present, or an empty identifier is a hard contract
    /// violation; the core never guesses which one wins.
    pub fn new(
        subscription: Option<&str>,
        management_group: Option<&str>,
        enforce: bool,
    ) -> Result<RenderTarget, GuardrailError> {
        let scope = match (subscription, management_group) {
            (Some(_), Some(_)) => {
                return Err(GuardrailError::InvalidTarget(
                    "both subscription and management group are set".to_string(),
                ))
            }
            (None, None) => {
                return Err(GuardrailError::InvalidTarget(
                    "neither subscription nor management group is set".to_string(),
                ))
            }
            (Some(name), None) => ScopeTarget::Subscription(name.to_string()),
            (None, Some(name)) => ScopeTarget::ManagementGroup(name.to_string()),
        };
        if scope.identifier().trim().is_empty() {
            return Err(GuardrailError::InvalidTarget(
                "target identifier is empty".to_string(),
            ));
        }
        Ok(RenderTarget { scope, enforce })
    }
}

/// One service's slice of a selection, names already sorted.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceGroup {
    pub service: String,
    pub policy_names: Vec<String>,
}

/// Ordered, deduplicated selection output. Constructed fresh per
/// invocation and never mutated afterwards; the renderer and the
/// compliance reporter both consume it as-is.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub mode: ParameterMode,
    pub groups: Vec<ServiceGroup>,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.policy_names.is_empty())
    }

    pub fn policy_count(&self) -> usize {
        self.groups.iter().map(|g| g.policy_names.len()).sum()
    }

    pub fn policy_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.policy_names.iter().map(String::as_str))
    }
}

/// One summary row per selected policy.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceRow {
    pub policy: String,
    pub service: String,
    pub controls: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct ServiceSummary {
    pub service: String,
    pub policy_count: usize,
}

#[derive(Serialize)]
pub struct PolicyListing {
    pub service: String,
    pub policy: String,
    pub mode: String,
}

#[derive(Serialize)]
pub struct GenerateReport {
    pub policy_count: usize,
    pub terraform: String,
    pub markdown_file: Option<String>,
    pub csv_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_mode_flag_is_required() {
        assert!(ParameterMode::from_flags(true, false, false).is_ok());
        assert!(ParameterMode::from_flags(false, false, false).is_err());
        assert!(ParameterMode::from_flags(true, true, false).is_err());
        assert!(ParameterMode::from_flags(true, true, true).is_err());
    }

    #[test]
    fn optional_mode_flags_allow_no_selection() {
        assert_eq!(
            ParameterMode::from_optional_flags(false, false, false).unwrap(),
            None
        );
        assert_eq!(
            ParameterMode::from_optional_flags(false, true, false).unwrap(),
            Some(ParameterMode::ParamsOptional)
        );
    }

    #[test]
    fn render_target_requires_exactly_one_scope() {
        let both = RenderTarget::new(Some("sub"), Some("mg"), false);
        assert!(both.unwrap_err().to_string().contains("both"));

        let neither = RenderTarget::new(None, None, false);
        assert!(neither.unwrap_err().to_string().contains("neither"));

        let empty = RenderTarget::new(Some("  "), None, false);
        assert!(empty.unwrap_err().to_string().contains("empty"));

        let ok = RenderTarget::new(None, Some("corp-root"), true).expect("valid target");
        assert_eq!(ok.scope, ScopeTarget::ManagementGroup("corp-root".to_string()));
        assert!(ok.enforce);
    }

    #[test]
    fn criteria_factory_rejects_contradictory_flags() {
        let err = SelectionCriteria::new(
            "all",
            BTreeSet::new(),
            BTreeSet::new(),
            true,
            false,
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("parameter mode"));
    }

    #[test]
    fn mode_tags_are_stable() {
        assert_eq!(ParameterMode::NoParams.tag(), "no-params");
        assert_eq!(ParameterMode::ParamsOptional.tag(), "params-optional");
        assert_eq!(ParameterMode::ParamsRequired.tag(), "params-required");
    }
}
