use crate::catalog::{Catalog, GuardrailError};
use crate::domain::models::{ParameterMode, SelectionResult, ServiceGroup};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Service ordering contract for all emitted artifacts: plain
/// lexicographic. Deterministic output is part of the interface, not an
/// accident of container iteration.
pub fn service_order(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Policy ordering within one service group.
pub fn policy_order(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Expands a requested service ("all" or a single name) against the index,
/// minus excluded services. A named service missing from the index is an
/// error; excluding a service the index does not know is a no-op, since
/// exclusion lists are frequently broader than any one catalog.
pub fn resolve_service_scope(
    index: &BTreeMap<String, BTreeSet<String>>,
    requested: &str,
    excluded: &BTreeSet<String>,
) -> Result<BTreeSet<String>, GuardrailError> {
    for name in excluded {
        if !index.contains_key(name) {
            log::debug!("excluded service not present in catalog, skipping: {}", name);
        }
    }

    if requested == "all" {
        return Ok(index
            .iter()
            .filter(|(service, _)| !excluded.contains(*service))
            .flat_map(|(_, names)| names.iter().cloned())
            .collect());
    }

    let names = index
        .get(requested)
        .ok_or_else(|| GuardrailError::UnknownService(requested.to_string()))?;
    if excluded.contains(requested) {
        return Ok(BTreeSet::new());
    }
    Ok(names.clone())
}

/// Filters the resolved scope down to records whose parameter requirement
/// class equals `mode`, grouped by service and sorted with the named
/// comparators. Linear in the catalog size; no I/O. An empty result is a
/// valid outcome, not an error.
pub fn select(
    scope: &BTreeSet<String>,
    catalog: &Catalog,
    mode: ParameterMode,
) -> SelectionResult {
    let mut by_service: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in &catalog.policies {
        if !scope.contains(&record.display_name) {
            continue;
        }
        if record.parameter_mode() != mode {
            continue;
        }
        by_service
            .entry(record.service.as_str())
            .or_default()
            .insert(record.display_name.as_str());
    }

    let mut groups: Vec<ServiceGroup> = by_service
        .into_iter()
        .map(|(service, names)| {
            let mut policy_names: Vec<String> = names.into_iter().map(String::from).collect();
            policy_names.sort_by(|a, b| policy_order(a, b));
            ServiceGroup {
                service: service.to_string(),
                policy_names,
            }
        })
        .collect();
    groups.sort_by(|a, b| service_order(&a.service, &b.service));

    SelectionResult { mode, groups }
}
