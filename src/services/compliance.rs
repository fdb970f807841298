use crate::catalog::Catalog;
use crate::domain::models::{ComplianceRow, ParameterMode, ScopeTarget, SelectionResult};
use std::collections::BTreeSet;
use std::path::Path;

/// One row per selected policy, in selection order. Policies the catalog
/// has no compliance metadata for still get a row with empty controls.
pub fn build_rows(selection: &SelectionResult, catalog: &Catalog) -> Vec<ComplianceRow> {
    let mut rows = Vec::with_capacity(selection.policy_count());
    for group in &selection.groups {
        for name in &group.policy_names {
            let controls = catalog
                .get(name)
                .map(|record| record.compliance.clone())
                .unwrap_or_default();
            rows.push(ComplianceRow {
                policy: name.clone(),
                service: group.service.clone(),
                controls,
            });
        }
    }
    rows
}

/// Every framework appearing anywhere in the row set, in column order.
pub fn frameworks(rows: &[ComplianceRow]) -> BTreeSet<String> {
    rows.iter()
        .flat_map(|row| row.controls.keys().cloned())
        .collect()
}

/// Single markdown table: policy, service, then one column per framework.
/// An empty row set still yields a well-formed header-only table.
pub fn to_markdown(rows: &[ComplianceRow]) -> String {
    let frameworks = frameworks(rows);
    let mut out = String::new();

    out.push_str("| Policy | Service |");
    for framework in &frameworks {
        out.push_str(&format!(" {} |", framework));
    }
    out.push('\n');

    out.push_str("| --- | --- |");
    for _ in &frameworks {
        out.push_str(" --- |");
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!("| {} | {} |", row.policy, row.service));
        for framework in &frameworks {
            out.push_str(&format!(" {} |", controls_cell(row, framework)));
        }
        out.push('\n');
    }
    out
}

/// Same logical content as the markdown table, comma-separated. Overwrites
/// any pre-existing file at `destination`; write failures propagate as-is.
pub fn write_csv(rows: &[ComplianceRow], destination: &Path) -> anyhow::Result<()> {
    remove_previous(destination)?;
    std::fs::write(destination, to_csv(rows))?;
    Ok(())
}

pub fn write_markdown(rows: &[ComplianceRow], destination: &Path) -> anyhow::Result<()> {
    remove_previous(destination)?;
    std::fs::write(destination, to_markdown(rows))?;
    Ok(())
}

fn to_csv(rows: &[ComplianceRow]) -> String {
    let frameworks = frameworks(rows);
    let mut out = String::new();

    let mut header = vec!["Policy".to_string(), "Service".to_string()];
    header.extend(frameworks.iter().cloned());
    out.push_str(&csv_line(&header));

    for row in rows {
        let mut fields = vec![row.policy.clone(), row.service.clone()];
        fields.extend(frameworks.iter().map(|f| controls_cell(row, f)));
        out.push_str(&csv_line(&fields));
    }
    out
}

fn controls_cell(row: &ComplianceRow, framework: &str) -> String {
    row.controls
        .get(framework)
        .map(|ids| ids.join(", "))
        .unwrap_or_default()
}

fn csv_line(fields: &[String]) -> String {
    let encoded: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    format!("{}\n", encoded.join(","))
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn remove_previous(destination: &Path) -> anyhow::Result<()> {
    if destination.exists() {
        log::info!("removing the previous file: {}", destination.display());
        std::fs::remove_file(destination)?;
    }
    Ok(())
}

/// Summary files are named `<mode tag>-<requested service>-<target id>`
/// with `.md`/`.csv` extensions appended by the writers.
pub fn summary_file_stem(mode: ParameterMode, service: &str, scope: &ScopeTarget) -> String {
    format!("{}-{}-{}", mode.tag(), service, scope.identifier())
}
