use crate::*;
use std::collections::BTreeSet;

pub fn handle_inventory(cli: &Cli, catalog: &Catalog) -> anyhow::Result<()> {
    match &cli.command {
        Commands::ListServices => {
            let summaries: Vec<ServiceSummary> = catalog
                .index_by_service()
                .into_iter()
                .map(|(service, names)| ServiceSummary {
                    service,
                    policy_count: names.len(),
                })
                .collect();
            print_out(cli.json, &summaries, |s| {
                format!("{}\t{}", s.service, s.policy_count)
            })?;
        }
        Commands::ListPolicies {
            service,
            no_params,
            params_optional,
            params_required,
        } => {
            let mode =
                ParameterMode::from_optional_flags(*no_params, *params_optional, *params_required)?;
            let requested = service.as_deref().unwrap_or("all");
            let index = catalog.index_by_service();
            let scope = resolve_service_scope(&index, requested, &BTreeSet::new())?;

            let mut rows: Vec<PolicyListing> = catalog
                .policies
                .iter()
                .filter(|r| scope.contains(&r.display_name))
                .filter(|r| mode.map_or(true, |m| r.parameter_mode() == m))
                .map(|r| PolicyListing {
                    service: r.service.clone(),
                    policy: r.display_name.clone(),
                    mode: r.parameter_mode().tag().to_string(),
                })
                .collect();
            rows.sort_by(|a, b| {
                service_order(&a.service, &b.service).then_with(|| policy_order(&a.policy, &b.policy))
            });
            print_out(cli.json, &rows, |r| {
                format!("{}\t{}\t{}", r.service, r.policy, r.mode)
            })?;
        }
        Commands::DescribePolicy { name } => {
            let record = catalog
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("policy not found: {}", name))?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: record
                    })?
                );
            } else {
                println!("policy: {}", record.display_name);
                println!("service: {}", record.service);
                println!("mode: {}", record.parameter_mode().tag());
                if !record.parameters.is_empty() {
                    let names: Vec<&str> =
                        record.parameters.iter().map(|p| p.name.as_str()).collect();
                    println!("parameters: {}", names.join(", "));
                }
                for (framework, controls) in &record.compliance {
                    println!("{}: {}", framework, controls.join(", "));
                }
            }
        }
        Commands::GenerateTerraform(_) => unreachable!("handled in run()"),
    }

    Ok(())
}
