use crate::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub fn handle_generate(cli: &Cli, catalog: &Catalog, args: &GenerateArgs) -> anyhow::Result<()> {
    let config = match &args.config_file {
        Some(path) => load_config(path)?,
        None => {
            log::info!("no config file supplied; using the default exclusion config");
            default_config()
        }
    };
    let excluded_services = merge_excluded_services(&config, args.exclude_services.as_deref());
    let excluded_policies: BTreeSet<String> =
        config.exclusions.policies.iter().cloned().collect();

    let criteria = SelectionCriteria::new(
        &args.service,
        excluded_services,
        excluded_policies,
        args.no_params,
        args.params_optional,
        args.params_required,
    )?;
    let target = RenderTarget::new(
        args.subscription.as_deref(),
        args.management_group.as_deref(),
        args.enforce,
    )?;

    let index = catalog.index_by_service();
    let mut scope = resolve_service_scope(&index, &criteria.service, &criteria.excluded_services)?;
    scope.retain(|name| !criteria.excluded_policies.contains(name));
    let selection = select(&scope, catalog, criteria.mode);
    log::info!(
        "selected {} policies ({}, service: {})",
        selection.policy_count(),
        criteria.mode.tag(),
        criteria.service
    );

    let terraform = render(&selection, &target, catalog);

    let mut markdown_file = None;
    let mut csv_file = None;
    if !args.no_summary {
        let rows = build_rows(&selection, catalog);
        let stem = summary_file_stem(criteria.mode, &criteria.service, &target.scope);

        let md_path = PathBuf::from(format!("{}.md", stem));
        write_markdown(&rows, &md_path)?;
        log::info!("markdown summary written to: {}", md_path.display());
        markdown_file = Some(md_path.to_string_lossy().to_string());

        let csv_path = PathBuf::from(format!("{}.csv", stem));
        write_csv(&rows, &csv_path)?;
        log::info!("csv summary written to: {}", csv_path.display());
        csv_file = Some(csv_path.to_string_lossy().to_string());
    }

    if cli.json {
        let report = GenerateReport {
            policy_count: selection.policy_count(),
            terraform,
            markdown_file,
            csv_file,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: report
            })?
        );
    } else {
        println!("{}", terraform);
    }
    Ok(())
}
