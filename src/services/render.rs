use crate::catalog::{Catalog, ParameterSpec};
use crate::domain::models::{ParameterMode, RenderTarget, ScopeTarget, SelectionResult};

const BANNER: &str =
    "# -------------------------------------------------------------------------";

/// Renders the selected guardrails as a self-contained Terraform document:
/// a locals block, definition lookups, a custom policy set definition, and
/// the assignment for exactly one scope target. Policies are emitted in
/// the order the selection provides; this layer never re-sorts or
/// deduplicates. Byte-for-byte deterministic for identical inputs.
pub fn render(selection: &SelectionResult, target: &RenderTarget, catalog: &Catalog) -> String {
    let mut out = String::new();
    push_locals(&mut out, selection, target, catalog);
    out.push('\n');
    push_definitions(&mut out, selection.mode);
    out.push('\n');
    push_assignment(&mut out, &target.scope);
    out
}

/// Assignment name derived from the scope identifier, lowered to a
/// Terraform/Azure-safe form.
pub fn assignment_name(target: &RenderTarget) -> String {
    let slug: String = target
        .scope
        .identifier()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("guardrails-{}", slug)
}

fn push_locals(
    out: &mut String,
    selection: &SelectionResult,
    target: &RenderTarget,
    catalog: &Catalog,
) {
    let (subscription, management_group) = match &target.scope {
        ScopeTarget::Subscription(name) => (name.as_str(), ""),
        ScopeTarget::ManagementGroup(name) => ("", name.as_str()),
    };

    out.push_str("locals {\n");
    out.push_str(&format!(
        "  name             = {}\n",
        quoted(&assignment_name(target))
    ));
    out.push_str(&format!("  subscription     = {}\n", quoted(subscription)));
    out.push_str(&format!(
        "  management_group = {}\n",
        quoted(management_group)
    ));
    out.push_str(&format!("  enforce          = {}\n", target.enforce));
    out.push('\n');

    out.push_str("  policy_names = [\n");
    for group in &selection.groups {
        out.push_str(&format!("    {}\n", BANNER));
        out.push_str(&format!("    # {}\n", group.service));
        out.push_str(&format!("    {}\n", BANNER));
        for name in &group.policy_names {
            out.push_str(&format!("    {},\n", quoted(name)));
        }
    }
    out.push_str("  ]\n");

    if selection.mode != ParameterMode::NoParams {
        out.push('\n');
        push_parameter_map(out, selection, target, catalog);
    }

    out.push_str("}\n");
}

/// Per-policy parameter bindings for the parameterized variant. Defaults
/// are carried over where the definition supplies one; mandatory
/// parameters get an empty placeholder the operator fills in before
/// applying. Any `effect` parameter is pinned to the batch-wide
/// enforcement mode.
fn push_parameter_map(
    out: &mut String,
    selection: &SelectionResult,
    target: &RenderTarget,
    catalog: &Catalog,
) {
    out.push_str("  policy_parameters = {\n");
    for group in &selection.groups {
        for name in &group.policy_names {
            let Some(record) = catalog.get(name) else {
                continue;
            };
            out.push_str(&format!("    {} = jsonencode({{\n", quoted(name)));
            for param in &record.parameters {
                out.push_str(&format!(
                    "      {} = {{ value = {} }}\n",
                    param.name,
                    parameter_value(param, target.enforce)
                ));
            }
            out.push_str("    })\n");
        }
    }
    out.push_str("  }\n");
}

fn parameter_value(param: &ParameterSpec, enforce: bool) -> String {
    if param.name.eq_ignore_ascii_case("effect") {
        return quoted(if enforce { "Deny" } else { "Audit" });
    }
    match &param.default {
        Some(value) => value_expr(value),
        None => quoted(""),
    }
}

fn push_definitions(out: &mut String, mode: ParameterMode) {
    out.push_str("data \"azurerm_policy_definition\" \"guardrails\" {\n");
    out.push_str("  count        = length(local.policy_names)\n");
    out.push_str("  display_name = local.policy_names[count.index]\n");
    out.push_str("}\n\n");

    out.push_str("resource \"azurerm_policy_set_definition\" \"guardrails\" {\n");
    out.push_str("  name         = local.name\n");
    out.push_str("  policy_type  = \"Custom\"\n");
    out.push_str("  display_name = local.name\n\n");
    out.push_str("  dynamic \"policy_definition_reference\" {\n");
    out.push_str("    for_each = data.azurerm_policy_definition.guardrails\n");
    out.push_str("    content {\n");
    out.push_str("      policy_definition_id = policy_definition_reference.value.id\n");
    out.push_str("      reference_id         = policy_definition_reference.value.display_name\n");
    if mode != ParameterMode::NoParams {
        out.push_str(
            "      parameter_values     = lookup(local.policy_parameters, policy_definition_reference.value.display_name, \"{}\")\n",
        );
    }
    out.push_str("    }\n");
    out.push_str("  }\n");
    out.push_str("}\n");
}

fn push_assignment(out: &mut String, scope: &ScopeTarget) {
    match scope {
        ScopeTarget::Subscription(_) => {
            out.push_str("data \"azurerm_subscriptions\" \"guardrails\" {\n");
            out.push_str("  display_name_exact = local.subscription\n");
            out.push_str("}\n\n");
            out.push_str("resource \"azurerm_subscription_policy_assignment\" \"guardrails\" {\n");
            out.push_str("  name                 = local.name\n");
            out.push_str(
                "  policy_definition_id = azurerm_policy_set_definition.guardrails.id\n",
            );
            out.push_str(
                "  subscription_id      = data.azurerm_subscriptions.guardrails.subscriptions[0].id\n",
            );
            out.push_str("  enforce              = local.enforce\n");
            out.push_str("}\n");
        }
        ScopeTarget::ManagementGroup(_) => {
            out.push_str("data \"azurerm_management_group\" \"guardrails\" {\n");
            out.push_str("  display_name = local.management_group\n");
            out.push_str("}\n\n");
            out.push_str(
                "resource \"azurerm_management_group_policy_assignment\" \"guardrails\" {\n",
            );
            out.push_str("  name                 = local.name\n");
            out.push_str(
                "  policy_definition_id = azurerm_policy_set_definition.guardrails.id\n",
            );
            out.push_str(
                "  management_group_id  = data.azurerm_management_group.guardrails.id\n",
            );
            out.push_str("  enforce              = local.enforce\n");
            out.push_str("}\n");
        }
    }
}

fn quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// JSON default value as an HCL expression (jsonencode argument).
fn value_expr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => quoted(s),
        serde_json::Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(value_expr).collect();
            format!("[{}]", inner.join(", "))
        }
        serde_json::Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", k, value_expr(v)))
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ServiceGroup;

    fn fixture() -> Catalog {
        Catalog::parse(
            r#"{"policies": [
                {"display_name": "A", "service": "X"},
                {"display_name": "B", "service": "X",
                 "parameters": [{"name": "location"},
                                {"name": "effect", "default": "Audit"}]},
                {"display_name": "C", "service": "Y"}
            ]}"#,
        )
        .expect("fixture catalog")
    }

    fn no_params_selection() -> SelectionResult {
        SelectionResult {
            mode: ParameterMode::NoParams,
            groups: vec![
                ServiceGroup {
                    service: "X".to_string(),
                    policy_names: vec!["A".to_string()],
                },
                ServiceGroup {
                    service: "Y".to_string(),
                    policy_names: vec!["C".to_string()],
                },
            ],
        }
    }

    fn subscription() -> RenderTarget {
        RenderTarget::new(Some("production"), None, false).expect("target")
    }

    #[test]
    fn no_params_subscription_artifact() {
        let out = render(&no_params_selection(), &subscription(), &fixture());
        assert!(out.contains("\"A\",\n"));
        assert!(out.contains("\"C\",\n"));
        assert!(out.contains("# X"));
        assert!(out.contains("# Y"));
        assert!(out.contains("subscription     = \"production\""));
        assert!(out.contains("enforce          = false"));
        assert!(out.contains("resource \"azurerm_subscription_policy_assignment\""));
        assert!(!out.contains("policy_parameters"));
        assert!(!out.contains("management_group_policy_assignment"));
    }

    #[test]
    fn management_group_artifact_uses_the_other_scope_binding() {
        let target = RenderTarget::new(None, Some("corp-root"), true).expect("target");
        let out = render(&no_params_selection(), &target, &fixture());
        assert!(out.contains("management_group = \"corp-root\""));
        assert!(out.contains("enforce          = true"));
        assert!(out.contains("resource \"azurerm_management_group_policy_assignment\""));
        assert!(!out.contains("subscription_policy_assignment"));
    }

    #[test]
    fn parameterized_artifact_binds_parameters() {
        let selection = SelectionResult {
            mode: ParameterMode::ParamsRequired,
            groups: vec![ServiceGroup {
                service: "X".to_string(),
                policy_names: vec!["B".to_string()],
            }],
        };
        let audit = render(&selection, &subscription(), &fixture());
        assert!(audit.contains("policy_parameters"));
        assert!(audit.contains("location = { value = \"\" }"));
        assert!(audit.contains("effect = { value = \"Audit\" }"));
        assert!(audit.contains("parameter_values     = lookup(local.policy_parameters"));

        let enforced = RenderTarget::new(Some("production"), None, true).expect("target");
        let deny = render(&selection, &enforced, &fixture());
        assert!(deny.contains("effect = { value = \"Deny\" }"));
    }

    #[test]
    fn output_is_deterministic() {
        let first = render(&no_params_selection(), &subscription(), &fixture());
        let second = render(&no_params_selection(), &subscription(), &fixture());
        assert_eq!(first, second);
    }

    #[test]
    fn selection_order_is_preserved_verbatim() {
        // Intentionally unsorted input: the renderer must not fix it up.
        let selection = SelectionResult {
            mode: ParameterMode::NoParams,
            groups: vec![
                ServiceGroup {
                    service: "Y".to_string(),
                    policy_names: vec!["C".to_string()],
                },
                ServiceGroup {
                    service: "X".to_string(),
                    policy_names: vec!["A".to_string()],
                },
            ],
        };
        let out = render(&selection, &subscription(), &fixture());
        let y = out.find("# Y").expect("Y banner");
        let x = out.find("# X").expect("X banner");
        assert!(y < x);
    }

    #[test]
    fn empty_selection_still_renders_a_valid_document() {
        let selection = SelectionResult {
            mode: ParameterMode::NoParams,
            groups: Vec::new(),
        };
        let out = render(&selection, &subscription(), &fixture());
        assert!(out.contains("policy_names = [\n  ]"));
        assert!(out.contains("azurerm_policy_set_definition"));
    }

    #[test]
    fn display_names_with_quotes_are_escaped() {
        assert_eq!(quoted(r#"logs for 'write' and "delete""#),
            r#""logs for 'write' and \"delete\"""#);
    }

    #[test]
    fn default_values_render_as_hcl_expressions() {
        let arr = serde_json::json!(["kube-system", "azure-arc"]);
        assert_eq!(value_expr(&arr), r#"["kube-system", "azure-arc"]"#);
        assert_eq!(value_expr(&serde_json::json!(30)), "30");
        assert_eq!(value_expr(&serde_json::json!(true)), "true");
    }

    #[test]
    fn assignment_name_is_a_safe_slug() {
        let target = RenderTarget::new(Some("Corp Payments (EU)"), None, false).expect("target");
        assert_eq!(assignment_name(&target), "guardrails-corp-payments--eu-");
    }
}
