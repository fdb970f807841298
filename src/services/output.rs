use crate::catalog::GuardrailError;
use crate::domain::models::JsonOut;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Terminal error reporting. JSON mode mirrors the success envelope with
/// `ok: false` plus a stable machine-readable code; text mode goes to
/// stderr.
pub fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({
            "ok": false,
            "error": { "code": error_code(err), "message": format!("{:#}", err) }
        });
        println!("{}", payload);
    } else {
        eprintln!("error: {:#}", err);
    }
}

pub fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<GuardrailError>() {
        Some(GuardrailError::UnknownService(_)) => "UNKNOWN_SERVICE",
        Some(GuardrailError::InvalidTarget(_)) => "INVALID_TARGET",
        Some(GuardrailError::InvalidParameterMode(_)) => "INVALID_PARAMETER_MODE",
        Some(GuardrailError::EmptyCatalog) => "EMPTY_CATALOG",
        Some(GuardrailError::DuplicatePolicy(_)) => "DUPLICATE_POLICY",
        Some(GuardrailError::UnnamedPolicy) => "UNNAMED_POLICY",
        Some(GuardrailError::MissingService(_)) => "MISSING_SERVICE",
        None => "ERROR",
    }
}
