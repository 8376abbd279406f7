use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "message": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a server-side failure's details. In text mode the headline message
/// is left to the caller's error path; only per-field messages are printed.
pub fn output_client_error(output_format: &OutputFormat, err: &ClientError) -> anyhow::Result<()> {
    match (output_format, err) {
        (OutputFormat::Json, ClientError::Api { status, message, errors }) => {
            let response = json!({
                "success": false,
                "status": status,
                "message": message,
                "errors": errors,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        (OutputFormat::Text, ClientError::Api { errors, .. }) => {
            for (field, messages) in errors.iter().flatten() {
                eprintln!("  {}: {}", field, messages.join(", "));
            }
        }
        (OutputFormat::Json, _) => output_error(output_format, &err.to_string())?,
        (OutputFormat::Text, _) => {}
    }
    Ok(())
}

/// Pretty-print any serializable value
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read one line from stdin after printing a label
pub fn read_line(label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    eprint!("{}", label);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Use the flag value, or ask for it
pub fn value_or_prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => read_line(label),
    }
}
