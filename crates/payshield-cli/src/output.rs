//! Output formatting for CLI results

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Result of one subcommand, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Subcommand name
    pub operation: &'static str,
    /// HSM address, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// What happened
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Subcommand outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A value was produced
    Ok {
        /// Hex or text result
        value: String,
    },
    /// Connectivity check result
    Availability {
        /// Whether a connection could be opened
        available: bool,
    },
}

/// Render `report` in `format`.
pub fn render(format: OutputFormat, report: &Report) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Human => Ok(match &report.outcome {
            Outcome::Ok { value } => value.clone(),
            Outcome::Availability { available } => {
                let target = report.endpoint.as_deref().unwrap_or("HSM");
                if *available {
                    format!("{target} is reachable")
                } else {
                    format!("{target} is unreachable")
                }
            }
        }),
    }
}

/// Render an error in `format`; JSON errors carry the category and message.
pub fn render_error(format: OutputFormat, err: &CliError) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({
            "status": "error",
            "category": err.category().to_string(),
            "message": err.to_string(),
        })
        .to_string(),
        OutputFormat::Human => {
            let mut text = format!("{}: {err}", err.category());
            for hint in err.suggestions() {
                text.push_str("\n  hint: ");
                text.push_str(hint);
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_report() {
        let report = Report {
            operation: "encrypt-key",
            endpoint: Some("tcp://127.0.0.1:1500".into()),
            outcome: Outcome::Ok {
                value: "ABCD".into(),
            },
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &report).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "operation": "encrypt-key",
                "endpoint": "tcp://127.0.0.1:1500",
                "status": "ok",
                "value": "ABCD",
            })
        );
    }

    #[test]
    fn test_human_availability() {
        let report = Report {
            operation: "check",
            endpoint: Some("tcp://10.0.0.5:1500".into()),
            outcome: Outcome::Availability { available: false },
        };
        assert_eq!(
            render(OutputFormat::Human, &report).unwrap(),
            "tcp://10.0.0.5:1500 is unreachable"
        );
    }

    #[test]
    fn test_error_rendering() {
        let err = CliError::NoReply { operation: "raw" };
        let human = render_error(OutputFormat::Human, &err);
        assert!(human.starts_with("Device: No usable reply"));

        let json: serde_json::Value =
            serde_json::from_str(&render_error(OutputFormat::Json, &err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["category"], "Device");
    }
}
