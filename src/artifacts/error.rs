use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use yansi::{Color, Paint};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub start: i32,
    pub end: i32,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Error" | "error" => Ok(Self::Error),
            "Warning" | "warning" => Ok(Self::Warning),
            "Info" | "info" => Ok(Self::Info),
            s => Err(format!("Invalid severity: {s}")),
        }
    }
}

impl Severity {
    /// Returns `true` if the severity is `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns `true` if the severity is `Warning`.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning)
    }

    /// Returns the string representation of the severity.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }

    /// The label diagnostics are printed with, `ERROR` for errors.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }

    /// Returns the color to format the severity with.
    ///
    /// Errors are red, anything else is yellow.
    pub const fn color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning | Self::Info => Color::Yellow,
        }
    }
}

/// A diagnostic reported by the compiler. Might also represent a warning or informational
/// message.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub component: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_message: Option<String>,
}

impl Error {
    /// Returns `true` if the error is an error.
    pub const fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    /// Returns `true` if the error is a warning.
    pub const fn is_warning(&self) -> bool {
        self.severity.is_warning()
    }

    /// The message to show: the compiler's formatted message, if any.
    pub fn text(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }
}

/// Formats the diagnostic as `[SEVERITY]: message`, the severity colored by
/// [Severity::color].
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = Paint::new(self.severity.label()).fg(self.severity.color());
        write!(f, "[{severity}]: {}", self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error(severity: Severity) -> Error {
        Error {
            source_location: Some(SourceLocation { file: "A.sol".into(), start: 0, end: 8 }),
            r#type: "ParserError".into(),
            component: "general".into(),
            severity,
            error_code: Some("2314".into()),
            message: "Expected ';' but got '}'".into(),
            formatted_message: Some(
                "ParserError: Expected ';' but got '}'\n --> A.sol:3:1:".into(),
            ),
        }
    }

    #[test]
    fn can_deserialize_solc_error() {
        let raw = r#"{
            "component": "general",
            "errorCode": "2314",
            "formattedMessage": "ParserError: Expected ';' but got '}'\n --> A.sol:3:1:",
            "message": "Expected ';' but got '}'",
            "severity": "error",
            "sourceLocation": { "end": 8, "file": "A.sol", "start": 0 },
            "type": "ParserError"
        }"#;
        let err: Error = serde_json::from_str(raw).unwrap();
        assert_eq!(err, error(Severity::Error));
        assert!(err.is_error());
    }

    #[test]
    fn can_deserialize_sparse_error() {
        let err: Error =
            serde_json::from_str(r#"{ "severity": "warning", "message": "unused" }"#).unwrap();
        assert!(err.is_warning());
        assert_eq!(err.text(), "unused");
    }

    #[test]
    fn colors_severity_marker() {
        let s = error(Severity::Error).to_string();
        assert!(s.contains("\u{1b}[31mERROR"), "{s:?}");
        assert!(s.ends_with("ParserError: Expected ';' but got '}'\n --> A.sol:3:1:"));

        let s = error(Severity::Warning).to_string();
        assert!(s.contains("\u{1b}[33mWARNING"), "{s:?}");
    }
}
