//! Validation diagnostics
//!
//! Diagnostics are data: rules never fail, they return these. The serialized shape is stable:
//!
//!     {"code": "PT004", "severity": "error", "message": "...", "line": 3, "startCol": 4, "endCol": 9}
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[serde(alias = "information")]
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// 0-indexed line in the original source
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    /// `line:col severity code message`, 1-based for people
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} {}",
            self.line + 1,
            self.start_col + 1,
            self.severity,
            self.code,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagnostic {
        Diagnostic {
            code: "PT006".to_string(),
            severity: Severity::Warning,
            message: "extension `TXT` should be lowercase".to_string(),
            line: 1,
            start_col: 13,
            end_col: 16,
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "2:14 warning PT006 extension `TXT` should be lowercase"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["code"], "PT006");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["startCol"], 13);
        assert_eq!(json["endCol"], 16);
        assert_eq!(json["line"], 1);
    }
}
