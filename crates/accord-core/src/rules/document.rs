//! YAML rule document for standalone runs.
//!
//! ```yaml
//! default: false
//! rules:
//!   - mainname: GPL-2.0-only
//!     subname: Apache-2.0
//!     maintype: ~
//!     subtype: ~
//!     compatibility: false
//!     text: Apache-2.0 patent terms conflict with GPL-2.0
//! ```
//!
//! A field that is missing, YAML null, or the literal string `"~"` is a
//! wildcard and never discriminates.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// Literal wildcard marker accepted for any name or type field.
pub const WILDCARD: &str = "~";

/// Ordered rule entries plus the outcome used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(deserialize_with = "outcome")]
    pub default: bool,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(
        default,
        deserialize_with = "optional_outcome",
        skip_serializing_if = "Option::is_none"
    )]
    pub compatibility: Option<bool>,
    #[serde(
        default,
        deserialize_with = "wildcard",
        skip_serializing_if = "Option::is_none"
    )]
    pub maintype: Option<String>,
    #[serde(
        default,
        deserialize_with = "wildcard",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtype: Option<String>,
    #[serde(
        default,
        deserialize_with = "wildcard",
        skip_serializing_if = "Option::is_none"
    )]
    pub mainname: Option<String>,
    #[serde(
        default,
        deserialize_with = "wildcard",
        skip_serializing_if = "Option::is_none"
    )]
    pub subname: Option<String>,
    /// Free-form explanation; carried through export, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RuleDocument {
    /// Parse a rule document from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Document` if the YAML is malformed, `default` is
    /// missing, or an outcome is not a recognizable boolean.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        serde_yaml::from_str(yaml).map_err(|e| CoreError::document("rule document", e))
    }

    /// Read and parse a rule document from disk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Read` if the file cannot be read, or
    /// `CoreError::Document` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Render the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, CoreError> {
        serde_yaml::to_string(self).map_err(|e| CoreError::Other(e.into()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOutcome {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn parse_outcome(raw: RawOutcome) -> Result<bool, String> {
    match raw {
        RawOutcome::Bool(b) => Ok(b),
        RawOutcome::Int(1) => Ok(true),
        RawOutcome::Int(0) => Ok(false),
        RawOutcome::Int(other) => Err(format!("unrecognized compatibility value {other}")),
        RawOutcome::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Ok(true),
            "false" | "f" | "no" | "0" => Ok(false),
            _ => Err(format!("unrecognized compatibility value '{text}'")),
        },
    }
}

fn outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    parse_outcome(RawOutcome::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn optional_outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Option::<RawOutcome>::deserialize(deserializer)?
        .map(parse_outcome)
        .transpose()
        .map_err(serde::de::Error::custom)
}

fn wildcard<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != WILDCARD))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_entries_in_order_with_wildcards() {
        let doc = RuleDocument::from_yaml_str(
            r#"
default: false
rules:
  - maintype: permissive
    subtype: copyleft
    mainname: ~
    subname: "~"
    compatibility: true
    text: permissive code can flow into copyleft works
  - mainname: GPL-2.0-only
    subname: Apache-2.0
    compatibility: "false"
"#,
        )
        .unwrap();

        assert!(!doc.default);
        assert_eq!(doc.rules.len(), 2);
        assert_eq!(
            doc.rules[0],
            RuleEntry {
                compatibility: Some(true),
                maintype: Some("permissive".into()),
                subtype: Some("copyleft".into()),
                mainname: None,
                subname: None,
                text: Some("permissive code can flow into copyleft works".into()),
            }
        );
        assert_eq!(doc.rules[1].compatibility, Some(false));
        assert_eq!(doc.rules[1].mainname.as_deref(), Some("GPL-2.0-only"));
        assert_eq!(doc.rules[1].maintype, None);
    }

    #[test]
    fn outcome_accepts_short_and_numeric_forms() {
        let doc = RuleDocument::from_yaml_str(
            "default: t\nrules:\n  - compatibility: 0\n  - compatibility: 'yes'\n",
        )
        .unwrap();
        assert!(doc.default);
        assert_eq!(doc.rules[0].compatibility, Some(false));
        assert_eq!(doc.rules[1].compatibility, Some(true));
    }

    #[test]
    fn single_letter_yes_no_is_rejected() {
        for text in ["y", "n", "Y"] {
            let yaml = format!("default: false\nrules:\n  - compatibility: '{text}'\n");
            let err = RuleDocument::from_yaml_str(&yaml).unwrap_err();
            assert!(err.to_string().contains("unrecognized"), "{text}: {err}");
        }
    }

    #[test]
    fn entry_without_outcome_is_kept() {
        let doc =
            RuleDocument::from_yaml_str("default: false\nrules:\n  - mainname: MIT\n").unwrap();
        assert_eq!(doc.rules[0].compatibility, None);
    }

    #[test]
    fn missing_default_is_rejected() {
        let err = RuleDocument::from_yaml_str("rules: []\n").unwrap_err();
        assert!(matches!(err, CoreError::Document { .. }), "{err}");
    }

    #[test]
    fn garbage_outcome_is_rejected() {
        let err = RuleDocument::from_yaml_str("default: maybe\n").unwrap_err();
        assert!(err.to_string().contains("maybe"), "{err}");
    }

    #[test]
    fn missing_rules_list_means_no_entries() {
        let doc = RuleDocument::from_yaml_str("default: true\n").unwrap();
        assert!(doc.rules.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleDocument::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::Read { .. }));
    }

    #[test]
    fn yaml_output_parses_back() {
        let doc = RuleDocument {
            default: false,
            rules: vec![RuleEntry {
                compatibility: Some(true),
                mainname: Some("MIT".into()),
                subtype: Some("copyleft".into()),
                ..RuleEntry::default()
            }],
        };
        let yaml = doc.to_yaml_string().unwrap();
        assert_eq!(RuleDocument::from_yaml_str(&yaml).unwrap(), doc);
    }
}
