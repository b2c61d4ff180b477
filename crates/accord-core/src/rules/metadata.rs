//! License-metadata table: `name,type` lines mapping license names to types.
//!
//! The first line is a header and is skipped. Blank lines are ignored. When a
//! name appears twice the later line wins.

use std::collections::HashMap;
use std::path::Path;

use crate::entities::License;
use crate::errors::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseTable {
    types: HashMap<String, String>,
}

impl LicenseTable {
    /// Parse the table from its text form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Document` for a data line without a `,` separator
    /// or with an empty name.
    pub fn from_csv_str(text: &str) -> Result<Self, CoreError> {
        let mut types = HashMap::new();

        for (idx, line) in text.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(',');
            let name = fields.next().map(clean).unwrap_or_default();
            let Some(license_type) = fields.next().map(clean) else {
                return Err(CoreError::document(
                    "license metadata",
                    format!("line {}: expected 'name,type'", idx + 1),
                ));
            };
            if name.is_empty() {
                return Err(CoreError::document(
                    "license metadata",
                    format!("line {}: empty license name", idx + 1),
                ));
            }

            types.insert(name.to_string(), license_type.to_string());
        }

        Ok(Self { types })
    }

    /// Read and parse the table from disk.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Read` if the file cannot be read, or
    /// `CoreError::Document` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
        Self::from_csv_str(&text)
    }

    /// Type recorded for `name`, if any.
    #[must_use]
    pub fn license_type(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    /// Build the standalone license for `name`.
    ///
    /// Names missing from the table keep an empty type.
    #[must_use]
    pub fn resolve(&self, name: &str) -> License<String> {
        License::new(
            name.to_string(),
            name,
            self.license_type(name).unwrap_or_default(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn clean(field: &str) -> &str {
    field.trim().trim_matches('"')
}
