//! Allow-list of zero-argument SQL functions accepted as literal values in
//! `update` data.
//!
//! A string value matching an entry (case-insensitively) is emitted into the
//! SET clause as a server-side expression instead of a bound placeholder.
//! The set is closed but externally extensible, since new engine functions
//! may need to be added without code changes.

use std::collections::HashSet;

const DEFAULT_FUNCTIONS: &[&str] = &[
    "NOW()",
    "CURRENT_TIMESTAMP",
    "UUID()",
    "RAND()",
    "CURDATE()",
    "CURTIME()",
    "UNIX_TIMESTAMP()",
    "UTC_TIMESTAMP()",
    "SYSDATE()",
    "LOCALTIME()",
    "LOCALTIMESTAMP()",
    "PI()",
    "DATABASE()",
    "USER()",
    "VERSION()",
];

/// Case-insensitive allow-list, checked before falling back to binding.
#[derive(Debug, Clone)]
pub struct SqlFunctions {
    entries: HashSet<String>,
}

impl Default for SqlFunctions {
    fn default() -> Self {
        Self {
            entries: DEFAULT_FUNCTIONS.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

impl SqlFunctions {
    /// Add one function expression (e.g. `"UTC_DATE()"`).
    #[must_use]
    pub fn with(mut self, function: impl AsRef<str>) -> Self {
        self.entries.insert(function.as_ref().to_ascii_uppercase());
        self
    }

    /// Whether `candidate` names an allow-listed function.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.entries.contains(&candidate.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_case_insensitively() {
        let functions = SqlFunctions::default();
        assert!(functions.contains("NOW()"));
        assert!(functions.contains("now()"));
        assert!(functions.contains("Current_Timestamp"));
        assert!(!functions.contains("DROP TABLE users"));
        assert!(!functions.contains("NOW"));
    }

    #[test]
    fn extensions_are_honored() {
        let functions = SqlFunctions::default().with("utc_date()");
        assert!(functions.contains("UTC_DATE()"));
    }
}
