use serde::Deserialize;

/// Settings shared by every engine operation.
///
/// ```rust
/// use tabula_core::EngineConfig;
/// let config = EngineConfig::default();
/// assert!(!config.log_statements);
/// assert_eq!(config.string_length, 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Log every generated statement at debug level.
    pub log_statements: bool,
    /// Length of the bounded string columns (`VARCHAR(n)`, `NVARCHAR(n)`).
    pub string_length: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_statements: false,
            string_length: 255,
        }
    }
}
