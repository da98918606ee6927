//! Error types for the funnel-engine crate
//!
//! Features:
//! - Categorized error kinds matching the engine stages
//! - Optional report context
//! - Source error chaining
//!
//! Missing references and zero denominators are NOT errors; the join treats
//! them as unmatched and the conversion calculator yields `None`.

use std::fmt;

use funnel_storage::StorageError;

use crate::config::ConfigError;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity source could not deliver a collection (fatal)
    Source,
    /// Report assembly errors
    Report,
    /// Configuration errors
    Config,
    /// Result table export errors
    Output,
    /// IO errors
    IO,
    /// Internal errors (bugs)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Source => "source",
            ErrorKind::Report => "report",
            ErrorKind::Config => "config",
            ErrorKind::Output => "output",
            ErrorKind::IO => "io",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Unified error type
#[derive(Debug)]
pub struct FunnelError {
    pub kind: ErrorKind,
    pub message: String,
    pub report: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FunnelError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            report: None,
            source: None,
        }
    }

    /// Attach the report being computed when the error happened
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Source, message)
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Report, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Output, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for FunnelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(ref report) = self.report {
            write!(f, " (report: {})", report)?;
        }
        Ok(())
    }
}

impl std::error::Error for FunnelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FunnelError>;

impl From<StorageError> for FunnelError {
    fn from(err: StorageError) -> Self {
        FunnelError::source_unavailable(format!("Entity source failed: {}", err)).with_source(err)
    }
}

impl From<ConfigError> for FunnelError {
    fn from(err: ConfigError) -> Self {
        FunnelError::config(err.to_string()).with_source(err)
    }
}

impl From<std::io::Error> for FunnelError {
    fn from(err: std::io::Error) -> Self {
        FunnelError::new(ErrorKind::IO, format!("IO error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for FunnelError {
    fn from(err: serde_json::Error) -> Self {
        FunnelError::output(format!("JSON serialization error: {}", err)).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = FunnelError::report("empty partition").with_report("general_funnel");

        let msg = format!("{}", err);
        assert_eq!(msg, "[report] empty partition (report: general_funnel)");
    }

    #[test]
    fn test_from_storage_error() {
        let storage = StorageError::source_unavailable("signup", "no such table: signup");
        let err: FunnelError = storage.into();

        assert_eq!(err.kind, ErrorKind::Source);
        assert!(err.message.contains("signup"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_config_error() {
        let err: FunnelError = ConfigError::MissingVersion.into();
        assert_eq!(err.kind, ErrorKind::Config);
        assert!(err.message.contains("version"));
    }

    #[test]
    fn test_every_kind_has_a_producer() {
        let io: FunnelError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        let json: FunnelError = serde_json::from_str::<u32>("x").unwrap_err().into();
        let storage: FunnelError = StorageError::database("locked").into();
        let config: FunnelError = ConfigError::Validation("empty".to_string()).into();

        let kinds = [
            storage.kind,
            FunnelError::report("bounds").kind,
            config.kind,
            json.kind,
            io.kind,
            FunnelError::internal("lineage").kind,
        ];
        assert_eq!(
            kinds,
            [
                ErrorKind::Source,
                ErrorKind::Report,
                ErrorKind::Config,
                ErrorKind::Output,
                ErrorKind::IO,
                ErrorKind::Internal,
            ]
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Source.as_str(), "source");
        assert_eq!(ErrorKind::Output.as_str(), "output");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
    }
}
