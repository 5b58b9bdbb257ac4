use std::path::PathBuf;
use thiserror::Error;

/// Error types for loading and interpreting translation catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading a catalog file or directory failed
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML
    #[error("XML error at byte {position}: {message}")]
    Xml { position: usize, message: String },

    /// Well-formed XML that is not a valid TS document
    #[error("Invalid TS document: {0}")]
    Format(String),

    /// A locale identifier could not be parsed or has no plural data
    #[error("Invalid locale '{locale}': {reason}")]
    Locale { locale: String, reason: String },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn locale(locale: &str, reason: impl std::fmt::Display) -> Self {
        CatalogError::Locale {
            locale: locale.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CatalogError::Xml {
            position: 12,
            message: "unexpected end".to_string(),
        };
        assert_eq!(err.to_string(), "XML error at byte 12: unexpected end");

        let err = CatalogError::locale("xx_!!", "bad subtag");
        assert_eq!(err.to_string(), "Invalid locale 'xx_!!': bad subtag");
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = CatalogError::io(
            "missing.ts",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().starts_with("Failed to read 'missing.ts'"));
        assert!(err.source().is_some());
    }
}
