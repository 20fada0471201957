use std::path::PathBuf;

/// Failures that can end or degrade a reading session.
///
/// Out-of-range seeks are not represented here: every index is clamped before
/// it reaches the session state.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error(transparent)]
    Ingestion(#[from] IngestError),

    #[error("document {document_id} contains no readable words")]
    EmptyContent { document_id: String },

    #[error("position store {operation} failed: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ReaderError {
    pub fn persistence(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        ReaderError::Persistence {
            operation,
            source: source.into(),
        }
    }

    /// Ingestion and empty-content failures end the session; the caller should
    /// send the user back to the document list.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReaderError::Ingestion(_) | ReaderError::EmptyContent { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_failures_are_ingestion_and_empty_content() {
        let empty = ReaderError::EmptyContent {
            document_id: "abc".to_string(),
        };
        let unsupported = ReaderError::from(IngestError::UnsupportedFormat {
            extension: "pdf".to_string(),
        });
        let persistence = ReaderError::persistence("save", anyhow::anyhow!("disk full"));

        assert!(empty.is_terminal());
        assert!(unsupported.is_terminal());
        assert!(!persistence.is_terminal());
    }

    #[test]
    fn persistence_message_names_the_operation() {
        let err = ReaderError::persistence("get", anyhow::anyhow!("locked"));
        assert_eq!(err.to_string(), "position store get failed: locked");
    }
}
