//! Error types surfaced by every backend adapter.

use thiserror::Error;

/// Errors returned by driver operations, transports and traversal.
///
/// Every adapter returns these values verbatim or wrapped with context; the
/// traversal engine treats all of them as terminal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScmError {
    /// The backend answered with HTTP 401.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with an error status and (usually) a message in
    /// its own error envelope.
    #[error("backend error ({status}): {message}")]
    Api {
        /// HTTP status code of the failed response.
        status: u16,
        /// Message extracted from the backend error envelope.
        message: String,
    },

    /// The backend does not implement the requested capability or operation.
    #[error("operation not supported by this backend")]
    NotSupported,

    /// A successful response carried a body that could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport failure: {message}")]
    Transport {
        /// Transport-level error detail.
        message: String,
    },

    /// A base URL or request path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Traversal found a pagination cursor that would refetch a page.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the offending cursor.
        message: String,
    },

    /// A step of a multi-request lookup failed.
    #[error("{context}: {source}")]
    Lookup {
        /// What the lookup was trying to resolve.
        context: String,
        /// Underlying failure.
        #[source]
        source: Box<ScmError>,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl ScmError {
    /// Wraps `self` with the context of a multi-step lookup.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Lookup {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns true when the backend lacks the capability, looking through
    /// any lookup context.
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        match self {
            Self::NotSupported => true,
            Self::Lookup { source, .. } => source.is_not_supported(),
            _ => false,
        }
    }

    /// Returns the HTTP status associated with the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Lookup { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ScmError;

    #[rstest]
    fn lookup_context_preserves_classification() {
        let error = ScmError::NotSupported.context("failed to resolve repository id");

        assert!(error.is_not_supported(), "expected NotSupported through context");
        assert_eq!(
            error.to_string(),
            "failed to resolve repository id: operation not supported by this backend"
        );
    }

    #[rstest]
    #[case::unauthorized(ScmError::Unauthorized, Some(401))]
    #[case::api(ScmError::Api { status: 404, message: "Not Found".to_owned() }, Some(404))]
    #[case::decode(ScmError::Decode { message: "eof".to_owned() }, None)]
    #[case::wrapped(
        ScmError::Api { status: 409, message: "conflict".to_owned() }.context("merge"),
        Some(409)
    )]
    fn status_reports_http_code(#[case] error: ScmError, #[case] expected: Option<u16>) {
        assert_eq!(error.status(), expected);
    }
}
