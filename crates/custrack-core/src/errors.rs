use custrack_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using CustrackError
pub type Result<T> = std::result::Result<T, CustrackError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code for programmatic handling and to an
/// HTTP status class for the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller errors
    InvalidArgument,
    NotFound,
    Parse,

    // Integration/IO
    Storage,
    Serialization,
    Io,
    ExternalService,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Storage => "ERR_STORAGE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP status class an API caller should receive for this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidArgument | ExErrorKind::Parse => 400,
            ExErrorKind::NotFound => 404,
            ExErrorKind::ExternalService => 502,
            ExErrorKind::Storage
            | ExErrorKind::Serialization
            | ExErrorKind::Io
            | ExErrorKind::Concurrency
            | ExErrorKind::Internal => 500,
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the operation and
/// entity context needed to make a log line useful on its own.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (usually a customer id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Wrap a lower-level error, keeping it reachable through `source_error`
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach candidate customer ids (ambiguous identity matches)
    pub fn with_candidates(mut self, ids: Vec<String>) -> Self {
        self.candidates = Some(ids);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by custrack operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustrackError {
    // ===== Lookup =====
    #[error("Customer not found: {customer_id}")]
    CustomerNotFound { customer_id: String },

    // ===== Validation =====
    /// A required identity matching key was empty
    #[error("Matching key '{key}' must not be empty")]
    EmptyMatchKey { key: &'static str },

    #[error("Required field '{field}' must not be empty")]
    MissingField { field: &'static str },

    #[error("Unrecognized sort field: {value}")]
    InvalidSort { value: String },

    #[error("Unrecognized sort direction: {value}")]
    InvalidDirection { value: String },

    #[error("Invalid paging parameter {param}={value}")]
    InvalidPaging { param: &'static str, value: String },

    #[error("Unrecognized license type: {value}")]
    InvalidLicenseType { value: String },

    // ===== Packet ingestion =====
    #[error("Archive {name} is unreadable: {reason}")]
    ArchiveUnreadable { name: String, reason: String },

    #[error("Archive {name} is {size} bytes, limit is {limit}")]
    ArchiveTooLarge { name: String, size: u64, limit: u64 },

    /// A well-known archive member could not be decoded
    #[error("Malformed archive member {member}: {reason}")]
    MalformedMember { member: String, reason: String },

    // ===== Generic =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<CustrackError> for ExError {
    fn from(err: CustrackError) -> Self {
        match err {
            CustrackError::CustomerNotFound { customer_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(customer_id)
                .with_message("Customer not found"),

            CustrackError::EmptyMatchKey { .. }
            | CustrackError::MissingField { .. }
            | CustrackError::InvalidSort { .. }
            | CustrackError::InvalidDirection { .. }
            | CustrackError::InvalidPaging { .. }
            | CustrackError::InvalidLicenseType { .. }
            | CustrackError::ArchiveTooLarge { .. } => {
                ExError::new(ExErrorKind::InvalidArgument).with_message(err.to_string())
            }

            CustrackError::ArchiveUnreadable { ref name, .. } => {
                let name = name.clone();
                ExError::new(ExErrorKind::Parse)
                    .with_op("extract_archive")
                    .with_entity_id(name)
                    .with_message(err.to_string())
            }
            CustrackError::MalformedMember { .. } => ExError::new(ExErrorKind::Parse)
                .with_op("parse_member")
                .with_message(err.to_string()),

            CustrackError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            CustrackError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CustrackError {
    fn from(err: serde_json::Error) -> Self {
        CustrackError::Serialization {
            message: err.to_string(),
        }
    }
}
