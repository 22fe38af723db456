use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} parameter is required")]
    MissingField { field: &'static str },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("downstream service rejected the request: {message}")]
    DownstreamRejected { message: String, details: Option<String> },
    #[error("downstream service is unavailable: {message}")]
    DownstreamUnavailable { message: String, details: Option<String> },
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("unprocessable: {message}")]
    Unprocessable { message: String, details: Option<String>, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, details: Option<String>, correlation_id: String },
}

impl InterfaceError {
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::Unprocessable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            Self::BadRequest { .. } => None,
            Self::Unprocessable { details, .. } | Self::Internal { details, .. } => {
                details.as_deref()
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Unprocessable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::DownstreamRejected { message, details } => Self::Unprocessable {
                message,
                details,
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::DownstreamUnavailable { message, details } => Self::Internal {
                message,
                details,
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Configuration(message) => {
                Self::Internal { message, details: None, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
