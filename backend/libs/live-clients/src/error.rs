use aws_sdk_ivs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service}: resource not found: {message}")]
    NotFound {
        service: &'static str,
        message: String,
    },

    #[error("{service}: access denied: {message}")]
    AccessDenied {
        service: &'static str,
        message: String,
    },

    #[error("{service}: request throttled: {message}")]
    Throttled {
        service: &'static str,
        message: String,
    },

    #[error("{service}: invalid request: {message}")]
    Validation {
        service: &'static str,
        message: String,
    },

    #[error("{service}: channel is not broadcasting: {message}")]
    NotBroadcasting {
        service: &'static str,
        message: String,
    },

    #[error("{service}: response is missing `{field}`")]
    MalformedResponse {
        service: &'static str,
        field: &'static str,
    },

    #[error("{service}: AWS SDK error: {message}")]
    Sdk {
        service: &'static str,
        message: String,
    },
}

impl ServiceError {
    /// Classify an AWS error code into a typed error.
    pub fn from_code(service: &'static str, code: Option<&str>, message: String) -> Self {
        match code {
            Some("ResourceNotFoundException") => Self::NotFound { service, message },
            Some("AccessDeniedException") => Self::AccessDenied { service, message },
            Some("ThrottlingException")
            | Some("ServiceQuotaExceededException")
            | Some("ProvisionedThroughputExceededException")
            | Some("RequestLimitExceeded") => Self::Throttled { service, message },
            Some("ValidationException") => Self::Validation { service, message },
            Some("ChannelNotBroadcasting") => Self::NotBroadcasting { service, message },
            _ => Self::Sdk { service, message },
        }
    }

    pub(crate) fn from_sdk<E, R>(service: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let code = err.code().map(str::to_owned);
        let message = DisplayErrorContext(&err).to_string();
        Self::from_code(service, code.as_deref(), message)
    }

    pub(crate) fn missing(service: &'static str, field: &'static str) -> Self {
        Self::MalformedResponse { service, field }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AccessDenied { .. } => "access_denied",
            Self::Throttled { .. } => "throttled",
            Self::Validation { .. } => "validation",
            Self::NotBroadcasting { .. } => "not_broadcasting",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Sdk { .. } => "upstream_error",
        }
    }

    /// True when the platform reports the channel as offline or unknown.
    pub fn is_not_live(&self) -> bool {
        matches!(self, Self::NotBroadcasting { .. } | Self::NotFound { .. })
    }
}
