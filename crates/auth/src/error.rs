use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthDisabled,
    InvalidCredentials,
    NotInvited,
    AccessDenied,
    InvitationInvalid,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthDisabled => "AUTH_DISABLED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotInvited => "NOT_INVITED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::InvitationInvalid => "INVITATION_INVALID",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub const fn retryable(self) -> bool {
        matches!(self, Self::InternalError)
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            Self::AuthDisabled => "email/password auth is not enabled for this workspace",
            Self::InvalidCredentials => "wrong email or password",
            Self::NotInvited => "user is not a member of this workspace and has no invitation",
            Self::AccessDenied => "user does not have access to this workspace",
            Self::InvitationInvalid => "invitation is invalid or has expired",
            Self::InternalError => "internal server error",
        }
    }
}

/// Failure of a sign-in operation. Every variant is terminal for the request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email/password auth is not enabled for this workspace")]
    AuthDisabled,

    /// Unknown email and wrong password both land here.
    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("user is not a member of this workspace and has no invitation")]
    NotInvited,

    #[error("{message}")]
    AccessDenied { message: String },

    #[error("{message}")]
    InvitationInvalid { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied { message: message.into() }
    }

    pub fn invitation_invalid(message: impl Into<String>) -> Self {
        Self::InvitationInvalid { message: message.into() }
    }

    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }

    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AuthDisabled => ErrorCode::AuthDisabled,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::NotInvited => ErrorCode::NotInvited,
            Self::AccessDenied { .. } => ErrorCode::AccessDenied,
            Self::InvitationInvalid { .. } => ErrorCode::InvitationInvalid,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}
