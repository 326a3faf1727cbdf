// Consistent exit codes for the gatehouse CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/configuration error
//   11 = authentication error
//   12 = access denied / not invited
//   13 = database error

use gatehouse_auth::{AuthError, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    Auth = 11,
    Access = 12,
    Database = 13,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        if let Some(auth_error) = err.chain().find_map(|cause| cause.downcast_ref::<AuthError>()) {
            return match auth_error {
                AuthError::Internal(inner) if is_database_error(inner) => Self::Database,
                _ => Self::from_auth_code(auth_error.code()),
            };
        }

        if is_database_error(err) {
            return Self::Database;
        }

        Self::Error
    }

    fn from_auth_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::AuthDisabled | ErrorCode::InvalidCredentials => Self::Auth,
            ErrorCode::NotInvited | ErrorCode::AccessDenied | ErrorCode::InvitationInvalid => {
                Self::Access
            }
            ErrorCode::InternalError => Self::Error,
        }
    }
}

fn is_database_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<sqlx::Error>() || cause.is::<sqlx::migrate::MigrateError>())
}
