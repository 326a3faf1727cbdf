//! Workspace access gating for sign-in and sign-up.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | # | Condition | Outcome |
//! |---|---|---|
//! | 1 | no target workspace | allowed |
//! | 2 | validated invitation present | allowed |
//! | 3 | workspace invite hash present | allowed |
//! | 4 | principal is a new user | allowed |
//! | 5 | existing user | access checker decides |

use std::sync::Arc;

use gatehouse_common::types::{SignInContext, SignInUser};
use tracing::debug;
use uuid::Uuid;

use crate::{error::AuthError, ports::WorkspaceAccessChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    NoWorkspace,
    InvitationBypass,
    InviteHashBypass,
    NewUser,
    CheckRequired { user_id: Uuid, workspace_id: Uuid },
}

impl AccessDecision {
    pub fn for_context(context: &SignInContext) -> Self {
        let Some(workspace) = context.workspace.as_ref() else {
            return Self::NoWorkspace;
        };

        if context.invitation.is_some() {
            return Self::InvitationBypass;
        }

        if context.workspace_invite_hash.is_some() {
            return Self::InviteHashBypass;
        }

        match &context.user {
            SignInUser::NewUser { .. } => Self::NewUser,
            SignInUser::ExistingUser { existing_user } => {
                Self::CheckRequired { user_id: existing_user.id, workspace_id: workspace.id }
            }
        }
    }

    pub const fn rule(self) -> &'static str {
        match self {
            Self::NoWorkspace => "no_workspace",
            Self::InvitationBypass => "invitation",
            Self::InviteHashBypass => "invite_hash",
            Self::NewUser => "new_user",
            Self::CheckRequired { .. } => "access_check",
        }
    }
}

#[derive(Clone)]
pub struct AccessResolver {
    access_checker: Arc<dyn WorkspaceAccessChecker>,
}

impl AccessResolver {
    pub fn new(access_checker: Arc<dyn WorkspaceAccessChecker>) -> Self {
        Self { access_checker }
    }

    /// Performs at most one access check. Checker errors are returned as-is.
    pub async fn resolve_access(&self, context: &SignInContext) -> Result<(), AuthError> {
        let decision = AccessDecision::for_context(context);
        debug!(rule = decision.rule(), "resolved sign-in access rule");

        match decision {
            AccessDecision::CheckRequired { user_id, workspace_id } => {
                self.access_checker.check(user_id, workspace_id).await
            }
            _ => Ok(()),
        }
    }
}
