//! Collaborators the sign-in services call out to.
//!
//! Each trait is object safe and returns boxed futures so services can hold
//! `Arc<dyn Trait>` values and tests can substitute hand-written doubles.

use std::{future::Future, pin::Pin};

use gatehouse_common::types::{Invitation, UserRecord};
use uuid::Uuid;

use crate::error::AuthError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Decides whether an existing user may enter a workspace.
pub trait WorkspaceAccessChecker: Send + Sync {
    /// Resolves to `Ok(())` when access is allowed, otherwise an error
    /// (normally [`AuthError::AccessDenied`]).
    fn check(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>>;
}

/// Checks a submitted password against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

pub trait UserDirectory: Send + Sync {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AuthError>>;
}

pub trait MembershipStore: Send + Sync {
    fn exists(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<bool, AuthError>>;

    fn add(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>>;
}

pub trait WorkspaceInvitationGateway: Send + Sync {
    fn get_pending<'a>(
        &'a self,
        email: &'a str,
        workspace_id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Invitation>, AuthError>>;

    /// Fails with [`AuthError::InvitationInvalid`] when the invitation can
    /// no longer be used.
    fn validate<'a>(&'a self, invitation: &'a Invitation) -> BoxFuture<'a, Result<(), AuthError>>;
}
