//! Entry point an HTTP handler holds: access gating, password challenge and
//! login token issuing behind one cloneable value.

use std::sync::Arc;

use gatehouse_common::types::{Credentials, SignInContext, UserRecord, WorkspaceRef};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    challenge::ChallengeService,
    error::AuthError,
    password::Argon2CredentialVerifier,
    ports::{MembershipStore, UserDirectory, WorkspaceAccessChecker, WorkspaceInvitationGateway},
    resolver::AccessResolver,
    token::{LoginTokenService, WorkspaceAccess},
};

/// Result of a successful password sign-in.
#[derive(Debug, Clone)]
pub struct SignInGrant {
    pub user: UserRecord,
    pub workspace_id: Uuid,
    pub login_token: String,
    pub expires_in_seconds: i64,
}

#[derive(Clone)]
pub struct AuthService {
    resolver: AccessResolver,
    challenge: ChallengeService,
    tokens: LoginTokenService,
}

impl AuthService {
    pub fn new(resolver: AccessResolver, challenge: ChallengeService, tokens: LoginTokenService) -> Self {
        Self { resolver, challenge, tokens }
    }

    /// Wires every port to one store and verifies passwords with argon2.
    pub fn with_store<S>(store: Arc<S>, tokens: LoginTokenService, password_auth_enabled: bool) -> Self
    where
        S: UserDirectory
            + MembershipStore
            + WorkspaceInvitationGateway
            + WorkspaceAccessChecker
            + 'static,
    {
        let resolver = AccessResolver::new(store.clone());
        let challenge = ChallengeService::new(
            store.clone(),
            Arc::new(Argon2CredentialVerifier),
            store.clone(),
            store,
        )
        .with_password_auth_enabled(password_auth_enabled);

        Self::new(resolver, challenge, tokens)
    }

    pub async fn check_access_for_sign_in(&self, context: &SignInContext) -> Result<(), AuthError> {
        self.resolver.resolve_access(context).await
    }

    pub async fn challenge(
        &self,
        credentials: &Credentials,
        workspace: &WorkspaceRef,
    ) -> Result<UserRecord, AuthError> {
        self.challenge.challenge(credentials, workspace).await
    }

    pub async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
        workspace: &WorkspaceRef,
    ) -> Result<SignInGrant, AuthError> {
        let user = self.challenge.challenge(credentials, workspace).await?;
        let login_token = self.tokens.issue(user.id, workspace.id)?;

        info!(user_id = %user.id, workspace_id = %workspace.id, "password sign-in succeeded");

        Ok(SignInGrant {
            user,
            workspace_id: workspace.id,
            login_token,
            expires_in_seconds: self.tokens.ttl_seconds(),
        })
    }

    pub fn verify_login_token(&self, token: &str) -> Result<WorkspaceAccess, AuthError> {
        self.tokens.validate(token).map_err(|error| {
            debug!(%error, "login token rejected");
            AuthError::InvalidCredentials
        })
    }
}
