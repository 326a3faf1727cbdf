// Call-recording collaborator doubles shared by unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use gatehouse_common::types::{Invitation, UserRecord};
use uuid::Uuid;

use crate::{
    error::AuthError,
    ports::{
        BoxFuture, CredentialVerifier, MembershipStore, UserDirectory, WorkspaceAccessChecker,
        WorkspaceInvitationGateway,
    },
};

#[derive(Debug, Clone)]
enum CheckOutcome {
    Allow,
    Deny(String),
    Fail(String),
}

pub struct RecordingAccessChecker {
    outcome: CheckOutcome,
    calls: Mutex<Vec<(Uuid, Uuid)>>,
}

impl RecordingAccessChecker {
    pub fn allow() -> Self {
        Self { outcome: CheckOutcome::Allow, calls: Mutex::default() }
    }

    pub fn deny(message: &str) -> Self {
        Self { outcome: CheckOutcome::Deny(message.to_owned()), calls: Mutex::default() }
    }

    pub fn fail(message: &str) -> Self {
        Self { outcome: CheckOutcome::Fail(message.to_owned()), calls: Mutex::default() }
    }

    pub fn calls(&self) -> Vec<(Uuid, Uuid)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

impl WorkspaceAccessChecker for RecordingAccessChecker {
    fn check(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        self.calls.lock().expect("calls lock").push((user_id, workspace_id));
        let outcome = self.outcome.clone();
        Box::pin(async move {
            match outcome {
                CheckOutcome::Allow => Ok(()),
                CheckOutcome::Deny(message) => Err(AuthError::access_denied(message)),
                CheckOutcome::Fail(message) => Err(AuthError::internal(anyhow::anyhow!(message))),
            }
        })
    }
}

pub struct StubDirectory {
    user: Option<UserRecord>,
    lookups: AtomicUsize,
}

impl StubDirectory {
    pub fn returning(user: Option<UserRecord>) -> Self {
        Self { user, lookups: AtomicUsize::new(0) }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl UserDirectory for StubDirectory {
    fn find_by_email<'a>(
        &'a self,
        _email: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRecord>, AuthError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(self.user.clone()) })
    }
}

pub struct StubVerifier {
    accepts: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubVerifier {
    pub fn accepting(accepts: bool) -> Self {
        Self { accepts, calls: Mutex::default() }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CredentialVerifier for StubVerifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        self.calls.lock().expect("calls lock").push((plaintext.to_owned(), hash.to_owned()));
        self.accepts
    }
}

pub struct StubMemberships {
    is_member: bool,
    exists_calls: AtomicUsize,
    added: Mutex<Vec<(Uuid, Uuid)>>,
}

impl StubMemberships {
    pub fn member(is_member: bool) -> Self {
        Self { is_member, exists_calls: AtomicUsize::new(0), added: Mutex::default() }
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn added(&self) -> Vec<(Uuid, Uuid)> {
        self.added.lock().expect("added lock").clone()
    }
}

impl MembershipStore for StubMemberships {
    fn exists(&self, _user_id: Uuid, _workspace_id: Uuid) -> BoxFuture<'_, Result<bool, AuthError>> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        let is_member = self.is_member;
        Box::pin(async move { Ok(is_member) })
    }

    fn add(&self, user_id: Uuid, workspace_id: Uuid) -> BoxFuture<'_, Result<(), AuthError>> {
        self.added.lock().expect("added lock").push((user_id, workspace_id));
        Box::pin(async { Ok(()) })
    }
}

pub struct StubInvitations {
    pending: Option<Invitation>,
    valid: bool,
    lookups: AtomicUsize,
    validations: AtomicUsize,
}

impl StubInvitations {
    pub fn none() -> Self {
        Self::with(None, true)
    }

    pub fn with(pending: Option<Invitation>, valid: bool) -> Self {
        Self { pending, valid, lookups: AtomicUsize::new(0), validations: AtomicUsize::new(0) }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn validations(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }
}

impl WorkspaceInvitationGateway for StubInvitations {
    fn get_pending<'a>(
        &'a self,
        _email: &'a str,
        _workspace_id: Uuid,
    ) -> BoxFuture<'a, Result<Option<Invitation>, AuthError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(self.pending.clone()) })
    }

    fn validate<'a>(&'a self, _invitation: &'a Invitation) -> BoxFuture<'a, Result<(), AuthError>> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        let valid = self.valid;
        Box::pin(async move {
            if valid {
                Ok(())
            } else {
                Err(AuthError::invitation_invalid("invitation has expired"))
            }
        })
    }
}
