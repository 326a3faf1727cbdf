//! Invitation tokens and the rules deciding whether an invitation is usable.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use gatehouse_common::types::Invitation;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

pub const DEFAULT_INVITE_EXPIRY_HOURS: u32 = 72;
const INVITE_TOKEN_BYTES: usize = 16;

/// Returns the one-time token handed to the invitee and the hash to store.
pub fn generate_invite_token() -> (String, Vec<u8>) {
    let mut bytes = [0_u8; INVITE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let hash = hash_invite_token(&token);
    (token, hash)
}

pub fn hash_invite_token(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

pub fn validate_invitation(invitation: &Invitation, now: DateTime<Utc>) -> Result<(), AuthError> {
    if invitation.is_expired_at(now) {
        return Err(AuthError::invitation_invalid("invitation has expired"));
    }

    Ok(())
}
