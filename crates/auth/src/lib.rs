// gatehouse-auth: workspace sign-in access resolution and password challenge

pub mod challenge;
pub mod config;
pub mod db;
pub mod error;
pub mod invitation;
pub mod password;
pub mod ports;
pub mod resolver;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod token;

#[cfg(test)]
mod testing;

pub use error::{AuthError, ErrorCode};
pub use resolver::{AccessDecision, AccessResolver};
pub use service::{AuthService, SignInGrant};
