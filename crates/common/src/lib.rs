// gatehouse-common: shared types and utilities for the Gatehouse workspace

pub mod email;
pub mod types;
