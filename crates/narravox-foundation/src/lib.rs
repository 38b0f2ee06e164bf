//! Foundation types for NarraVox
//!
//! This crate provides the configuration surface consumed by the synthesis
//! pipeline and the credential-provider abstraction used to gate calls to
//! the external speech service.

pub mod config;
pub mod credential;

pub use config::{RetryConfig, StudioConfig};
pub use credential::{CredentialGate, CredentialProvider, CredentialStatus};
