//! Nimbus console client
//!
//! Client for the cloud-management console that owns the account's
//! backends, SSH keys and machines. The reconciler only ever talks to
//! the console through the [`ManagementApi`] trait; [`ConsoleClient`]
//! is the HTTP implementation, authenticated once at login.

pub mod api;
pub mod client;
pub mod error;

pub use api::{
    AssociateKeyRequest, BackendInfo, CreateBackendRequest, KeyInfo, MachineInfo, ManagementApi,
};
pub use client::{ConsoleClient, ConsoleConfig};
pub use error::{CloudError, Result};
