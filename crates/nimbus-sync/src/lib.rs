//! Reconciliation passes
//!
//! Three idempotent passes that bring a console account in line with
//! a descriptor: sync keypairs, sync backends, associate keys to
//! machines. Remote state is re-fetched at the start of every pass;
//! the console is always the authority for existence. The passes only
//! ever add what is missing; an entity that already exists remotely is
//! left untouched.

pub mod notify;
pub mod reconcile;
pub mod report;

pub use notify::{Notifier, SilentNotifier};
pub use reconcile::{associate_keys, run, sync_backends, sync_keys};
pub use report::{
    AssociationFailure, AssociationReport, BackendSyncReport, KeyAssociationOutcome,
    KeySyncReport, SyncReport,
};
