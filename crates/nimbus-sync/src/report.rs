//! Pass reports
//!
//! Every pass returns an explicit report value instead of relying on
//! what was printed along the way, so callers can inspect outcomes the
//! CLI chooses not to surface.

use serde::Serialize;

/// Outcome of the keypair pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeySyncReport {
    /// Keys created this run
    pub created: Vec<String>,
    /// Keys that already existed remotely and were left untouched
    pub found: Vec<String>,
    /// Keys marked as the account default this run
    pub defaulted: Vec<String>,
}

/// Outcome of the backend pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendSyncReport {
    pub created: Vec<String>,
    pub found: Vec<String>,
}

/// Outcome of the association pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssociationReport {
    /// One outcome per key spec that listed machines
    pub outcomes: Vec<KeyAssociationOutcome>,
    /// Key count observed by the final consistency refresh
    pub remote_key_count: usize,
}

/// Per-key-spec association outcome.
///
/// The first failed step abandons the rest of that key's tuples; the
/// failure is recorded here rather than surfaced, so the run keeps
/// going but nothing is lost to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct KeyAssociationOutcome {
    pub key: String,
    /// Machine ids successfully associated, in tuple order
    pub associated: Vec<String>,
    /// The failure that cut this key's block short, if any
    pub abandoned: Option<AssociationFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssociationFailure {
    /// Machine the block failed on, when the tuple got that far
    pub machine_id: Option<String>,
    pub error: String,
}

impl AssociationFailure {
    pub fn new(machine_id: Option<&str>, error: impl ToString) -> Self {
        Self {
            machine_id: machine_id.map(str::to_string),
            error: error.to_string(),
        }
    }
}

/// Combined run report
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub keys: KeySyncReport,
    pub backends: BackendSyncReport,
    pub associations: Vec<KeyAssociationOutcome>,
    /// Key count after the final consistency refresh
    pub remote_key_count: usize,
}
