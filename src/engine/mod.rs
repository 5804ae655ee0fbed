//! Replication engine: sessions, proposals and the guarded apply step.
//!
//! Session phases: `created → scanning → analyzing → (proposing) → reporting`.
//! Apply stages: `staged → backed-up → written → verified → committed | reverted`.

mod backup;
mod error;
mod locks;
mod replication;
mod session;

pub use backup::backup_path;
pub use error::{ApplyError, ApplyOutcome};
pub use replication::ReplicationEngine;
pub use session::{
    ReplicationSession, RewriteProposal, STATIC_CONFIDENCE, STATIC_PROVIDER, SessionPhase,
};
