//! Lambda version pruning engine
//!
//! A run fans out in three levels:
//!
//! - [`PruneOrchestrator`] validates a [`PruneRequest`] and visits regions one
//!   at a time
//! - [`RegionOrchestrator`] prunes the deployed functions of a region with
//!   bounded concurrency
//! - [`UnitPruner`] lists aliases and versions of one deployed function,
//!   applies the [retention policy](policy::decide) and deletes the rest
//!
//! Every provider call goes through [`ThrottleRetry`], which waits and retries
//! while the provider answers "Too many requests".

pub mod orchestrator;
pub mod policy;
pub mod region;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod unit;

pub use orchestrator::{PruneOrchestrator, PrunePlan, PruneRequest};
pub use policy::{decide, RetentionDecision};
pub use region::RegionOrchestrator;
pub use report::{PruneResult, RegionReport, RunFailure, RunReport, UnitFailure, VersionFailure};
pub use retry::{ThrottleRetry, DEFAULT_THROTTLE_DELAY};
pub use scheduler::{BoundedScheduler, DEFAULT_CONCURRENCY};
pub use unit::{PruneUnit, UnitPruner};
