//! # lambda-prune
//!
//! Deletes old versions of a project's AWS Lambda functions. Versions that an
//! alias points to, `$LATEST`, and the N most recently modified others are
//! kept; everything else is deleted, across every stage and region the
//! project deploys to.
//!
//! ## Usage
//!
//! ```bash
//! lambda-prune prune [FUNCTION]... [-s stage] [-r region] [-a] [-n keep] [--dry-run]
//! ```
//!
//! ## Modules
//!
//! - `app` - Process setup: configuration, logging and fatal error reporting
//! - `cli` - Argument parsing and command routing
//! - `config` - Project manifest model and loading
//! - `error` - Error types with numeric codes
//! - `provider` - Lambda provider abstraction, AWS SDK and in-memory implementations
//! - `prune` - Retention policy, throttle retry, bounded scheduling and orchestration
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod prune;
