//! Command line interface: argument parsing and command routing

pub mod args;
pub mod router;

pub use args::{Cli, Commands, PruneArgs};
pub use router::{build_request, execute_command};
