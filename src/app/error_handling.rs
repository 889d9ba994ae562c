//! Error handling at the process boundary

use tracing::error;

/// Print a fatal error and exit with its status code
///
/// A [`PruneError`](crate::error::PruneError) prints its user message, and
/// its developer message with `-v`. Other errors print their chain with `-v`
/// and exit with 1.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    use crate::error::PruneError;

    error!("Fatal error: {}", error);

    let exit_code = if let Some(prune_err) = error.downcast_ref::<PruneError>() {
        eprintln!("{}", prune_err.user_message());

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", prune_err.developer_message());
        }

        prune_err.exit_code()
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    };

    std::process::exit(exit_code)
}
