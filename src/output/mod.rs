//! Terminal output and progress reporting.
//!
//! Pipeline code never prints directly; it emits structured events through
//! an injected [`Reporter`], keeping rendering out of the download logic.

pub mod console;
pub mod progress;
pub mod reporter;

pub use console::{print_banner, print_batch_config, print_profile_config, ConsoleReporter};
pub use progress::create_spinner;
pub use reporter::{ProgressEvent, Reporter};
