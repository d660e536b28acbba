//! Command layer: one function per CLI subcommand. These parse nothing and
//! decide little; they wire the runtime into a use case and print the result.

mod export;
mod import;
mod init;
mod list;
pub mod mcp;
mod progress;

pub use export::export;
pub use import::import;
pub use init::init;
pub use list::list;
pub use progress::{ProgressPrinter, summary};
