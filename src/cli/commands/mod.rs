//! CLI command implementations.

mod check;
mod inspect;
mod run;

pub use check::cmd_check;
pub use inspect::cmd_inspect;
pub use run::cmd_run;
