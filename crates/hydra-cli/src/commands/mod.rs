//! Command implementations for the CLI.

mod cleanup;
mod config;
mod goals;
mod intake;
mod status;
mod watch;

pub use cleanup::cmd_cleanup;
pub use config::cmd_config;
pub use goals::{cmd_goals_set, cmd_goals_show};
pub use intake::{cmd_add_intake, cmd_reset_intake};
pub use status::cmd_status;
pub use watch::cmd_watch;
