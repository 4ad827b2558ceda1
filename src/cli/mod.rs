mod args;
mod ask;

pub use args::{Cli, Commands, ConfigSubcommands};
pub use ask::{StdoutEcho, run_ask};
