mod args;
mod commands;

pub use args::{Cli, Commands, LayoutArg};
pub use commands::{init_logging, load_config, run};
