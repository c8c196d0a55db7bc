mod args;

pub use args::{Cli, Command, Format};
