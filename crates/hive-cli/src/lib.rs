// Library interface for hive-cli
// Lets integration tests reach argument parsing and rendering.

pub mod app;
pub mod cli;
pub mod render;

pub use cli::{Cli, Command};
