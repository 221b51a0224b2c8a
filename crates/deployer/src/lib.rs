pub mod arguments;
pub mod artifact;
pub mod config;
pub mod deploy;
mod run;

pub use self::run::{run, start};
