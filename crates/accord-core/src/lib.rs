pub mod config;
pub mod db;
pub mod extract;
pub mod llm;
pub mod mediator;
pub mod prompt;
pub mod suggest;
pub mod types;

pub use types::*;
