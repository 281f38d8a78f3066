//! CLI command handlers

pub mod discover;
pub mod extract;
pub mod mcp;
pub mod parse;
pub mod quota;
