//! LeadScout MCP Server
//!
//! Model Context Protocol server exposing candidate discovery to AI assistants.

pub mod protocol;
mod server;
pub mod tools;

pub use server::{start_server, McpServer};
pub use tools::ToolContext;
