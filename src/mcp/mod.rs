//! MCP (Model Context Protocol) server for Newsline.
//!
//! Exposes the news queries as tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio or a single HTTP endpoint.

pub mod protocol;
mod server;
pub mod tools;

pub use server::McpServer;
