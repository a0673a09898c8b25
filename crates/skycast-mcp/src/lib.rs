//! MCP layer: JSON-RPC protocol types, tool/resource catalog, request
//! dispatch, and the stdio server loop.

pub mod handlers;
pub mod protocol;
pub mod render;
pub mod server;
pub mod tools;

pub use handlers::Handlers;
pub use server::Server;
