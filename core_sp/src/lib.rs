//! Shortest-path search over square character grids, plus the messages shared
//! with the HTTP service
//!
//! Workspace members (server_sp) depend on this crate for both

pub mod constants;
pub mod grid;
pub mod messages;
