//! MCP tool implementations.
//!
//! This module contains all tools exposed by the jobscout MCP server.

pub mod jd_analyze;
pub mod jd_extract;

pub use jd_analyze::JdAnalyzeParams;
pub use jd_extract::JdExtractParams;
