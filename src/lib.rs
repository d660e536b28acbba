pub mod application;
pub mod commands;
pub mod config;
pub mod mcp;
pub mod package;
pub mod pkgmgr;
pub mod runtime;
