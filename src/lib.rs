pub mod actions;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod process;
pub mod reader;
pub mod server;
