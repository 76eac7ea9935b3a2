pub mod config;
pub mod error;
pub mod http_session;
pub mod ranking_source;
pub mod session;
