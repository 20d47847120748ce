pub mod config;
pub mod error;
pub mod logging;

pub mod document;
pub mod download;
pub mod drive;
pub mod queue;
pub mod session;
