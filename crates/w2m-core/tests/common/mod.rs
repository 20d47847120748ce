#![allow(dead_code)]

pub mod graph_server;
pub mod mock_drive;
