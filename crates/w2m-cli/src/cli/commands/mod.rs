//! CLI command handlers, one file per command.

mod cd;
mod extract;
mod get;
mod ls;
mod me;
mod resolve;
mod update;

pub use cd::{run_cd, run_pwd};
pub use extract::run_extract;
pub use get::run_get;
pub use ls::run_ls;
pub use me::run_me;
pub use resolve::run_resolve;
pub use update::run_update;
