//! CLI command implementations.

pub mod decide;
pub mod init;
pub mod run;
