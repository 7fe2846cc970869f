//! CLI command modules

pub mod init;
pub mod plan;
pub mod validate;
