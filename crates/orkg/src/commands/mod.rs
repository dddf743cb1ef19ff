//! Command implementations that work below the CLI layer.

pub mod init;
