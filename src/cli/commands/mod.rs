//! Command implementations

pub mod entities;
pub mod init;
pub mod lookup;
pub mod run;
