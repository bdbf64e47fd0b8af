//! Subcommand implementations.

pub mod login;
pub mod logout;
pub mod register;
pub mod settings;
pub mod status;
pub mod todos;
