//! Utilities shared by the Minichat packages.

pub mod logger;
pub mod time;
