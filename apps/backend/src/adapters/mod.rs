//! Store implementations.

pub mod memory;
pub mod users_sea;
