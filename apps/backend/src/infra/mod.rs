//! Infrastructure: database connection, error translation, state assembly.

pub mod db;
pub mod db_errors;
pub mod state;
