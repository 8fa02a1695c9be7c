pub mod csv;
pub mod error;
