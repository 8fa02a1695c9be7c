pub mod companies;
pub mod dashboard;
