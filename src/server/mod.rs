pub mod actor;
pub mod end_point;
pub mod input_handler;
pub mod types;
