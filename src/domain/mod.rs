pub mod date;
pub mod patch;
pub mod repository;
pub mod request;
pub mod task;
pub mod validation;
