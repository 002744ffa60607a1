pub mod routing;
pub mod types;
