pub mod gateway;
pub mod render;
pub mod submission;
