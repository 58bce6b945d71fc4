pub mod payload;
pub mod prediction;
pub mod property;
pub mod theme;
