pub mod cache;
pub mod common;
pub mod content;
pub mod health;
