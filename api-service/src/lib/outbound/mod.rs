pub mod health;
pub mod repositories;
