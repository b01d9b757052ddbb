pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::tag;
pub use domain::task;
pub use outbound::repositories;
