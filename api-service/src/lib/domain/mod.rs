pub mod tag;
pub mod task;
