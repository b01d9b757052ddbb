pub mod tag;
pub mod task;

pub use tag::PostgresTagRepository;
pub use task::PostgresTaskRepository;
