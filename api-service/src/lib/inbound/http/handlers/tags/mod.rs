pub mod list_tags;

pub use list_tags::list_tags;
