use async_trait::async_trait;

use crate::tag::models::Tag;
use crate::tag::models::TagName;
use crate::task::errors::TaskError;
use crate::task::models::TaskId;
use crate::task::models::UserId;

/// Persistence operations for tags.
#[async_trait]
pub trait TagRepository: Send + Sync + 'static {
    /// Tags attached to one task, ordered by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_task(&self, task_id: TaskId) -> Result<Vec<Tag>, TaskError>;

    /// Distinct tags reachable through the owner's tasks, ordered by name.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Tag>, TaskError>;

    /// Return the tag with this name, creating it first if needed.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_or_create(&self, name: &TagName) -> Result<Tag, TaskError>;
}
