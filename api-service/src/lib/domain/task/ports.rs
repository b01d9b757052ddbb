use async_trait::async_trait;
use auth::RequestIdentity;

use crate::tag::models::Tag;
use crate::tag::models::TagId;
use crate::task::errors::TaskError;
use crate::task::models::CreateTaskCommand;
use crate::task::models::NewTask;
use crate::task::models::Task;
use crate::task::models::TaskDetails;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::UpdateTaskCommand;
use crate::task::models::UserId;

/// Port for task domain service operations.
///
/// Every operation acts on behalf of a verified caller and only ever sees
/// that caller's tasks.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// List the caller's tasks matching `filter`, each with its tags.
    ///
    /// # Errors
    /// * `InvalidOwner` - Identity user id cannot be stored
    /// * `DatabaseError` - Database operation failed
    async fn list_tasks(
        &self,
        identity: &RequestIdentity,
        filter: TaskFilter,
    ) -> Result<Vec<TaskDetails>, TaskError>;

    /// Retrieve one of the caller's tasks.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this caller
    /// * `DatabaseError` - Database operation failed
    async fn get_task(
        &self,
        identity: &RequestIdentity,
        id: TaskId,
    ) -> Result<TaskDetails, TaskError>;

    /// Create a task owned by the caller.
    ///
    /// Tags that cannot be created or attached are skipped.
    ///
    /// # Errors
    /// * `DatabaseError` - Task could not be stored
    async fn create_task(
        &self,
        identity: &RequestIdentity,
        command: CreateTaskCommand,
    ) -> Result<TaskDetails, TaskError>;

    /// Change one of the caller's tasks.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this caller
    /// * `DatabaseError` - Database operation failed
    async fn update_task(
        &self,
        identity: &RequestIdentity,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<TaskDetails, TaskError>;

    /// Delete one of the caller's tasks.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this caller
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, identity: &RequestIdentity, id: TaskId) -> Result<(), TaskError>;

    /// Tags used on any of the caller's tasks.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_tags(&self, identity: &RequestIdentity) -> Result<Vec<Tag>, TaskError>;
}

/// Persistence operations for tasks.
///
/// Lookups, updates and deletes are scoped to the owner; a task belonging to
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn find_by_owner(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, TaskError>;

    async fn find_by_id(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError>;

    async fn create(&self, task: NewTask) -> Result<Task, TaskError>;

    /// Persist changed fields of `task`, matched on `(id, user_id)`.
    ///
    /// # Errors
    /// * `NotFound` - No row matched
    async fn update(&self, task: Task) -> Result<Task, TaskError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: TaskId, owner: UserId) -> Result<bool, TaskError>;

    /// Attaching an already attached tag is a no-op.
    async fn attach_tag(&self, task_id: TaskId, tag_id: TagId) -> Result<(), TaskError>;

    async fn detach_all_tags(&self, task_id: TaskId) -> Result<(), TaskError>;
}
