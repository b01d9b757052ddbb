use std::sync::Arc;

use async_trait::async_trait;
use auth::RequestIdentity;

use crate::tag::models::Tag;
use crate::tag::models::TagName;
use crate::tag::ports::TagRepository;
use crate::task::errors::TaskError;
use crate::task::models::CreateTaskCommand;
use crate::task::models::NewTask;
use crate::task::models::TaskDetails;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::UpdateTaskCommand;
use crate::task::models::UserId;
use crate::task::ports::TaskRepository;
use crate::task::ports::TaskServicePort;

/// Domain service implementation for task and tag operations.
///
/// Concrete implementation of TaskServicePort with dependency injection.
pub struct TaskService<TR, GR>
where
    TR: TaskRepository,
    GR: TagRepository,
{
    tasks: Arc<TR>,
    tags: Arc<GR>,
}

impl<TR, GR> TaskService<TR, GR>
where
    TR: TaskRepository,
    GR: TagRepository,
{
    /// Create a new task service with injected dependencies.
    ///
    /// # Arguments
    /// * `tasks` - Task persistence implementation
    /// * `tags` - Tag persistence implementation
    pub fn new(tasks: Arc<TR>, tags: Arc<GR>) -> Self {
        Self { tasks, tags }
    }

    async fn attach_tags(&self, task_id: TaskId, names: &[TagName]) {
        for name in names {
            let tag = match self.tags.find_or_create(name).await {
                Ok(tag) => tag,
                Err(e) => {
                    tracing::warn!(task_id = %task_id, tag = %name, error = %e, "Skipping tag");
                    continue;
                }
            };

            if let Err(e) = self.tasks.attach_tag(task_id, tag.id).await {
                tracing::warn!(task_id = %task_id, tag = %name, error = %e, "Skipping tag");
            }
        }
    }

    // The task itself is already stored at this point.
    async fn tags_after_write(&self, task_id: TaskId) -> Vec<Tag> {
        self.tags.find_by_task(task_id).await.unwrap_or_else(|e| {
            tracing::error!(task_id = %task_id, error = %e, "Failed to load tags after write");
            Vec::new()
        })
    }
}

#[async_trait]
impl<TR, GR> TaskServicePort for TaskService<TR, GR>
where
    TR: TaskRepository,
    GR: TagRepository,
{
    async fn list_tasks(
        &self,
        identity: &RequestIdentity,
        filter: TaskFilter,
    ) -> Result<Vec<TaskDetails>, TaskError> {
        let owner = UserId::try_from(identity)?;
        let tasks = self.tasks.find_by_owner(owner, &filter).await?;

        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            let tags = self.tags.find_by_task(task.id).await?;
            details.push(TaskDetails { task, tags });
        }

        Ok(details)
    }

    async fn get_task(
        &self,
        identity: &RequestIdentity,
        id: TaskId,
    ) -> Result<TaskDetails, TaskError> {
        let owner = UserId::try_from(identity)?;
        let task = self
            .tasks
            .find_by_id(id, owner)
            .await?
            .ok_or(TaskError::NotFound(id.to_string()))?;
        let tags = self.tags.find_by_task(task.id).await?;

        Ok(TaskDetails { task, tags })
    }

    async fn create_task(
        &self,
        identity: &RequestIdentity,
        command: CreateTaskCommand,
    ) -> Result<TaskDetails, TaskError> {
        let owner = UserId::try_from(identity)?;
        let task = self
            .tasks
            .create(NewTask {
                title: command.title,
                description: command.description,
                status: command.status,
                priority: command.priority,
                due_date: command.due_date,
                user_id: owner,
            })
            .await?;

        tracing::debug!(task_id = %task.id, user_id = %owner, "Task created");

        self.attach_tags(task.id, &command.tags).await;
        let tags = self.tags_after_write(task.id).await;

        Ok(TaskDetails { task, tags })
    }

    async fn update_task(
        &self,
        identity: &RequestIdentity,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<TaskDetails, TaskError> {
        let owner = UserId::try_from(identity)?;
        let mut task = self
            .tasks
            .find_by_id(id, owner)
            .await?
            .ok_or(TaskError::NotFound(id.to_string()))?;

        command.apply_to(&mut task);
        let task = self.tasks.update(task).await?;

        if let Some(names) = &command.tags {
            self.tasks.detach_all_tags(task.id).await?;
            self.attach_tags(task.id, names).await;
        }
        let tags = self.tags_after_write(task.id).await;

        Ok(TaskDetails { task, tags })
    }

    async fn delete_task(&self, identity: &RequestIdentity, id: TaskId) -> Result<(), TaskError> {
        let owner = UserId::try_from(identity)?;

        if self.tasks.delete(id, owner).await? {
            tracing::debug!(task_id = %id, user_id = %owner, "Task deleted");
            Ok(())
        } else {
            Err(TaskError::NotFound(id.to_string()))
        }
    }

    async fn list_tags(&self, identity: &RequestIdentity) -> Result<Vec<Tag>, TaskError> {
        let owner = UserId::try_from(identity)?;
        self.tags.find_by_owner(owner).await
    }
}
