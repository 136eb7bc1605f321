use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::{DateTime, Utc};
use derive_more::Display;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A single tracked task. Once created, only `status` and `updated_at` ever change.
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The completion state of a todo. These are the only two values the system accepts,
/// and they match the strings stored in the database and sent over the API.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum TodoStatus {
    #[display("pending")]
    Pending,
    #[display("completed")]
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

/// Error for status strings outside the accepted set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status. Must be pending or completed")]
pub struct InvalidStatus;

impl FromStr for TodoStatus {
    type Err = InvalidStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidStatus),
        }
    }
}

/// Content for a todo that doesn't exist yet
#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait TodoReader {
        /// Fetches every stored todo, newest first
        async fn all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
    }

    pub trait TodoWriter {
        /// Persists a fully constructed todo
        async fn create(
            &self,
            todo: &TodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        /// Updates the status and update timestamp of the todo with the given ID,
        /// returning the stored record or [None] if no todo has that ID
        async fn set_status(
            &self,
            id: &str,
            status: TodoStatus,
            updated_at: DateTime<Utc>,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;

        /// Removes the todo with the given ID. Removing an ID that doesn't exist is not an error.
        async fn delete(
            &self,
            id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    #[derive(Debug, Error)]
    pub enum CreateTodoError {
        #[error("Title is required")]
        TitleRequired,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    #[derive(Debug, Error)]
    pub enum UpdateStatusError {
        #[error(transparent)]
        BadStatus(#[from] InvalidStatus),
        /// The addressed todo does not exist. An earlier iteration of this API reported
        /// success while touching zero rows, which hid mistyped IDs from clients, so
        /// missing todos are rejected instead.
        #[error("Todo not found")]
        NotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;

        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, CreateTodoError>;

        async fn update_todo_status(
            &self,
            id: &str,
            requested_status: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, UpdateStatusError>;

        async fn delete_todo(
            &self,
            id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), anyhow::Error>;
    }
}

/// Strips surrounding whitespace from a description and collapses blank input to
/// [None] so an empty string is never stored
fn normalized_description(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(desc) if !desc.trim().is_empty() => Some(desc.trim().to_owned()),
        _ => None,
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn all_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl driven_ports::TodoReader,
    ) -> Result<Vec<TodoItem>, anyhow::Error> {
        let todos = todo_read
            .all(&mut *ext_cxn)
            .await
            .context("fetching the todo list")?;

        Ok(todos)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<TodoItem, driving_ports::CreateTodoError> {
        let trimmed_title = new_todo.title.trim();
        if trimmed_title.is_empty() {
            return Err(driving_ports::CreateTodoError::TitleRequired);
        }

        // Both timestamps start equal so created_at <= updated_at holds from the first write
        let now = Utc::now();
        let todo = TodoItem {
            id: Uuid::new_v4().to_string(),
            title: trimmed_title.to_owned(),
            description: normalized_description(new_todo.description.as_deref()),
            status: TodoStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        todo_write
            .create(&todo, &mut *ext_cxn)
            .await
            .context("persisting a new todo")?;

        Ok(todo)
    }

    async fn update_todo_status(
        &self,
        id: &str,
        requested_status: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<TodoItem, driving_ports::UpdateStatusError> {
        let status = TodoStatus::from_str(requested_status)?;

        let updated_todo = todo_write
            .set_status(id, status, Utc::now(), &mut *ext_cxn)
            .await
            .context("updating a todo's status")?;

        updated_todo.ok_or(driving_ports::UpdateStatusError::NotFound)
    }

    async fn delete_todo(
        &self,
        id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<(), anyhow::Error> {
        todo_write
            .delete(id, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;

        Ok(())
    }
}
