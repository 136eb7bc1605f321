use crate::domain;
use crate::domain::todo::{TodoItem, TodoStatus};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error, anyhow};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(FromRow)]
struct TodoRow {
    id: String,
    title: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for TodoItem {
    type Error = anyhow::Error;

    fn try_from(value: TodoRow) -> Result<Self, Self::Error> {
        let status = TodoStatus::from_str(&value.status)
            .map_err(|_| anyhow!("todo {} has unrecognized status {:?}", value.id, value.status))?;

        Ok(TodoItem {
            id: value.id,
            title: value.title,
            description: value.description,
            status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo_rows: Vec<TodoRow> = sqlx::query_as(
            "SELECT id, title, description, status, created_at, updated_at \
             FROM todos ORDER BY created_at DESC",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch the list of todos")?;

        todo_rows.into_iter().map(TodoItem::try_from).collect()
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create(
        &self,
        todo: &TodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        sqlx::query(
            "INSERT INTO todos (id, title, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(todo.id.as_str())
        .bind(todo.title.as_str())
        .bind(todo.description.as_deref())
        .bind(todo.status.as_str())
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        status: TodoStatus,
        updated_at: DateTime<Utc>,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated_row: Option<TodoRow> = sqlx::query_as(
            "UPDATE todos SET status = $1, updated_at = $2 WHERE id = $3 \
             RETURNING id, title, description, status, created_at, updated_at",
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo's status in the database")?;

        updated_row.map(TodoItem::try_from).transpose()
    }

    async fn delete(&self, id: &str, ext_cxn: &mut impl ExternalConnectivity) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(())
    }
}
