use crate::domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a todo returned by the API. Timestamps cross the wire as ISO-8601 strings
/// and field names are camelCased for the browser client.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[schema(example = "0cb4c1d4-3eff-4b71-9bbe-e3ec2f73db14")]
    pub id: String,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "2% if they have it")]
    pub description: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<domain::todo::TodoItem> for TodoItem {
    fn from(value: domain::todo::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            description: value.description,
            status: value.status.to_string(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO for creating a new todo via the API. A request that omits `title` entirely is
/// treated the same as a blank title so the domain's validation message answers both.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodo {
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    #[schema(example = "2% if they have it")]
    pub description: Option<String>,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            title: value.title.unwrap_or_default(),
            description: value.description,
        }
    }
}

/// DTO for changing a todo's completion status via the API. The status arrives as a
/// raw string; the domain decides whether it names a real status.
#[derive(Debug, Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct UpdateTodoStatus {
    #[schema(example = "completed")]
    pub status: String,
}

/// DTO confirming a successful delete
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct DeleteConfirmation {
    #[schema(example = "Todo deleted successfully")]
    pub message: String,
}
