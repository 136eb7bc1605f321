use crate::domain::todo::driving_ports::{CreateTodoError, UpdateStatusError};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    GenericErrorResponse, Json, NotFoundErrorResponse, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, post, put};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

/// Defines the OpenAPI documentation for the todo API
#[derive(OpenApi)]
#[openapi(paths(list_todos, create_todo, update_todo_status, delete_todo))]
pub struct TodosApi;

/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Builds the router for the four CRUD routes, meant to be nested under "/todos".
/// The closures wire concrete adapters into handler functions which are themselves
/// generic over the ports so they can be tested without a database.
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = persistence::db_todo_driven_ports::DbTodoReader {};

                list_todos(&mut ext_cxn, &todo_service, &todo_reader).await
            }),
        )
        .route(
            "/",
            post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
        .route(
            "/:todo_id",
            put(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(update): Json<dto::UpdateTodoStatus>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    update_todo_status(&todo_id, update, &mut ext_cxn, &todo_service, &todo_writer)
                        .await
                },
            ),
        )
        .route(
            "/:todo_id",
            delete(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    delete_todo(&todo_id, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
}

/// Lists every stored todo, newest first
#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "The full todo list", body = Vec<dto::TodoItem>),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
    todo_reader: &impl domain::todo::driven_ports::TodoReader,
) -> Result<Json<Vec<dto::TodoItem>>, ErrorResponse> {
    info!("Fetching all todos");
    let todos = todo_service
        .all_todos(&mut *ext_cxn, todo_reader)
        .await
        .map_err(|err| GenericErrorResponse::new("Failed to fetch todos", err))?;

    Ok(Json(todos.into_iter().map(dto::TodoItem::from).collect()))
}

/// Creates a todo. The title is required and stored trimmed; a blank description is
/// dropped rather than stored as an empty string. New todos always start out pending.
#[utoipa::path(
    post,
    path = "/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "The created todo", body = dto::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
    todo_writer: &impl domain::todo::driven_ports::TodoWriter,
) -> Result<(StatusCode, Json<dto::TodoItem>), ErrorResponse> {
    info!("Creating a new todo");
    let domain_new_todo = domain::todo::NewTodo::from(new_todo);

    let create_result = todo_service
        .create_todo(&domain_new_todo, &mut *ext_cxn, todo_writer)
        .await;
    match create_result {
        Ok(created_todo) => Ok((StatusCode::CREATED, Json(dto::TodoItem::from(created_todo)))),
        Err(validation_err @ CreateTodoError::TitleRequired) => {
            Err(ValidationErrorResponse(validation_err.to_string()).into())
        }
        Err(CreateTodoError::PortError(cause)) => {
            Err(GenericErrorResponse::new("Failed to create todo", cause).into())
        }
    }
}

/// Changes the completion status of a todo. Only the status and update timestamp
/// ever change on this path.
#[utoipa::path(
    put,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(
        ("todo_id" = String, Path, description = "ID of the todo to update"),
    ),
    request_body = dto::UpdateTodoStatus,
    responses(
        (status = 200, description = "The updated todo", body = dto::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 404, response = dto::err_resps::BasicError404),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn update_todo_status(
    todo_id: &str,
    update: dto::UpdateTodoStatus,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
    todo_writer: &impl domain::todo::driven_ports::TodoWriter,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Updating status of todo {todo_id}");

    let update_result = todo_service
        .update_todo_status(todo_id, &update.status, &mut *ext_cxn, todo_writer)
        .await;
    match update_result {
        Ok(updated_todo) => Ok(Json(dto::TodoItem::from(updated_todo))),
        Err(validation_err @ UpdateStatusError::BadStatus(_)) => {
            Err(ValidationErrorResponse(validation_err.to_string()).into())
        }
        Err(UpdateStatusError::NotFound) => Err(NotFoundErrorResponse.into()),
        Err(UpdateStatusError::PortError(cause)) => {
            Err(GenericErrorResponse::new("Failed to update todo", cause).into())
        }
    }
}

/// Deletes a todo. Deleting an ID that doesn't exist still reports success, so the
/// operation can be retried safely.
#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(
        ("todo_id" = String, Path, description = "ID of the todo to delete"),
    ),
    responses(
        (status = 200, description = "Confirmation of the delete", body = dto::DeleteConfirmation),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn delete_todo(
    todo_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
    todo_writer: &impl domain::todo::driven_ports::TodoWriter,
) -> Result<Json<dto::DeleteConfirmation>, ErrorResponse> {
    info!("Deleting todo {todo_id}");

    let delete_result = todo_service
        .delete_todo(todo_id, &mut *ext_cxn, todo_writer)
        .await;
    match delete_result {
        Ok(()) => Ok(Json(dto::DeleteConfirmation {
            message: "Todo deleted successfully".to_owned(),
        })),
        Err(cause) => Err(GenericErrorResponse::new("Failed to delete todo", cause).into()),
    }
}
