pub mod todo;

pub use todo::*;
use utoipa::OpenApi;

/// Gathers the OpenAPI schemas and reusable responses defined by DTOs in this module
/// so [crate::api::swagger_main] can merge them into the served documentation
#[derive(OpenApi)]
#[openapi(components(
    schemas(
        todo::TodoItem,
        todo::NewTodo,
        todo::UpdateTodoStatus,
        todo::DeleteConfirmation,
    ),
    responses(
        err_resps::BasicError400,
        err_resps::BasicError404,
        err_resps::BasicError500,
    )
))]
pub struct OpenApiSchemas;

/// Reusable OpenAPI documentation for the API's error responses
pub mod err_resps {
    use crate::routing_utils::BasicErrorResponse;
    use utoipa::ToResponse;

    #[derive(ToResponse)]
    #[response(
        description = "Client-supplied input failed validation (400)",
        example = json!({"error": "Title is required"})
    )]
    #[allow(dead_code)]
    pub struct BasicError400(BasicErrorResponse);

    #[derive(ToResponse)]
    #[response(
        description = "The addressed todo does not exist (404)",
        example = json!({"error": "Todo not found"})
    )]
    #[allow(dead_code)]
    pub struct BasicError404(BasicErrorResponse);

    #[derive(ToResponse)]
    #[response(
        description = "Something unexpected went wrong inside the server (500)",
        example = json!({"error": "Failed to fetch todos"})
    )]
    #[allow(dead_code)]
    pub struct BasicError500(BasicErrorResponse);
}
