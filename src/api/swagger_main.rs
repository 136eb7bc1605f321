use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Todo API",
    description = "A small task-tracking API backed by PostgreSQL"
))]
struct TodoApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI
/// schema. Merges in OpenAPI definitions from other locations in the app, such as the
/// [dto] package and submodules of [api][crate::api]
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = TodoApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo::TodosApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
