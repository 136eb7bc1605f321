use crate::api::test_util::deserialize_body;
use crate::integration_test::test_util::prepare_db_and_test;
use crate::persistence::ExternalConnectivity;
use crate::routing_utils::BasicErrorResponse;
use crate::{SharedData, api, dto};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

/// Builds the same router main() serves, minus the middleware and docs routes
fn test_router(db: PgPool) -> Router {
    let shared_data = Arc::new(SharedData {
        ext_cxn: ExternalConnectivity::new(db),
    });

    Router::new()
        .nest("/todos", api::todo::todo_routes())
        .with_state(shared_data)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("could not build request")
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("could not build request")
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn todo_crud_lifecycle() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        // Create
        let create_response = router
            .clone()
            .oneshot(json_request("POST", "/todos", json!({"title": "Buy milk"})))
            .await
            .expect("create request failed");
        assert_eq!(StatusCode::CREATED, create_response.status());
        let created_raw: serde_json::Value = deserialize_body(create_response.into_body()).await;
        // Timestamp fields cross the wire camelCased
        assert!(created_raw.get("createdAt").is_some());
        assert!(created_raw.get("updatedAt").is_some());
        let created: dto::TodoItem =
            serde_json::from_value(created_raw).expect("created todo did not match the wire shape");
        assert_eq!("Buy milk", created.title);
        assert_eq!("pending", created.status);
        assert_eq!(created.created_at, created.updated_at);

        // Complete it
        let update_response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/todos/{}", created.id),
                json!({"status": "completed"}),
            ))
            .await
            .expect("update request failed");
        assert_eq!(StatusCode::OK, update_response.status());
        let updated: dto::TodoItem = deserialize_body(update_response.into_body()).await;
        assert_eq!("completed", updated.status);
        assert_eq!("Buy milk", updated.title);
        assert_eq!(created.created_at, updated.created_at);
        assert!(updated.updated_at >= created.updated_at);

        // Delete it (twice - the second delete is a no-op, not an error)
        for _ in 0..2 {
            let delete_response = router
                .clone()
                .oneshot(bare_request("DELETE", &format!("/todos/{}", created.id)))
                .await
                .expect("delete request failed");
            assert_eq!(StatusCode::OK, delete_response.status());
            let confirmation: dto::DeleteConfirmation =
                deserialize_body(delete_response.into_body()).await;
            assert_eq!("Todo deleted successfully", confirmation.message);
        }

        // It should be gone from the list
        let list_response = router
            .clone()
            .oneshot(bare_request("GET", "/todos"))
            .await
            .expect("list request failed");
        assert_eq!(StatusCode::OK, list_response.status());
        let todos: Vec<dto::TodoItem> = deserialize_body(list_response.into_body()).await;
        assert!(todos.iter().all(|todo| todo.id != created.id));
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn list_returns_todos_newest_first() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        for title in ["First", "Second", "Third"] {
            let create_response = router
                .clone()
                .oneshot(json_request("POST", "/todos", json!({"title": title})))
                .await
                .expect("create request failed");
            assert_eq!(StatusCode::CREATED, create_response.status());
        }

        let list_response = router
            .clone()
            .oneshot(bare_request("GET", "/todos"))
            .await
            .expect("list request failed");
        assert_eq!(StatusCode::OK, list_response.status());
        let todos: Vec<dto::TodoItem> = deserialize_body(list_response.into_body()).await;

        let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(vec!["Third", "Second", "First"], titles);
        assert!(
            todos
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn create_rejects_blank_titles() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        for bad_body in [
            json!({"title": ""}),
            json!({"title": "   "}),
            json!({"description": "a body with no title at all"}),
        ] {
            let create_response = router
                .clone()
                .oneshot(json_request("POST", "/todos", bad_body))
                .await
                .expect("create request failed");
            assert_eq!(StatusCode::BAD_REQUEST, create_response.status());
            let body: BasicErrorResponse = deserialize_body(create_response.into_body()).await;
            assert_eq!("Title is required", body.error);
        }
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn rejects_malformed_request_bodies() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        let create_response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/todos")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("this is not json"))
                    .expect("could not build request"),
            )
            .await
            .expect("create request failed");
        assert_eq!(StatusCode::BAD_REQUEST, create_response.status());
        let body: BasicErrorResponse = deserialize_body(create_response.into_body()).await;
        assert!(
            body.error.starts_with("Malformed request body:"),
            "unexpected error message: {}",
            body.error
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn create_normalizes_descriptions() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        let blank_desc_response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/todos",
                json!({"title": "Water plants", "description": "   "}),
            ))
            .await
            .expect("create request failed");
        assert_eq!(StatusCode::CREATED, blank_desc_response.status());
        let blank_desc_todo: dto::TodoItem =
            deserialize_body(blank_desc_response.into_body()).await;
        assert_eq!(None, blank_desc_todo.description);

        let padded_desc_response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/todos",
                json!({"title": "  Buy milk  ", "description": "  2% if they have it  "}),
            ))
            .await
            .expect("create request failed");
        assert_eq!(StatusCode::CREATED, padded_desc_response.status());
        let padded_desc_todo: dto::TodoItem =
            deserialize_body(padded_desc_response.into_body()).await;
        assert_eq!("Buy milk", padded_desc_todo.title);
        assert_eq!(
            Some("2% if they have it"),
            padded_desc_todo.description.as_deref()
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn update_rejects_statuses_outside_the_enum() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        let create_response = router
            .clone()
            .oneshot(json_request("POST", "/todos", json!({"title": "Buy milk"})))
            .await
            .expect("create request failed");
        let created: dto::TodoItem = deserialize_body(create_response.into_body()).await;

        let update_response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/todos/{}", created.id),
                json!({"status": "done"}),
            ))
            .await
            .expect("update request failed");
        assert_eq!(StatusCode::BAD_REQUEST, update_response.status());
        let body: BasicErrorResponse = deserialize_body(update_response.into_body()).await;
        assert_eq!("Invalid status. Must be pending or completed", body.error);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn update_on_unknown_id_is_a_404() {
    prepare_db_and_test(|db| async move {
        let router = test_router(db);

        let update_response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                "/todos/not-a-real-id",
                json!({"status": "completed"}),
            ))
            .await
            .expect("update request failed");
        assert_eq!(StatusCode::NOT_FOUND, update_response.status());
        let body: BasicErrorResponse = deserialize_body(update_response.into_body()).await;
        assert_eq!("Todo not found", body.error);
    });
}
