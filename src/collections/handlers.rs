use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{Clothes, Comment, Donation, GalleryImage, Resource, Testimonial, Volunteer},
    types::{DeleteResult, Document, InsertOneResult, UpdateResult},
};
use crate::{
    error::{AppError, AppJson, AppPath},
    state::AppState,
};

// --- public routers ---

/// Clothes expose the full insert/list/get/upsert/delete set.
pub fn clothes_routes() -> Router<AppState> {
    Router::new()
        .route("/clothes", post(insert_one::<Clothes>).get(find_all::<Clothes>))
        .route(
            "/clothes/:id",
            get(find_one::<Clothes>)
                .put(upsert_one::<Clothes>)
                .delete(delete_one::<Clothes>),
        )
}

/// Remaining resources are insert + list only.
pub fn insert_list_routes() -> Router<AppState> {
    Router::new()
        .merge(insert_and_list::<Donation>("/donation"))
        .merge(insert_and_list::<Testimonial>("/donor"))
        .merge(insert_and_list::<GalleryImage>("/gallery"))
        .merge(insert_and_list::<Comment>("/comments"))
        .merge(insert_and_list::<Volunteer>("/volunteer"))
}

fn insert_and_list<R: Resource>(path: &str) -> Router<AppState> {
    Router::new().route(path, post(insert_one::<R>).get(find_all::<R>))
}

// --- handlers ---

#[instrument(skip_all, fields(collection = %R::COLLECTION))]
pub async fn insert_one<R: Resource>(
    State(state): State<AppState>,
    AppJson(payload): AppJson<R>,
) -> Result<Json<InsertOneResult>, AppError> {
    let fields = payload.into_fields()?;
    let id = state.documents.insert(R::COLLECTION, fields).await?;
    info!(%id, "document created");
    Ok(Json(InsertOneResult::new(id)))
}

#[instrument(skip_all, fields(collection = %R::COLLECTION))]
pub async fn find_all<R: Resource>(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let docs = state.documents.find_all(R::COLLECTION).await?;
    Ok(Json(docs))
}

/// Absent records yield `null`, not 404.
#[instrument(skip(state), fields(collection = %R::COLLECTION))]
pub async fn find_one<R: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Option<Document>>, AppError> {
    let doc = state.documents.find_by_id(R::COLLECTION, id).await?;
    Ok(Json(doc))
}

#[instrument(skip(state, payload), fields(collection = %R::COLLECTION))]
pub async fn upsert_one<R: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<R>,
) -> Result<Json<UpdateResult>, AppError> {
    let fields = payload.into_fields()?;
    let outcome = state.documents.upsert(R::COLLECTION, id, fields).await?;
    info!(?outcome, "document upserted");
    Ok(Json(UpdateResult::from_outcome(id, outcome)))
}

#[instrument(skip(state), fields(collection = %R::COLLECTION))]
pub async fn delete_one<R: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    let deleted = state.documents.delete(R::COLLECTION, id).await?;
    info!(deleted, "document deleted");
    Ok(Json(DeleteResult::new(deleted)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, Response, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    use crate::{
        app::build_app,
        collections::{
            repo::DocumentStore,
            types::{Collection, Fields, UpsertOutcome},
        },
        state::AppState,
    };

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let res: Response<Body> = build_app(state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn coat(title: &str) -> Value {
        json!({
            "image": "https://img.example/coat.jpg",
            "title": title,
            "category": "outerwear",
            "size": "L",
            "description": "Warm wool coat"
        })
    }

    #[tokio::test]
    async fn insert_then_list_in_storage_order() {
        let state = AppState::fake();

        let (status, first) = send(&state, request("POST", "/api/v1/clothes", Some(coat("A")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["acknowledged"], true);
        send(&state, request("POST", "/api/v1/clothes", Some(coat("B")))).await;

        let (status, list) = send(&state, request("GET", "/api/v1/clothes", None)).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["title"], "A");
        assert_eq!(list[1]["title"], "B");
        assert_eq!(list[0]["_id"], first["insertedId"]);
    }

    #[tokio::test]
    async fn get_by_id_and_missing_is_null() {
        let state = AppState::fake();
        let (_, inserted) = send(&state, request("POST", "/api/v1/clothes", Some(coat("A")))).await;
        let id = inserted["insertedId"].as_str().unwrap();

        let (status, doc) = send(&state, request("GET", &format!("/api/v1/clothes/{id}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["title"], "A");

        let missing = uuid::Uuid::new_v4();
        let (status, doc) =
            send(&state, request("GET", &format!("/api/v1/clothes/{missing}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc, Value::Null);
    }

    #[tokio::test]
    async fn put_upserts_then_updates() {
        let state = AppState::fake();
        let id = uuid::Uuid::new_v4();
        let uri = format!("/api/v1/clothes/{id}");

        let (status, created) = send(&state, request("PUT", &uri, Some(coat("A")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["upsertedCount"], 1);
        assert_eq!(created["upsertedId"], json!(id));
        assert_eq!(created["matchedCount"], 0);

        let (_, updated) = send(&state, request("PUT", &uri, Some(coat("B")))).await;
        assert_eq!(updated["matchedCount"], 1);
        assert_eq!(updated["modifiedCount"], 1);
        assert_eq!(updated["upsertedId"], Value::Null);

        let (_, same) = send(&state, request("PUT", &uri, Some(coat("B")))).await;
        assert_eq!(same["matchedCount"], 1);
        assert_eq!(same["modifiedCount"], 0);

        let (_, doc) = send(&state, request("GET", &uri, None)).await;
        assert_eq!(doc["title"], "B");
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let state = AppState::fake();
        let (_, inserted) = send(&state, request("POST", "/api/v1/clothes", Some(coat("A")))).await;
        let uri = format!("/api/v1/clothes/{}", inserted["insertedId"].as_str().unwrap());

        let (_, first) = send(&state, request("DELETE", &uri, None)).await;
        assert_eq!(first, json!({ "acknowledged": true, "deletedCount": 1 }));
        let (_, again) = send(&state, request("DELETE", &uri, None)).await;
        assert_eq!(again["deletedCount"], 0);
    }

    #[tokio::test]
    async fn rejects_unknown_fields_and_malformed_ids() {
        let state = AppState::fake();
        let mut body = coat("A");
        body["price"] = json!(12);

        let (status, err) = send(&state, request("POST", "/api/v1/clothes", Some(body))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err["success"], false);

        let (_, list) = send(&state, request("GET", "/api/v1/clothes", None)).await;
        assert_eq!(list, json!([]));

        for method in ["GET", "DELETE"] {
            let (status, err) =
                send(&state, request(method, "/api/v1/clothes/not-an-id", None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(err["success"], false, "{method}");
            assert!(!err["message"].as_str().unwrap().is_empty(), "{method}: {err}");
        }
        let (status, err) =
            send(&state, request("PUT", "/api/v1/clothes/not-an-id", Some(coat("A")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["success"], false);
    }

    #[tokio::test]
    async fn insert_list_resources_are_independent() {
        let state = AppState::fake();
        let volunteer = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "phone": "555-0100",
            "location": "Dhaka"
        });
        let comment = json!({ "name": "Bob", "comment": "Thank you!" });

        let (status, _) = send(&state, request("POST", "/api/v1/volunteer", Some(volunteer))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, request("POST", "/api/v1/comments", Some(comment))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, volunteers) = send(&state, request("GET", "/api/v1/volunteer", None)).await;
        let (_, comments) = send(&state, request("GET", "/api/v1/comments", None)).await;
        let (_, gallery) = send(&state, request("GET", "/api/v1/gallery", None)).await;
        assert_eq!(volunteers.as_array().unwrap().len(), 1);
        assert_eq!(comments[0]["comment"], "Thank you!");
        assert_eq!(gallery, json!([]));

        // no per-id routes outside clothes
        let id = uuid::Uuid::new_v4();
        let res = build_app(state.clone())
            .oneshot(request("DELETE", &format!("/api/v1/volunteer/{id}"), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn insert(&self, _c: Collection, _f: Fields) -> anyhow::Result<uuid::Uuid> {
            anyhow::bail!("connection reset")
        }
        async fn find_all(&self, _c: Collection) -> anyhow::Result<Vec<super::Document>> {
            anyhow::bail!("connection reset")
        }
        async fn find_by_id(
            &self,
            _c: Collection,
            _id: uuid::Uuid,
        ) -> anyhow::Result<Option<super::Document>> {
            anyhow::bail!("connection reset")
        }
        async fn upsert(
            &self,
            _c: Collection,
            _id: uuid::Uuid,
            _f: Fields,
        ) -> anyhow::Result<UpsertOutcome> {
            anyhow::bail!("connection reset")
        }
        async fn delete(&self, _c: Collection, _id: uuid::Uuid) -> anyhow::Result<u64> {
            anyhow::bail!("connection reset")
        }
    }

    #[tokio::test]
    async fn store_failure_is_generic_500() {
        let fake = AppState::fake();
        let state = AppState::from_parts(fake.config.clone(), fake.users.clone(), Arc::new(FailingStore));

        let (status, body) = send(&state, request("POST", "/api/v1/donation", Some(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "category": "jackets",
            "title": "Parka"
        })))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "An error occurred" }));

        let (status, _) = send(&state, request("GET", "/api/v1/clothes", None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
