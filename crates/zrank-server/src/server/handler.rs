//! HTTP routes over one [`Leaderboard`].
//!
//! | Method   | Path                 | Body / query              | Response                  |
//! |----------|----------------------|---------------------------|---------------------------|
//! | `POST`   | `/scores/{id}`       | `{"delta": u64}`          | `{"id","value","score"}`  |
//! | `GET`    | `/ranking`           | `?top=N&order=desc\|asc`  | `[{"id","value"}]`        |
//! | `DELETE` | `/ranking`           |                           | `204`                     |
//! | `GET`    | `/users/{id}/rank`   | `?order=desc\|asc`        | `{"id","rank"}`           |
//! | `GET`    | `/users/{id}/value`  |                           | `{"id","value"}`          |
//! | `GET`    | `/count`             |                           | `{"count"}`               |
//!
//! `top` defaults to `0` (every entry) and `order` to `desc`. An entity that
//! has never been updated has rank `-1` and value `0`.

use crate::server::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zrank::{Leaderboard, Order, OrderedStore, RankEntry, TimeSource};

pub struct AppState<S, T> {
    board: Arc<Leaderboard<S, T>>,
}

impl<S, T> Clone for AppState<S, T> {
    fn clone(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub delta: u64,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub id: i64,
    pub value: u64,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    /// How many entries to return; zero or less returns every entry.
    #[serde(default)]
    pub top: i64,
    #[serde(default)]
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub id: i64,
    pub rank: i64,
}

#[derive(Debug, Serialize)]
pub struct ValueResponse {
    pub id: i64,
    pub value: u64,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Builds the service's routes around a shared leaderboard.
pub fn router<S, T>(board: Arc<Leaderboard<S, T>>) -> Router
where
    S: OrderedStore + Send + Sync + 'static,
    T: TimeSource + Send + Sync + 'static,
{
    Router::new()
        .route("/scores/{id}", post(update_score::<S, T>))
        .route(
            "/ranking",
            get(ranking_list::<S, T>).delete(clear::<S, T>),
        )
        .route("/users/{id}/rank", get(user_rank::<S, T>))
        .route("/users/{id}/value", get(user_value::<S, T>))
        .route("/count", get(total_count::<S, T>))
        .with_state(AppState { board })
}

async fn update_score<S, T>(
    State(state): State<AppState<S, T>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    let score = state.board.update(id, body.delta).await?;
    let value = state.board.decode(score)?;
    Ok(Json(UpdateResponse { id, value, score }))
}

async fn ranking_list<S, T>(
    State(state): State<AppState<S, T>>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RankEntry>>, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    let top = usize::try_from(query.top).unwrap_or(0);
    let entries = state.board.ranking_list(top, query.order).await?;
    Ok(Json(entries))
}

async fn user_rank<S, T>(
    State(state): State<AppState<S, T>>,
    Path(id): Path<i64>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<RankResponse>, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    let rank = state.board.user_rank(id, query.order).await?;
    Ok(Json(RankResponse {
        id,
        rank: rank.to_raw(),
    }))
}

async fn user_value<S, T>(
    State(state): State<AppState<S, T>>,
    Path(id): Path<i64>,
) -> Result<Json<ValueResponse>, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    let value = state.board.user_value(id).await?;
    Ok(Json(ValueResponse { id, value }))
}

async fn total_count<S, T>(
    State(state): State<AppState<S, T>>,
) -> Result<Json<CountResponse>, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    let count = state.board.total_count().await?;
    Ok(Json(CountResponse { count }))
}

async fn clear<S, T>(State(state): State<AppState<S, T>>) -> Result<StatusCode, ApiError>
where
    S: OrderedStore,
    T: TimeSource,
{
    state.board.clear().await?;

    #[cfg(feature = "tracing")]
    tracing::info!(key = state.board.key(), "leaderboard cleared");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response},
    };
    use core::time::Duration;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use zrank::MemoryStore;

    const END: i64 = 1_669_823_999;

    struct FixedTime;

    impl TimeSource for FixedTime {
        fn current_secs(&self) -> i64 {
            END - 2_013_085
        }
    }

    fn app() -> Router {
        let board = Leaderboard::with_clock(
            MemoryStore::new(),
            "zrank:test",
            1_667_232_000,
            END,
            Duration::from_secs(3600),
            FixedTime,
        )
        .unwrap();
        router(Arc::new(board))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn update_then_query() {
        let app = app();

        let response = send(&app, "POST", "/scores/1", Some(json!({ "delta": 100 }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "id": 1, "value": 100, "score": 100.2013085 })
        );
        send(&app, "POST", "/scores/2", Some(json!({ "delta": 200 }))).await;

        let response = send(&app, "GET", "/ranking?top=1", None).await;
        assert_eq!(json_body(response).await, json!([{ "id": 2, "value": 200 }]));

        let response = send(&app, "GET", "/ranking?order=asc", None).await;
        assert_eq!(
            json_body(response).await,
            json!([{ "id": 1, "value": 100 }, { "id": 2, "value": 200 }])
        );

        let response = send(&app, "GET", "/users/1/rank", None).await;
        assert_eq!(json_body(response).await, json!({ "id": 1, "rank": 1 }));

        let response = send(&app, "GET", "/users/1/value", None).await;
        assert_eq!(json_body(response).await, json!({ "id": 1, "value": 100 }));

        let response = send(&app, "GET", "/count", None).await;
        assert_eq!(json_body(response).await, json!({ "count": 2 }));
    }

    #[tokio::test]
    async fn absent_entities() {
        let app = app();

        let response = send(&app, "GET", "/users/9/rank?order=asc", None).await;
        assert_eq!(json_body(response).await, json!({ "id": 9, "rank": -1 }));

        let response = send(&app, "GET", "/users/9/value", None).await;
        assert_eq!(json_body(response).await, json!({ "id": 9, "value": 0 }));
    }

    #[tokio::test]
    async fn overflow_is_unprocessable() {
        let app = app();

        let response = send(
            &app,
            "POST",
            "/scores/1",
            Some(json!({ "delta": 100_000_000u64 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["code"], "value_overflow");

        let response = send(&app, "GET", "/count", None).await;
        assert_eq!(json_body(response).await, json!({ "count": 0 }));
    }

    #[tokio::test]
    async fn non_positive_top_returns_everything() {
        let app = app();
        send(&app, "POST", "/scores/1", Some(json!({ "delta": 100 }))).await;
        send(&app, "POST", "/scores/2", Some(json!({ "delta": 200 }))).await;

        let everything = json!([{ "id": 2, "value": 200 }, { "id": 1, "value": 100 }]);
        for uri in ["/ranking?top=-1", "/ranking?top=0", "/ranking"] {
            let response = send(&app, "GET", uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(json_body(response).await, everything, "{uri}");
        }
    }

    #[tokio::test]
    async fn bad_input_is_rejected() {
        let app = app();

        let response = send(&app, "POST", "/scores/abc", Some(json!({ "delta": 1 }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "GET", "/ranking?order=sideways", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn clear_empties_the_board() {
        let app = app();
        send(&app, "POST", "/scores/1", Some(json!({ "delta": 5 }))).await;

        let response = send(&app, "DELETE", "/ranking", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/ranking", None).await;
        assert_eq!(json_body(response).await, json!([]));
    }
}
