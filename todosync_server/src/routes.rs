use async_graphql::http::ALL_WEBSOCKET_PROTOCOLS;
use async_graphql::Data;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todosync::entity::task;
use todosync::graphql::{self, TodoSchema};
use todosync::{methods, Accounts, RequestContext, TaskStore};

use crate::error::ApiError;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
    pub accounts: Accounts,
    pub schema: TodoSchema,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self {
            accounts: Accounts::new(store.clone()),
            schema: graphql::build_schema(store.clone()),
            store,
        }
    }

    fn request_context(&self, headers: &HeaderMap) -> RequestContext {
        self.accounts.context_for(bearer_token(headers))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/ws", get(graphql_ws_handler))
        .route("/graphql/schema", get(schema_handler))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            &format!("/methods/{}", methods::SET_IS_CHECKED),
            post(set_is_checked),
        )
        .route(&format!("/methods/{}", methods::REMOVE), post(remove))
        .with_state(state)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
}

/// `Bearer <token>`, with the scheme matched case-insensitively.
fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Token from a `connection_init` payload: `{"token": ".."}` or
/// `{"authorization": "Bearer .."}`.
fn connection_token(payload: &Value) -> Option<&str> {
    payload.get("token").and_then(Value::as_str).or_else(|| {
        payload
            .get("authorization")
            .or_else(|| payload.get("Authorization"))
            .and_then(Value::as_str)
            .and_then(parse_bearer)
    })
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let ctx = state.request_context(&headers);
    state.schema.execute(request.into_inner().data(ctx)).await.into()
}

/// GraphQL subscriptions over WebSocket (`graphql-transport-ws` or the legacy
/// `graphql-ws` protocol). The caller is taken from the `connection_init`
/// payload, falling back to the upgrade request's `Authorization` header.
async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    websocket: WebSocketUpgrade,
) -> Response {
    let header_ctx = state.request_context(&headers);
    websocket
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            let accounts = state.accounts.clone();
            GraphQLWebSocket::new(stream, state.schema.clone(), protocol)
                .on_connection_init(move |payload| async move {
                    let ctx = match connection_token(&payload) {
                        Some(token) => accounts.context_for(Some(token)),
                        None => header_ctx,
                    };
                    let mut data = Data::default();
                    data.insert(ctx);
                    Ok(data)
                })
                .serve()
        })
}

async fn schema_handler() -> String {
    graphql::sdl()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state
        .accounts
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(LoginResponse {
        token: session.token,
        user_id: session.user_id,
    }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.accounts.logout(token);
    }
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIsCheckedRequest {
    pub id: String,
    pub is_checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub is_checked: bool,
    pub user_id: String,
}

impl From<task::Model> for TaskResponse {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            created_at: model.created_at.to_rfc3339(),
            is_checked: model.is_checked,
            user_id: model.user_id,
        }
    }
}

async fn set_is_checked(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SetIsCheckedRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let ctx = state.request_context(&headers);
    let updated =
        methods::set_is_checked(&state.store, &ctx, &request.id, request.is_checked).await?;
    Ok(Json(updated.into()))
}

async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RemoveRequest>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.request_context(&headers);
    methods::remove(&state.store, &ctx, &request.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
