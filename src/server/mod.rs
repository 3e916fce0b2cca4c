//! HTTP服务层
//!
//! The host surface: lists tools, drives invocations, validates provider
//! credentials. Messages a tool emitted before failing are returned with the
//! error response / 工具失败前已产出的消息随错误响应一并返回

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cos::CosCredentials;
use crate::payload::FilePayload;
use crate::provider::{self, ValidateRequest};
use crate::tool::{MessageSink, ToolContext, ToolInvocation, ToolMessage, ToolRegistry};

/// Shared application state / 共享应用状态
#[derive(Clone)]
pub struct AppState {
    pub registry: ToolRegistry,
}

/// Invocation response envelope / 调用响应
#[derive(Serialize)]
pub struct InvokeResponse {
    pub code: i32,
    pub message: String,
    pub messages: Vec<ToolMessage>,
}

impl InvokeResponse {
    fn reply(
        code: StatusCode,
        message: impl Into<String>,
        sink: MessageSink,
    ) -> (StatusCode, Json<Self>) {
        (
            code,
            Json(Self {
                code: code.as_u16() as i32,
                message: message.into(),
                messages: sink.into_messages(),
            }),
        )
    }
}

/// Build the application router / 构建应用路由
pub fn router(registry: ToolRegistry) -> Router {
    let state = Arc::new(AppState { registry });
    let body_limit = crate::config::config().get_body_limit();

    Router::new()
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:name/invoke", post(invoke_tool))
        .route("/api/provider/validate", post(validate_provider))
        .route("/api/server/info", get(server_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Value> {
    let infos = state.registry.list_infos().await;
    Json(json!({
        "code": 200,
        "message": "success",
        "data": infos,
    }))
}

async fn server_info() -> Json<Value> {
    Json(json!({
        "code": 200,
        "message": "success",
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "build_time": env!("BUILD_TIME"),
        },
    }))
}

async fn validate_provider(Json(request): Json<ValidateRequest>) -> (StatusCode, Json<Value>) {
    match provider::validate(&request).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"code": 200, "message": "success"})),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": 400, "message": e.to_string()})),
        ),
    }
}

/// Invoke a tool from a multipart request / 以multipart请求调用工具
///
/// Text fields become the parameter bag (credential fields split out);
/// file parts named file/files become blob payloads; text fields under the
/// same names are treated as local path references
/// 文本字段进入参数包，file/files文件部分为blob负载，同名文本字段视作本地路径
async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> (StatusCode, Json<InvokeResponse>) {
    let tool = match state.registry.get(&name).await {
        Some(tool) => tool,
        None => {
            return InvokeResponse::reply(
                StatusCode::NOT_FOUND,
                format!("Tool not found: {}", name),
                MessageSink::new(),
            );
        }
    };

    let mut params = Map::new();
    let mut files: Vec<FilePayload> = Vec::new();
    let mut credentials = CosCredentials::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return InvokeResponse::reply(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid multipart request: {}", e),
                    MessageSink::new(),
                );
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let is_payload_field = field_name == "file" || field_name == "files";
        if is_payload_field && file_name.is_some() {
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => {
                    return InvokeResponse::reply(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read upload part: {}", e),
                        MessageSink::new(),
                    );
                }
            };
            files.push(FilePayload::Blob {
                data,
                name: file_name,
                content_type,
            });
            continue;
        }

        let text = match field.text().await {
            Ok(text) => text,
            Err(e) => {
                return InvokeResponse::reply(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read field {}: {}", field_name, e),
                    MessageSink::new(),
                );
            }
        };

        match field_name.as_str() {
            "region" => credentials.region = text,
            "bucket" => credentials.bucket = text,
            "secret_id" => credentials.secret_id = text,
            "secret_key" => credentials.secret_key = text,
            "file" | "files" => files.push(FilePayload::Local {
                path: PathBuf::from(text),
            }),
            _ => {
                params.insert(field_name, Value::String(text));
            }
        }
    }

    let ctx = ToolContext::new(credentials);
    let invocation = ToolInvocation::with_files(Value::Object(params), files);
    let mut sink = MessageSink::new();

    match tool.invoke(&ctx, invocation, &mut sink).await {
        Ok(()) => InvokeResponse::reply(StatusCode::OK, "success", sink),
        Err(e) => {
            tracing::warn!("Tool invocation failed: {} - {}", name, e);
            InvokeResponse::reply(StatusCode::BAD_REQUEST, e.to_string(), sink)
        }
    }
}
