//! HTTP 服务器与路由
//!
//! 只有一条路由：POST /v1/chat/completions。其余路径和方法一律 404。
//! 每个请求的管线严格串行：鉴权 → 解析模型 → 创建对话 → 编译 prompt
//! → 消费上游流 → 重塑响应。任一阶段失败立即短路返回。

pub mod response;

use crate::config::{DEFAULT_MODEL, GENERIC_ERROR_MESSAGE};
use crate::converter::{build_prompt, resolve_mode_id};
use crate::models::openai::ChatCompletionRequest;
use crate::providers::JuchatsProvider;
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<JuchatsProvider>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            provider: Arc::new(JuchatsProvider::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/chat/completions",
            // 同一路径的其他方法也返回 404，而不是默认的 405
            post(chat_completions).fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Response {
    let Some(jtoken) = bearer_token(&headers) else {
        return response::error_response(StatusCode::UNAUTHORIZED, "Missing authorization header");
    };

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(%err, "请求体解析失败");
            return response::error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE,
            );
        }
    };

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let mode_id = resolve_mode_id(&model);

    let dialog_id = match state.provider.create_dialog(&jtoken, mode_id).await {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(%err, "创建对话失败");
            return response::error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create dialog",
            );
        }
    };

    let prompt = build_prompt(&request.messages);

    let content = match state
        .provider
        .chat_completion(&dialog_id, &prompt, mode_id, &jtoken)
        .await
    {
        Ok(content) => content,
        Err(err) => {
            tracing::error!(%err, "获取上游响应失败");
            return response::error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get ChatGPT response",
            );
        }
    };

    if request.stream {
        response::build_stream_response(&model, content)
    } else {
        response::build_chat_response(&model, &content)
    }
}

/// 从 Authorization 头提取 Bearer token，缺失或为空视为未授权
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
