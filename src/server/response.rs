//! OpenAI 兼容响应构建
//!
//! 上游响应在进入本模块前已经完整消费，流式模式是把完整文本人工
//! 切片后模拟的增量输出，与上游真实的 token 节奏无关。

use crate::config::{STREAM_CHUNK_DELAY_MS, STREAM_CHUNK_SIZE};
use crate::models::openai::*;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::convert::Infallible;
use std::time::Duration;
use uuid::Uuid;

/// 构建统一的 JSON 错误响应体 {"error": message}
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// 构建非流式 Chat Completion 响应
pub fn build_chat_response(model: &str, content: &str) -> Response {
    let response = ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4()),
        object: "chat.completion".to_string(),
        created: Utc::now().timestamp(),
        model: model.to_string(),
        choices: vec![Choice {
            message: ResponseMessage {
                role: "assistant".to_string(),
                content: content.to_string(),
            },
            finish_reason: "stop".to_string(),
            index: 0,
        }],
        usage: Usage::default(),
    };
    Json(response).into_response()
}

/// 按字符边界把文本切成固定大小的片段
///
/// 必须按字符而非字节切分，否则多字节字符会被切坏。
pub fn chunk_content(content: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// 构建流式 Chat Completion 响应 (SSE)
///
/// 每个内容帧之间插入固定延迟模拟增量生成，最后发送空 delta 的
/// 终止帧和 [DONE] 哨兵。
pub fn build_stream_response(model: &str, content: String) -> Response {
    let chat_id = format!("chatcmpl-{}", Uuid::new_v4());
    let created = Utc::now().timestamp();
    let model = model.to_string();

    let body_stream = async_stream::stream! {
        for piece in chunk_content(&content, STREAM_CHUNK_SIZE) {
            let chunk = ChatCompletionChunk {
                id: chat_id.clone(),
                object: "chat.completion.chunk".to_string(),
                created,
                model: model.clone(),
                choices: vec![ChunkChoice {
                    index: 0,
                    delta: Delta { content: Some(piece) },
                    finish_reason: None,
                }],
            };
            yield Ok::<_, Infallible>(sse_frame(&chunk));
            tokio::time::sleep(Duration::from_millis(STREAM_CHUNK_DELAY_MS)).await;
        }

        let end_chunk = ChatCompletionChunk {
            id: chat_id.clone(),
            object: "chat.completion.chunk".to_string(),
            created,
            model: model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: Delta::default(),
                finish_reason: Some("stop".to_string()),
            }],
        };
        yield Ok(sse_frame(&end_chunk));
        yield Ok("data: [DONE]\n\n".to_string());
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|err| {
            tracing::error!(%err, "构建 SSE 响应失败");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

fn sse_frame(chunk: &ChatCompletionChunk) -> String {
    format!(
        "data: {}\n\n",
        serde_json::to_string(chunk).unwrap_or_default()
    )
}
