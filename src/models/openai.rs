//! OpenAI API 数据模型
//!
//! 入站请求和出站响应的 Chat Completion 类型。本服务不做 token 统计，
//! usage 字段恒为零值。

use serde::{Deserialize, Serialize};

/// 单条对话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色: system / user / assistant（顺序由调用方决定，不做校验）
    pub role: String,
    pub content: String,
}

/// Chat Completion 请求
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// 模型名称（缺省时使用默认模型）
    #[serde(default)]
    pub model: Option<String>,

    pub messages: Vec<ChatMessage>,

    /// 是否以 SSE 流式返回（默认 false）
    #[serde(default)]
    pub stream: bool,
}

/// 非流式 Chat Completion 响应
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: String,
    pub index: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Token 使用统计（未实现，恒为零）
#[derive(Debug, Clone, Default, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 流式 Chat Completion 帧
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    /// 内容帧为 null，终止帧为 "stop"
    pub finish_reason: Option<String>,
}

/// 增量内容。终止帧序列化为空对象 {}
#[derive(Debug, Clone, Default, Serialize)]
pub struct Delta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
