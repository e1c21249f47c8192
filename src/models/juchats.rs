//! Juchats 上游 API 数据模型
//!
//! 上游的线上格式全部使用 camelCase 字段名。对话和补全请求中的
//! dialogType / type / tools 等字段是上游要求的固定值，不可配置。

use serde::{Deserialize, Serialize};

/// 创建对话请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDialogRequest {
    pub dialog_type: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub dialog_kind: i64,
    pub tts_language_type_id: i64,
    pub tts_type: i64,
    pub mode_id: i64,
    pub context_id: String,
}

impl CreateDialogRequest {
    /// 上游要求的固定对话参数，仅 modeId 随请求变化
    pub fn new(mode_id: i64) -> Self {
        Self {
            dialog_type: 1,
            name: "你是谁".to_string(),
            dialog_kind: 15,
            tts_language_type_id: 0,
            tts_type: 0,
            mode_id,
            context_id: String::new(),
        }
    }
}

/// 上游响应包络。code == 200 时 data 携带 dialog ID
#[derive(Debug, Clone, Deserialize)]
pub struct DialogEnvelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// 流式补全请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub prompt: String,
    pub request_id: String,
    pub mode_id: i64,
    pub context_id: String,
    pub dialog_id: String,
    pub language_type_id: i64,
    pub file_uuid: String,
    pub tools: Vec<UpstreamTool>,
    pub deep_thinking: bool,
}

/// 上游工具声明（固定列表，随补全请求原样发送）
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamTool {
    pub name: &'static str,
    pub id: &'static str,
}

/// 上游要求的固定工具列表
pub fn default_tools() -> Vec<UpstreamTool> {
    vec![
        UpstreamTool { name: "DALL·E3", id: "DALL_E3" },
        UpstreamTool { name: "Mermaid", id: "MERMAID" },
        UpstreamTool { name: "Browsing", id: "BROWSING" },
        UpstreamTool { name: "Code Interprer", id: "CODE_INTERPRER" },
        UpstreamTool { name: "Advanced analysis", id: "ADVANCED_ANALYSIS" },
        UpstreamTool { name: "𝕏", id: "X" },
    ]
}

/// 上游事件流中的单个帧
#[derive(Debug, Clone, Deserialize)]
pub struct EventFrame {
    #[serde(default)]
    pub data: Option<FrameData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub content: Option<String>,
}

/// 嵌入在内容中的标记载荷（HERMSTDUIO{...}）
///
/// searchResult 字段本身是 JSON 编码的 [{title, link}] 数组字符串。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPayload {
    #[serde(default)]
    pub search_result: Option<String>,
}

/// 搜索结果链接
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchLink {
    pub title: String,
    pub link: String,
}
