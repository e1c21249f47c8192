//! 全局配置常量
//!
//! 上游端点、指纹头部和流式参数都是固定值，进程生命周期内不可变。

/// 服务监听端口
pub const LISTEN_PORT: u16 = 8000;

/// 上游创建对话端点
pub const CREATE_DIALOG_URL: &str = "https://www.juchats.com/gw/chatweb/gpt/createDialog";

/// 上游流式补全端点
pub const COMPLETIONS_URL: &str = "https://www.juchats.com/gw/chatgpt/gpt/completions";

/// 未指定模型时使用的默认模型名
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// 未知模型名回退的 mode ID
pub const DEFAULT_MODE_ID: i64 = 36;

/// 流式响应每个 chunk 的字符数
pub const STREAM_CHUNK_SIZE: usize = 50;

/// 流式 chunk 之间的人工延迟（毫秒）
pub const STREAM_CHUNK_DELAY_MS: u64 = 50;

/// 未预期错误的通用提示
pub const GENERIC_ERROR_MESSAGE: &str =
    "模型请求失败，服务器内部错误，请检查传递信息格式是否正确或稍后重试";
