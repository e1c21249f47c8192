//! 错误类型定义

use thiserror::Error;

/// 上游调用错误
///
/// 覆盖对话创建和流式补全两个阶段的所有失败情况，不做重试。
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 上游拒绝创建对话（响应码非 200 或缺少 dialog ID）
    #[error("创建对话被拒绝: {0}")]
    DialogRejected(String),

    /// 上游返回非成功 HTTP 状态
    #[error("上游返回错误状态 {status}: {detail}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// 传输层错误（连接失败、响应体不可读等）
    #[error("上游请求失败: {0}")]
    Transport(#[from] reqwest::Error),
}
