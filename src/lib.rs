//! ju2api - 将 Juchats 上游 API 适配为 OpenAI 兼容接口的代理服务
//!
//! 请求管线：解析模型 → 创建对话 → 编译 prompt → 消费上游事件流 → 重塑响应。
//! 每个请求独立走完整管线，不缓存对话，不共享可变状态。

pub mod config;
pub mod converter;
pub mod error;
pub mod models;
pub mod providers;
pub mod server;
