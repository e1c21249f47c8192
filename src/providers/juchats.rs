//! Juchats Provider
//!
//! 负责两个上游调用：创建对话和流式补全。补全响应是 SSE 事件流，
//! 按帧解析并累积可见文本，其中嵌入的 HERMSTDUIO 标记载荷被替换为
//! Markdown 链接列表。

use crate::config::{COMPLETIONS_URL, CREATE_DIALOG_URL};
use crate::error::ProviderError;
use crate::models::juchats::*;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use uuid::Uuid;

/// 标记载荷的字面标签，后面紧跟一个大括号包围的 JSON 块
const MARKER_TAG: &str = "HERMSTDUIO";

pub struct JuchatsProvider {
    pub client: Client,
    create_dialog_url: String,
    completions_url: String,
}

impl JuchatsProvider {
    pub fn new() -> Self {
        Self::with_endpoints(CREATE_DIALOG_URL, COMPLETIONS_URL)
    }

    /// 使用自定义上游端点（测试伪上游时使用）
    pub fn with_endpoints(create_dialog_url: &str, completions_url: &str) -> Self {
        Self {
            client: Client::new(),
            create_dialog_url: create_dialog_url.to_string(),
            completions_url: completions_url.to_string(),
        }
    }

    /// 上游要求的浏览器指纹头部，jtoken 透传调用方凭证
    fn with_fingerprint_headers(builder: RequestBuilder, jtoken: &str, accept: &str) -> RequestBuilder {
        builder
            .header("accept", accept)
            .header(
                "accept-language",
                "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6",
            )
            .header("jtoken", jtoken)
            .header("priority", "u=1, i")
            .header(
                "sec-ch-ua",
                "\"Not(A:Brand\";v=\"99\", \"Microsoft Edge\";v=\"133\", \"Chromium\";v=\"133\"",
            )
            .header("sec-ch-ua-mobile", "?0")
            .header("sec-ch-ua-platform", "\"Windows\"")
            .header("sec-fetch-dest", "empty")
            .header("sec-fetch-mode", "cors")
            .header("sec-fetch-site", "same-origin")
            .header("Referer", "https://www.juchats.com/chat")
            .header("Referrer-Policy", "strict-origin-when-cross-origin")
    }

    /// 创建一个新的上游对话，返回 dialog ID
    ///
    /// 对话不复用也不显式关闭，生命周期交给上游管理。
    pub async fn create_dialog(&self, jtoken: &str, mode_id: i64) -> Result<String, ProviderError> {
        let body = CreateDialogRequest::new(mode_id);

        let builder = self.client.post(&self.create_dialog_url).json(&body);
        let resp = Self::with_fingerprint_headers(builder, jtoken, "application/json, text/plain, */*")
            .send()
            .await?;

        let envelope: DialogEnvelope = resp.json().await?;
        if envelope.code == 200 {
            match envelope.data {
                Some(serde_json::Value::String(id)) => return Ok(id),
                Some(serde_json::Value::Number(id)) => return Ok(id.to_string()),
                _ => {}
            }
        }

        tracing::error!(code = envelope.code, msg = ?envelope.msg, "创建对话失败");
        Err(ProviderError::DialogRejected(
            envelope
                .msg
                .unwrap_or_else(|| format!("code={}", envelope.code)),
        ))
    }

    /// 发起补全请求并消费整个上游事件流，返回累积的完整文本
    pub async fn chat_completion(
        &self,
        dialog_id: &str,
        prompt: &str,
        mode_id: i64,
        jtoken: &str,
    ) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            prompt: prompt.to_string(),
            request_id: Uuid::new_v4().to_string(),
            mode_id,
            context_id: String::new(),
            dialog_id: dialog_id.to_string(),
            language_type_id: 0,
            file_uuid: String::new(),
            tools: default_tools(),
            deep_thinking: false,
        };

        let builder = self.client.post(&self.completions_url).json(&body);
        let resp = Self::with_fingerprint_headers(builder, jtoken, "text/event-stream")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            tracing::error!(%status, detail, "上游补全请求失败");
            return Err(ProviderError::UpstreamStatus { status, detail });
        }

        let mut stream = resp.bytes_stream();
        let mut frames = FrameBuffer::default();
        let mut accumulated = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            for event in frames.push(&bytes) {
                consume_event(&event, &mut accumulated);
            }
        }
        // 上游关闭连接后缓冲区可能残留最后一个未终结的事件
        if let Some(rest) = frames.finish() {
            consume_event(&rest, &mut accumulated);
        }

        Ok(accumulated)
    }
}

/// SSE 帧缓冲区
///
/// 传输层的读取边界与事件帧边界无关，必须跨读取缓冲，只在 `\n\n`
/// 分隔符处切出完整事件。按字节缓冲，避免把多字节字符切在两次读取之间。
#[derive(Debug, Default)]
struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    /// 追加一段原始字节，返回其中所有完整的事件块
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        // CR 只出现在协议层分隔符中，内容里的回车以 \r 转义存在于 JSON 字符串内
        self.buf.extend(bytes.iter().filter(|&&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(pos) = find_subsequence(&self.buf, b"\n\n") {
            let event: Vec<u8> = self.buf.drain(..pos + 2).collect();
            events.push(String::from_utf8_lossy(&event[..pos]).into_owned());
        }
        events
    }

    /// 流结束时取出剩余未终结的事件数据
    fn finish(self) -> Option<String> {
        if self.buf.iter().all(|b| b.is_ascii_whitespace()) {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buf).into_owned())
        }
    }
}

/// 在字节数组中查找子序列
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// 解析一个完整事件块，把可见内容追加到累积文本
///
/// 无法解析的 JSON 片段记录诊断日志后跳过，不中断整个流。
fn consume_event(raw: &str, accumulated: &mut String) {
    for line in raw.lines() {
        let Some(data) = line.trim().strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }

        let frame: EventFrame = match serde_json::from_str(data) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(len = data.len(), %err, "丢弃无法解析的事件片段");
                continue;
            }
        };
        let Some(content) = frame.data.and_then(|d| d.content) else {
            continue;
        };

        match extract_content(&content) {
            Some(StreamContent::Text(text)) => accumulated.push_str(&text),
            Some(StreamContent::Links(links)) => accumulated.push_str(&render_links(&links)),
            None => {}
        }
    }
}

/// 流式内容的两类载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamContent {
    /// 普通文本，原样追加
    Text(String),
    /// 标记载荷携带的搜索结果链接，替换原始标记文本
    Links(Vec<SearchLink>),
}

/// 两阶段解析：先尝试标记载荷提取，没有标记则按普通文本处理
///
/// 标记存在但载荷不可解析时返回 None（记录诊断，整帧丢弃），
/// 不把原始标记文本泄漏给客户端。
pub fn extract_content(content: &str) -> Option<StreamContent> {
    let Some(tag_pos) = content.find(MARKER_TAG) else {
        return Some(StreamContent::Text(content.to_string()));
    };

    let Some(blob) = extract_json_object(&content[tag_pos + MARKER_TAG.len()..]) else {
        tracing::warn!("标记载荷缺少完整的 JSON 块，丢弃该帧");
        return None;
    };
    let payload: MarkerPayload = match serde_json::from_str(blob) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(%err, "标记载荷 JSON 解析失败，丢弃该帧");
            return None;
        }
    };
    let raw_links = payload.search_result?;

    match serde_json::from_str::<Vec<SearchLink>>(&raw_links) {
        Ok(links) => Some(StreamContent::Links(links)),
        Err(err) => {
            tracing::warn!(%err, "搜索结果数组解析失败，丢弃该帧");
            None
        }
    }
}

/// 从字符串开头提取一个花括号配对完整的 JSON 对象
///
/// 花括号计数要忽略字符串内部的括号和转义字符，载荷的
/// searchResult 字段本身就是含大括号的 JSON 编码字符串。
fn extract_json_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut brace_count = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => brace_count += 1,
            '}' if !in_string => {
                brace_count -= 1;
                if brace_count == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 把搜索结果渲染为 Markdown 链接列表
fn render_links(links: &[SearchLink]) -> String {
    let items = links
        .iter()
        .map(|l| format!("- [{}]({})", l.title, l.link))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n### 相关链接:\n{items}\n")
}
