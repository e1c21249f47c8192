//! OpenAI 请求转换为 Juchats 上游格式
//!
//! 包含模型名到 mode ID 的映射，以及把消息列表压平为单个 prompt 的编译逻辑。
//! 压平是有损且不可逆的，上游只接受一个字符串。

use crate::config::DEFAULT_MODE_ID;
use crate::models::openai::ChatMessage;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 模型映射表，启动时构建一次，之后只读
static MODEL_TO_MODE_ID: Lazy<HashMap<&'static str, i64>> = Lazy::new(|| {
    HashMap::from([
        ("o3-mini", 33),
        ("o1-mini", 27),
        ("o1-preview", 26),
        ("gpt-4o-mini", 21),
        ("gpt-4o", 17),
        ("claude-3-5-haiku", 5),
        ("claude-3-5-sonnet", 20),
        ("claude-3-7-sonnet", 36),
        ("gemini-2.0-flash-exp", 34),
        ("deepseek-r1", 32),
        ("deepseek-v3", 35),
    ])
});

/// 解析模型名对应的 mode ID，未知名称静默回退到默认值
pub fn resolve_mode_id(model: &str) -> i64 {
    MODEL_TO_MODE_ID
        .get(model)
        .copied()
        .unwrap_or(DEFAULT_MODE_ID)
}

/// 把 OpenAI 消息列表压平为上游 prompt
///
/// 1. 首条 system 消息包进人设指令模板，缺失则为空串；
/// 2. 历史 = 除 system 外、去掉最后一条的消息，按原顺序以 `role: content` 拼接；
/// 3. 当前提问 = 最后一条消息的内容，仅当其角色为 user；
/// 4. 拼接为 `{人设}\n{历史}\n我的问题是:{提问}`。
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let system_prompt = messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| {
            format!(
                "你将扮演一个{},不要联网,不要搜索,不要提及juchat.\n",
                m.content
            )
        })
        .unwrap_or_default();

    let non_system: Vec<&ChatMessage> = messages.iter().filter(|m| m.role != "system").collect();
    let history = non_system
        .iter()
        .take(non_system.len().saturating_sub(1))
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let current_question = messages
        .last()
        .filter(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or("");

    format!("{system_prompt}\n{history}\n我的问题是:{current_question}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn known_models_resolve_to_mapped_ids() {
        assert_eq!(resolve_mode_id("gpt-4o"), 17);
        assert_eq!(resolve_mode_id("gpt-4o-mini"), 21);
        assert_eq!(resolve_mode_id("deepseek-r1"), 32);
        assert_eq!(resolve_mode_id("claude-3-7-sonnet"), 36);
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        assert_eq!(resolve_mode_id("gpt-5"), DEFAULT_MODE_ID);
        assert_eq!(resolve_mode_id(""), DEFAULT_MODE_ID);
    }

    #[test]
    fn prompt_contains_persona_history_and_question() {
        let messages = vec![
            msg("system", "X"),
            msg("user", "A"),
            msg("assistant", "B"),
            msg("user", "C"),
        ];
        let prompt = build_prompt(&messages);

        assert!(prompt.contains("你将扮演一个X,不要联网,不要搜索,不要提及juchat."));
        assert!(prompt.contains("user: A\nassistant: B"));
        assert!(prompt.ends_with("我的问题是:C"));
        // 最后一条消息只作为提问出现，不进历史
        assert!(!prompt.contains("user: C"));
        assert_eq!(prompt.matches('C').count(), 1);
    }

    #[test]
    fn history_preserves_original_order() {
        let messages = vec![
            msg("user", "first"),
            msg("assistant", "second"),
            msg("user", "third"),
            msg("user", "last"),
        ];
        let prompt = build_prompt(&messages);
        let first = prompt.find("user: first").unwrap();
        let second = prompt.find("assistant: second").unwrap();
        let third = prompt.find("user: third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn missing_system_message_yields_empty_persona() {
        let prompt = build_prompt(&[msg("user", "hello")]);
        assert!(!prompt.contains("你将扮演"));
        assert!(prompt.ends_with("我的问题是:hello"));
    }

    #[test]
    fn trailing_assistant_message_yields_empty_question() {
        let messages = vec![msg("user", "Q"), msg("assistant", "A")];
        let prompt = build_prompt(&messages);
        assert!(prompt.ends_with("我的问题是:"));
        // 最后一条非 user 消息不进历史也不作提问
        assert!(prompt.contains("user: Q"));
        assert!(!prompt.contains("assistant: A"));
    }

    #[test]
    fn empty_message_list_compiles_to_bare_template() {
        let prompt = build_prompt(&[]);
        assert_eq!(prompt, "\n\n我的问题是:");
    }
}
