use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 页面快照：宿主页面 document/window 在某一时刻的只读副本
/// 一次提取调用只读取一份快照，调用期间不会重新读取页面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// 当前页面URL（解析相对链接的基准）
    #[serde(default)]
    pub url: Option<String>,
    /// 序列化后的 DOM
    #[serde(default)]
    pub html: Option<String>,
    /// window.history.state 的 JSON 形式
    #[serde(default)]
    pub history_state: Option<Value>,
}

impl PageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_history_state(mut self, state: Value) -> Self {
        self.history_state = Some(state);
        self
    }
}
