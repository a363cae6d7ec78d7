//! 全局错误类型定义
use osm_smart_menu_engine::CoreError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum SmartMenuError {
    // 配置相关错误
    #[error("站点配置错误 [{site}]：{source}")]
    ConfigurationError {
        site: String,
        #[source]
        source: CoreError,
    },
    #[error("站点表加载失败：{0}")]
    RegistryLoadError(String),
    #[error("未知站点：{0}")]
    UnknownSite(String),

    // 识别/生成相关错误（可恢复）
    #[error("URL无法识别：{0}")]
    NoMatch(String),
    #[error("属性不足，无法生成链接：{0}")]
    Unsatisfiable(String),

    // 初始化相关错误
    #[error("翻译器初始化失败：{0}")]
    TranslatorInitError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

impl SmartMenuError {
    /// 是否为可恢复的翻译失败（调用方可尝试提取兜底或降级）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SmartMenuError::NoMatch(_) | SmartMenuError::Unsatisfiable(_))
    }
}

// 全局Result类型
pub type SmResult<T> = Result<T, SmartMenuError>;
