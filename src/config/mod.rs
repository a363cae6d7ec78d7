//! 配置模块
pub mod translator;

pub use translator::{CustomConfigBuilder, RegistryOrigin, TranslatorConfig, TranslatorOptions};
