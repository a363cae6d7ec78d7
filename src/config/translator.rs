//! 翻译器配置管理

use std::path::PathBuf;

/// 站点表来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOrigin {
    Embedded,           // 内置站点表（编译期 include）
    LocalFile(PathBuf), // 本地 JSON 站点表（运行时读取一次）
}

/// 核心选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// 严格模式：任一站点配置错误即整体加载失败；默认记录日志并跳过该站点
    pub strict: bool,
    /// 为当前页面生成“所有站点”链接时，是否包含来源站点本身
    pub include_source_site: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            strict: false,
            include_source_site: false,
        }
    }
}

/// 完整翻译器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub origin: RegistryOrigin,
    pub options: TranslatorOptions,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            origin: RegistryOrigin::Embedded,
            options: TranslatorOptions::default(),
        }
    }
}

impl TranslatorConfig {
    /// 内置站点表
    pub fn embedded() -> Self {
        Self::default()
    }

    /// 本地站点表文件
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: RegistryOrigin::LocalFile(path.into()),
            options: TranslatorOptions::default(),
        }
    }

    /// 链式构建器
    pub fn builder() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: TranslatorConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: RegistryOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    pub fn local_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.origin = RegistryOrigin::LocalFile(path.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.options.strict = strict;
        self
    }

    pub fn include_source_site(mut self, include: bool) -> Self {
        self.config.options.include_source_site = include;
        self
    }

    pub fn build(self) -> TranslatorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_embedded_and_lenient() {
        let config = TranslatorConfig::default();
        assert_eq!(config.origin, RegistryOrigin::Embedded);
        assert!(!config.options.strict);
        assert!(!config.options.include_source_site);
    }

    #[test]
    fn test_builder_chain() {
        let config = TranslatorConfig::builder()
            .local_file("/tmp/sites.json")
            .strict(true)
            .include_source_site(true)
            .build();
        assert_eq!(config.origin, RegistryOrigin::LocalFile(PathBuf::from("/tmp/sites.json")));
        assert!(config.options.strict);
        assert!(config.options.include_source_site);
    }
}
