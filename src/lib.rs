//! osm-smart-menu - 地图站点间的URL互转引擎
//! 识别一个地图相关页面的URL，再为其他站点生成指向同一位置/实体的链接

pub mod config;
pub mod error;
pub mod extractor;
pub mod registry;
pub mod translator;

// 导出全局错误类型
pub use self::error::{SmResult, SmartMenuError};

// 导出配置模块核心结构体与构建器
pub use crate::config::{CustomConfigBuilder, RegistryOrigin, TranslatorConfig, TranslatorOptions};

// 导出站点注册表
pub use crate::registry::{RegistryLoader, Site, SiteDefinition, SiteLink, SiteRegistry, EMBEDDED_SITES_JSON};

// 导出页面提取能力
pub use crate::extractor::{
    ExtractionChain, Extractors, HtmlExtractor, PageSnapshot, PageStateCapability, PermalinkCapability,
};

// 导出翻译器门面与全局便捷接口
pub use crate::translator::{
    global_translator, init_global_translator, menu_links, translate_url, MenuLink, Recognized, Translator,
};

// 导出内核属性模型
pub use osm_smart_menu_engine::{AttributeKind, AttributeSet, PatternDef, UnorderedKey};
