//! 翻译器门面
//! 核心职责：
//! 1. 持有只读站点注册表与配置
//! 2. URL 识别（可选页面提取补全）
//! 3. 目标站点链接生成 / 跨站翻译 / “所有站点”菜单

use std::sync::Arc;

use log::debug;
use osm_smart_menu_engine::AttributeSet;
use serde::Serialize;
use url::Url;

use crate::config::TranslatorConfig;
use crate::error::{SmResult, SmartMenuError};
use crate::extractor::{ExtractionChain, PageSnapshot};
use crate::registry::{RegistryLoader, SiteRegistry};

/// 识别结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recognized {
    /// 命中的站点名称
    pub site: String,
    pub attributes: AttributeSet,
}

/// 菜单项：目标站点 + 生成的链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuLink {
    pub site: String,
    pub url: String,
}

/// 翻译器
/// - registry: 站点注册表（Arc共享，构建后只读）
/// - config: 翻译器配置
#[derive(Debug, Clone)]
pub struct Translator {
    registry: Arc<SiteRegistry>,
    config: TranslatorConfig,
}

impl Translator {
    /// 按配置加载站点表并创建翻译器
    pub fn new(config: TranslatorConfig) -> SmResult<Self> {
        let registry = RegistryLoader::new().load(&config)?;
        Ok(Self { registry, config })
    }

    /// 使用已构建的注册表
    pub fn with_registry(registry: Arc<SiteRegistry>) -> Self {
        Self {
            registry,
            config: TranslatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// 识别URL：主机兼容的站点依次尝试，首个识别成功者胜出
    pub fn recognize(&self, url: &str) -> SmResult<Recognized> {
        let parsed = parse_url(url)?;
        for site in self.registry.sites_for_url(&parsed) {
            if let Ok(attributes) = site.match_parsed(&parsed) {
                return Ok(Recognized {
                    site: site.name.clone(),
                    attributes,
                });
            }
        }
        Err(SmartMenuError::NoMatch(format!("没有站点能识别: {}", url)))
    }

    /// 仅在指定站点上识别
    pub fn recognize_on(&self, site: &str, url: &str) -> SmResult<AttributeSet> {
        self.registry.require(site)?.match_url(url)
    }

    /// 识别 + 页面提取补全
    /// URL 可识别时以识别结果为准；否则在主机兼容的站点上依次尝试提取
    pub fn recognize_with_page(&self, url: &str, page: &PageSnapshot) -> SmResult<Recognized> {
        let chain = ExtractionChain::new(&self.registry);

        if let Ok(recognized) = self.recognize(url) {
            let site = self.registry.require(&recognized.site)?;
            let attributes = chain.enrich(site, &recognized.attributes, page);
            return Ok(Recognized {
                site: recognized.site,
                attributes,
            });
        }

        let parsed = parse_url(url)?;
        for site in self.registry.sites_for_url(&parsed) {
            let attributes = chain.extract(site, page);
            if !attributes.is_empty() {
                debug!("[TRANSLATE]URL未识别，页面提取成功 | 站点: {} | URL: {}", site.name, url);
                return Ok(Recognized {
                    site: site.name.clone(),
                    attributes,
                });
            }
        }
        Err(SmartMenuError::NoMatch(format!("URL与页面均无法识别: {}", url)))
    }

    /// 为目标站点生成链接
    pub fn generate(&self, target: &str, attributes: &AttributeSet) -> SmResult<String> {
        self.registry.require(target)?.generate(attributes)
    }

    /// 跨站翻译：识别来源URL，再为目标站点生成
    pub fn translate(&self, url: &str, target: &str) -> SmResult<String> {
        let recognized = self.recognize(url)?;
        self.generate(target, &recognized.attributes)
    }

    /// 为所有站点生成链接（注册表顺序），无法满足的站点跳过
    /// exclude：通常为来源站点
    pub fn translate_all(&self, attributes: &AttributeSet, exclude: Option<&str>) -> Vec<MenuLink> {
        self.registry
            .sites()
            .iter()
            .filter(|site| Some(site.name.as_str()) != exclude)
            .filter_map(|site| match site.generate(attributes) {
                Ok(url) => Some(MenuLink {
                    site: site.name.clone(),
                    url,
                }),
                Err(e) => {
                    debug!("[TRANSLATE]跳过站点 | {}", e);
                    None
                }
            })
            .collect()
    }

    /// 当前页面的完整菜单：识别（可带页面快照）→ 其他站点链接
    /// 来源站点是否出现在菜单中由 include_source_site 决定
    /// 无属性且只是上级域名站点兜底识别时（如 taginfo 首页落到 openstreetmap），不生成菜单
    pub fn links_for_url(&self, url: &str, page: Option<&PageSnapshot>) -> SmResult<Vec<MenuLink>> {
        let recognized = match page {
            Some(page) => self.recognize_with_page(url, page)?,
            None => self.recognize(url)?,
        };
        if recognized.attributes.is_empty() && self.recognized_by_fallback(url, &recognized.site)? {
            return Err(SmartMenuError::NoMatch(format!(
                "仅由上级域名站点[{}]识别且无属性: {}",
                recognized.site, url
            )));
        }
        let exclude = if self.config.options.include_source_site {
            None
        } else {
            Some(recognized.site.as_str())
        };
        Ok(self.translate_all(&recognized.attributes, exclude))
    }

    /// 识别站点之前还有更具体的主机兼容站点
    fn recognized_by_fallback(&self, url: &str, site: &str) -> SmResult<bool> {
        let parsed = parse_url(url)?;
        Ok(self
            .registry
            .sites_for_url(&parsed)
            .first()
            .is_some_and(|first| first.name != site))
    }
}

fn parse_url(url: &str) -> SmResult<Url> {
    Url::parse(url.trim()).map_err(|e| SmartMenuError::NoMatch(format!("无法解析URL `{}`: {}", url, e)))
}
