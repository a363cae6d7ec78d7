//! 站点定义与站点级匹配/生成
//! 在模板级匹配之上补充：主机/路径前缀校验、协议限制、缩放上限

use log::debug;
use osm_smart_menu_engine::{
    clamp_zoom, AttributeSet, CompiledPatternList, CoreError, PatternDef, UrlParts,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SmResult, SmartMenuError};
use crate::extractor::{Extractors, ExtractorsSpec};

/// 站点声明（站点表中的一项）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDefinition {
    pub name: String,
    /// 主机 + 可选路径前缀，例如 `www.google.com/maps`
    #[serde(alias = "host")]
    pub link: String,
    /// 候选模板，声明顺序即优先级
    #[serde(alias = "paramOpts")]
    pub patterns: Vec<PatternDef>,
    /// 仅支持 HTTP：https 链接不识别，生成时使用 http
    #[serde(default)]
    pub http_only: bool,
    /// 站点能正确处理的最大缩放级别
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
    #[serde(default)]
    pub extractors: ExtractorsSpec,
}

/// 拆分后的站点 link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLink {
    /// 小写主机名
    pub host: String,
    /// 路径前缀，空或以 `/` 开头且不以 `/` 结尾
    pub path_prefix: String,
}

impl SiteLink {
    pub fn parse(link: &str) -> Result<Self, CoreError> {
        let trimmed = link
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let (host, path) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };
        if host.is_empty() {
            return Err(CoreError::InvalidInput(format!("site link `{}` has no host", link)));
        }
        Ok(Self {
            host: host.to_ascii_lowercase(),
            path_prefix: path.trim_end_matches('/').to_string(),
        })
    }

    /// 主机是否兼容：完全相等，或是 link 主机的子域
    pub fn host_matches(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.');
        host.eq_ignore_ascii_case(&self.host)
            || (host.len() > self.host.len()
                && host.to_ascii_lowercase().ends_with(&self.host)
                && host.as_bytes()[host.len() - self.host.len() - 1] == b'.')
    }

    /// 主机与路径前缀都兼容时，返回前缀之后的路径（空路径视为 `/`）
    pub fn strip<'u>(&self, url: &'u Url) -> Option<&'u str> {
        if !self.host_matches(url.host_str()?) {
            return None;
        }
        let remainder = url.path().strip_prefix(self.path_prefix.as_str())?;
        if remainder.is_empty() {
            return Some("/");
        }
        // 前缀必须落在路径段边界上
        remainder.starts_with('/').then_some(remainder)
    }

    /// 排序用的具体程度：精确主机优先，其次 link 越长越具体
    pub fn specificity(&self, url: &Url) -> (bool, usize) {
        let exact = url
            .host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host))
            .unwrap_or(false);
        (exact, self.host.len() + self.path_prefix.len())
    }
}

/// 编译后的站点
#[derive(Debug, Clone)]
pub struct Site {
    pub name: String,
    pub link: SiteLink,
    pub http_only: bool,
    pub max_zoom: Option<u8>,
    pub extractors: Extractors,
    patterns: CompiledPatternList,
    definition: SiteDefinition,
}

impl Site {
    /// 编译站点声明；任一模板或提取能力声明非法即返回配置错误
    pub fn compile(definition: SiteDefinition) -> SmResult<Self> {
        let config_error = |source: CoreError| SmartMenuError::ConfigurationError {
            site: definition.name.clone(),
            source,
        };

        if definition.patterns.is_empty() {
            return Err(config_error(CoreError::InvalidInput("site declares no patterns".to_string())));
        }
        let link = SiteLink::parse(&definition.link).map_err(config_error)?;
        let patterns = CompiledPatternList::compile(&definition.patterns).map_err(config_error)?;
        let extractors = definition
            .extractors
            .build()
            .map_err(|reason| config_error(CoreError::InvalidInput(reason)))?;

        Ok(Self {
            name: definition.name.clone(),
            link,
            http_only: definition.http_only,
            max_zoom: definition.max_zoom,
            extractors,
            patterns,
            definition,
        })
    }

    pub fn definition(&self) -> &SiteDefinition {
        &self.definition
    }

    pub fn patterns(&self) -> &CompiledPatternList {
        &self.patterns
    }

    /// 站点根地址（含协议与路径前缀）
    pub fn base_url(&self) -> String {
        let scheme = if self.http_only { "http" } else { "https" };
        format!("{}://{}{}", scheme, self.link.host, self.link.path_prefix)
    }

    /// 识别URL字符串
    pub fn match_url(&self, url: &str) -> SmResult<AttributeSet> {
        let parsed = Url::parse(url.trim()).map_err(|e| {
            SmartMenuError::NoMatch(format!("[{}] 无法解析URL `{}`: {}", self.name, url, e))
        })?;
        self.match_parsed(&parsed)
    }

    /// 识别已解析的URL
    /// 顺序：协议 → 主机/路径前缀 → 模板按声明顺序短路匹配
    pub fn match_parsed(&self, url: &Url) -> SmResult<AttributeSet> {
        match url.scheme() {
            "http" => {}
            "https" if !self.http_only => {}
            "https" => {
                return Err(SmartMenuError::NoMatch(format!(
                    "[{}] 站点仅支持HTTP: {}",
                    self.name, url
                )))
            }
            other => {
                return Err(SmartMenuError::NoMatch(format!(
                    "[{}] 不支持的协议 `{}`",
                    self.name, other
                )))
            }
        }

        let Some(path) = self.link.strip(url) else {
            return Err(SmartMenuError::NoMatch(format!(
                "[{}] 主机或路径前缀不匹配: {}",
                self.name, url
            )));
        };

        let parts = UrlParts::new(path, url.query(), url.fragment());
        match self.patterns.match_first(&parts) {
            Some((index, attributes)) => {
                debug!("[{}]识别成功 | 模板 #{} | URL: {}", self.name, index, url);
                Ok(attributes)
            }
            None => Err(SmartMenuError::NoMatch(format!(
                "[{}] 没有模板匹配: {}",
                self.name, url
            ))),
        }
    }

    /// 生成本站点URL
    /// zoom 超过站点上限时先钳制，再按模板优先级选择并渲染
    pub fn generate(&self, attributes: &AttributeSet) -> SmResult<String> {
        let mut attributes = attributes.clone();
        if let Some(max_zoom) = self.max_zoom {
            clamp_zoom(&mut attributes, max_zoom);
        }

        let rendered = self.patterns.render(&attributes).ok_or_else(|| {
            let kinds: Vec<&str> = attributes.kinds().map(|k| k.as_str()).collect();
            SmartMenuError::Unsatisfiable(format!(
                "[{}] 现有属性 [{}] 无法满足任何模板",
                self.name,
                kinds.join(", ")
            ))
        })?;

        Ok(format!("{}{}", self.base_url(), rendered.relative_url))
    }
}
