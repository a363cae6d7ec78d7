//! 站点提取能力：固定的两函数能力接口 + 内置实现
//! 内核只依赖 PermalinkCapability / PageStateCapability 两个 trait，不感知具体站点

use std::fmt::Debug;
use std::sync::Arc;

use log::debug;
use osm_smart_menu_engine::{AttributeKind, AttributeSet};
use serde::{Deserialize, Serialize};
use url::Url;

use super::history_state::bing_map_state;
use super::html_extractor::HtmlExtractor;
use super::page::PageSnapshot;

/// OpenLayers 站点通用的永久链接选择器
pub const OPENLAYERS_PERMALINK_SELECTOR: &str = "[id*=Permalink] a";

/// 永久链接能力：从页面文档取出一个可再次识别的URL
/// 约定：不得 panic；找不到元素返回 None
pub trait PermalinkCapability: Debug + Send + Sync {
    fn get_permalink(&self, page: &PageSnapshot) -> Option<String>;
}

/// 页面状态能力：从页面运行时状态尽力读取部分属性
/// 约定：内部状态缺失/改名时返回空集合
pub trait PageStateCapability: Debug + Send + Sync {
    fn get_attributes_from_page(&self, page: &PageSnapshot) -> AttributeSet;
}

/// 站点提取能力包：每类能力至多一个
#[derive(Debug, Clone, Default)]
pub struct Extractors {
    pub permalink: Option<Arc<dyn PermalinkCapability>>,
    pub page_state: Option<Arc<dyn PageStateCapability>>,
}

impl Extractors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permalink(mut self, capability: impl PermalinkCapability + 'static) -> Self {
        self.permalink = Some(Arc::new(capability));
        self
    }

    pub fn with_page_state(mut self, capability: impl PageStateCapability + 'static) -> Self {
        self.page_state = Some(Arc::new(capability));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.permalink.is_none() && self.page_state.is_none()
    }
}

// ======================== 内置能力 ========================

/// 选择器永久链接：首个匹配元素的 href，按页面URL解析为绝对地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPermalink {
    pub selector: String,
}

impl SelectorPermalink {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn openlayers() -> Self {
        Self::new(OPENLAYERS_PERMALINK_SELECTOR)
    }
}

impl PermalinkCapability for SelectorPermalink {
    fn get_permalink(&self, page: &PageSnapshot) -> Option<String> {
        let html = page.html.as_deref()?;
        let href = HtmlExtractor::first_attribute(html, &self.selector, "href")?;
        let href = href.trim().replace("&amp;", "&");
        if href.is_empty() {
            return None;
        }

        let resolved = match page.url.as_deref().and_then(|base| Url::parse(base).ok()) {
            Some(base) => base.join(&href),
            None => Url::parse(&href),
        };
        match resolved {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                debug!("[EXTRACT]永久链接无法解析 | 选择器: {} | href: {} | 错误: {}", self.selector, href, e);
                None
            }
        }
    }
}

/// Bing 地图：读取 history.state 中的 MapModeStateHistory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BingHistoryState;

impl PageStateCapability for BingHistoryState {
    fn get_attributes_from_page(&self, page: &PageSnapshot) -> AttributeSet {
        page.history_state
            .as_ref()
            .and_then(bing_map_state)
            .unwrap_or_default()
    }
}

/// 文本坐标：首个匹配元素的文本按分隔符拆成 “lat 分隔符 lon”
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatLonText {
    pub selector: String,
    pub separator: String,
}

impl PageStateCapability for LatLonText {
    fn get_attributes_from_page(&self, page: &PageSnapshot) -> AttributeSet {
        let Some(text) = page
            .html
            .as_deref()
            .and_then(|html| HtmlExtractor::first_text(html, &self.selector))
        else {
            return AttributeSet::new();
        };

        match text.split_once(self.separator.as_str()) {
            Some((lat, lon)) if !lat.trim().is_empty() && !lon.trim().is_empty() => AttributeSet::from([
                (AttributeKind::Lat, lat.trim()),
                (AttributeKind::Lon, lon.trim()),
            ]),
            _ => AttributeSet::new(),
        }
    }
}

// ======================== 配置描述 ========================

/// 站点表中的提取能力声明
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<PermalinkSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_state: Option<PageStateSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermalinkSpec {
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageStateSpec {
    BingHistoryState,
    LatLonText { selector: String, separator: String },
}

impl ExtractorsSpec {
    /// 声明 → 能力包；选择器语法在此校验
    pub fn build(&self) -> Result<Extractors, String> {
        let mut extractors = Extractors::new();

        if let Some(spec) = &self.permalink {
            HtmlExtractor::validate_selector(&spec.selector)?;
            extractors = extractors.with_permalink(SelectorPermalink::new(spec.selector.clone()));
        }

        if let Some(spec) = &self.page_state {
            extractors = match spec {
                PageStateSpec::BingHistoryState => extractors.with_page_state(BingHistoryState),
                PageStateSpec::LatLonText { selector, separator } => {
                    HtmlExtractor::validate_selector(selector)?;
                    if separator.is_empty() {
                        return Err("latLonText separator must not be empty".to_string());
                    }
                    extractors.with_page_state(LatLonText {
                        selector: selector.clone(),
                        separator: separator.clone(),
                    })
                }
            };
        }

        Ok(extractors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_permalink_resolves_relative_href() {
        let page = PageSnapshot::new()
            .with_url("https://map.openseamap.org/?zoom=3")
            .with_html(r#"<div id="OpenLayers.Control.Permalink_12"><a href="/?zoom=14&amp;lat=53.55&amp;lon=9.99">Permalink</a></div>"#);
        let link = SelectorPermalink::openlayers().get_permalink(&page).unwrap();
        assert_eq!(link, "https://map.openseamap.org/?zoom=14&lat=53.55&lon=9.99");
    }

    #[test]
    fn test_selector_permalink_without_html_or_element() {
        let capability = SelectorPermalink::new("a#permalink");
        assert_eq!(capability.get_permalink(&PageSnapshot::new()), None);

        let page = PageSnapshot::new().with_html("<p>nothing here</p>");
        assert_eq!(capability.get_permalink(&page), None);
    }

    #[test]
    fn test_relative_href_without_base_is_dropped() {
        let page = PageSnapshot::new().with_html(r#"<a id="permalink" href="/?zoom=1">x</a>"#);
        assert_eq!(SelectorPermalink::new("a#permalink").get_permalink(&page), None);
    }

    #[test]
    fn test_lat_lon_text() {
        let capability = LatLonText {
            selector: ".wm-attribution-control__latlng".to_string(),
            separator: " | ".to_string(),
        };
        let page = PageSnapshot::new()
            .with_html(r#"<div class="wm-attribution-control__latlng">-23.55052 | -46.63331</div>"#);
        let attrs = capability.get_attributes_from_page(&page);
        assert_eq!(attrs.get(AttributeKind::Lat), Some("-23.55052"));
        assert_eq!(attrs.get(AttributeKind::Lon), Some("-46.63331"));

        let page = PageSnapshot::new().with_html(r#"<div class="wm-attribution-control__latlng">loading</div>"#);
        assert!(capability.get_attributes_from_page(&page).is_empty());
    }

    #[test]
    fn test_declaration_deserialize_and_build() {
        let spec: ExtractorsSpec = serde_json::from_str(
            r#"{"permalink": {"selector": "a#permalink"},
                "pageState": {"kind": "latLonText", "selector": ".x", "separator": " | "}}"#,
        )
        .unwrap();
        let extractors = spec.build().unwrap();
        assert!(extractors.permalink.is_some());
        assert!(extractors.page_state.is_some());

        let spec: ExtractorsSpec = serde_json::from_str(r#"{"pageState": {"kind": "bingHistoryState"}}"#).unwrap();
        assert_eq!(spec.page_state, Some(PageStateSpec::BingHistoryState));
    }

    #[test]
    fn test_declaration_with_bad_selector_rejected() {
        let spec = ExtractorsSpec {
            permalink: Some(PermalinkSpec {
                selector: "a[".to_string(),
            }),
            page_state: None,
        };
        assert!(spec.build().is_err());
    }
}
