//! 提取兜底链
//! 永久链接 → 再识别 → 页面状态补全；能力失败一律吞掉并记录日志
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, warn};
use once_cell::sync::Lazy;
use osm_smart_menu_engine::AttributeSet;
use regex::Regex;
use url::Url;

use super::page::PageSnapshot;
use crate::registry::{Site, SiteRegistry};

/// 坐标/缩放必须是十进制数
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("numeric regex is a valid constant")
});

/// 绑定注册表的提取链
#[derive(Debug, Clone, Copy)]
pub struct ExtractionChain<'r> {
    registry: &'r SiteRegistry,
}

impl<'r> ExtractionChain<'r> {
    pub fn new(registry: &'r SiteRegistry) -> Self {
        Self { registry }
    }

    /// 永久链接能力 → 再识别
    /// 先在本站点上识别，失败再交给任一主机兼容的站点
    pub fn permalink_attributes(&self, site: &Site, page: &PageSnapshot) -> AttributeSet {
        let Some(capability) = site.extractors.permalink.as_ref() else {
            return AttributeSet::new();
        };

        let permalink = match catch_unwind(AssertUnwindSafe(|| capability.get_permalink(page))) {
            Ok(Some(link)) => link,
            Ok(None) => {
                debug!("[EXTRACT]未找到永久链接 | 站点: {}", site.name);
                return AttributeSet::new();
            }
            Err(panic) => {
                warn!("[EXTRACT]永久链接能力异常 | 站点: {} | 原因: {}", site.name, panic_message(&*panic));
                return AttributeSet::new();
            }
        };

        let url = match Url::parse(&permalink) {
            Ok(url) => url,
            Err(e) => {
                warn!("[EXTRACT]永久链接无法解析 | 站点: {} | 链接: {} | 错误: {}", site.name, permalink, e);
                return AttributeSet::new();
            }
        };

        if let Ok(attributes) = site.match_parsed(&url) {
            return attributes;
        }
        for other in self.registry.sites_for_url(&url) {
            if other.name == site.name {
                continue;
            }
            if let Ok(attributes) = other.match_parsed(&url) {
                debug!("[EXTRACT]永久链接由其他站点识别 | 站点: {} → {}", site.name, other.name);
                return attributes;
            }
        }

        debug!("[EXTRACT]永久链接无法识别 | 站点: {} | 链接: {}", site.name, permalink);
        AttributeSet::new()
    }

    /// 页面状态能力，结果经过清洗
    pub fn page_state_attributes(&self, site: &Site, page: &PageSnapshot) -> AttributeSet {
        let Some(capability) = site.extractors.page_state.as_ref() else {
            return AttributeSet::new();
        };

        match catch_unwind(AssertUnwindSafe(|| capability.get_attributes_from_page(page))) {
            Ok(attributes) => sanitize(&site.name, attributes),
            Err(panic) => {
                warn!("[EXTRACT]页面状态能力异常 | 站点: {} | 原因: {}", site.name, panic_message(&*panic));
                AttributeSet::new()
            }
        }
    }

    /// 完整提取：永久链接结果优先，页面状态补齐缺失项
    pub fn extract(&self, site: &Site, page: &PageSnapshot) -> AttributeSet {
        let mut attributes = self.permalink_attributes(site, page);
        let filled = attributes.merge_missing(&self.page_state_attributes(site, page));
        debug!(
            "[EXTRACT]提取完成 | 站点: {} | 属性数: {} | 页面状态补充: {}",
            site.name,
            attributes.len(),
            filled
        );
        attributes
    }

    /// 以已识别的属性为准，提取结果只填补缺失项
    pub fn enrich(&self, site: &Site, base: &AttributeSet, page: &PageSnapshot) -> AttributeSet {
        let mut attributes = base.clone();
        if site.extractors.is_empty() {
            return attributes;
        }
        attributes.merge_missing(&self.extract(site, page));
        attributes
    }
}

/// 丢弃空值与非数值坐标/缩放
fn sanitize(site: &str, attributes: AttributeSet) -> AttributeSet {
    attributes
        .into_iter()
        .filter_map(|(kind, value)| {
            let value = value.trim().to_string();
            if value.is_empty() {
                debug!("[EXTRACT]丢弃空值 | 站点: {} | 属性: {}", site, kind);
                return None;
            }
            if kind.is_coordinate() && !NUMERIC.is_match(&value) {
                warn!("[EXTRACT]丢弃非数值属性 | 站点: {} | 属性: {} | 值: {}", site, kind, value);
                return None;
            }
            Some((kind, value))
        })
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{Extractors, PageStateCapability, PermalinkCapability};
    use crate::registry::SiteDefinition;
    use osm_smart_menu_engine::AttributeKind;
    use osm_smart_menu_engine::AttributeKind::*;
    use serde_json::json;

    #[derive(Debug)]
    struct FixedPermalink(&'static str);

    impl PermalinkCapability for FixedPermalink {
        fn get_permalink(&self, _page: &PageSnapshot) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct FixedState(Vec<(AttributeKind, &'static str)>);

    impl PageStateCapability for FixedState {
        fn get_attributes_from_page(&self, _page: &PageSnapshot) -> AttributeSet {
            self.0.iter().cloned().collect()
        }
    }

    #[derive(Debug)]
    struct Panicking;

    impl PermalinkCapability for Panicking {
        fn get_permalink(&self, _page: &PageSnapshot) -> Option<String> {
            panic!("page layout changed")
        }
    }

    impl PageStateCapability for Panicking {
        fn get_attributes_from_page(&self, _page: &PageSnapshot) -> AttributeSet {
            panic!("page layout changed")
        }
    }

    fn registry() -> SiteRegistry {
        SiteRegistry::from_json_str(
            r#"[
                {"name": "openseamap", "link": "map.openseamap.org",
                 "patterns": [{"ordered": "/", "unordered": {"zoom": "zoom", "lat": "lat", "lon": "lon"}}]},
                {"name": "openstreetmap", "link": "openstreetmap.org",
                 "patterns": [{"ordered": "/#map={zoom}/{lat}/{lon}"}]}
            ]"#,
            true,
        )
        .unwrap()
    }

    fn site_with(name: &str, extractors: Extractors) -> Site {
        let definition: SiteDefinition = serde_json::from_value(json!({
            "name": name,
            "link": "map.openseamap.org",
            "patterns": [{"ordered": "/", "unordered": {"zoom": "zoom", "lat": "lat", "lon": "lon"}}]
        }))
        .unwrap();
        let mut site = Site::compile(definition).unwrap();
        site.extractors = extractors;
        site
    }

    #[test]
    fn test_permalink_rematched_on_same_site() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new().with_permalink(FixedPermalink("https://map.openseamap.org/?zoom=14&lat=53.5&lon=9.9")),
        );
        let attrs = ExtractionChain::new(&registry).extract(&site, &PageSnapshot::new());
        assert_eq!(attrs, AttributeSet::from([(Zoom, "14"), (Lat, "53.5"), (Lon, "9.9")]));
    }

    #[test]
    fn test_permalink_matched_by_other_site() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new().with_permalink(FixedPermalink("https://www.openstreetmap.org/#map=5/1.5/2.5")),
        );
        let attrs = ExtractionChain::new(&registry).permalink_attributes(&site, &PageSnapshot::new());
        assert_eq!(attrs.get(Zoom), Some("5"));
    }

    #[test]
    fn test_unparsable_permalink_dropped() {
        let registry = registry();
        let site = site_with("openseamap", Extractors::new().with_permalink(FixedPermalink("not a url")));
        assert!(ExtractionChain::new(&registry)
            .extract(&site, &PageSnapshot::new())
            .is_empty());
    }

    #[test]
    fn test_permalink_wins_over_page_state() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new()
                .with_permalink(FixedPermalink("https://map.openseamap.org/?zoom=14&lat=53.5&lon=9.9"))
                .with_page_state(FixedState(vec![(Zoom, "3"), (NodeId, "77")])),
        );
        let attrs = ExtractionChain::new(&registry).extract(&site, &PageSnapshot::new());
        assert_eq!(attrs.get(Zoom), Some("14"));
        assert_eq!(attrs.get(NodeId), Some("77"));
    }

    #[test]
    fn test_page_state_sanitized() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new().with_page_state(FixedState(vec![
                (Lat, "abc"),
                (Lon, " -46.6 "),
                (Zoom, ""),
                (UserName, "someone"),
            ])),
        );
        let attrs = ExtractionChain::new(&registry).page_state_attributes(&site, &PageSnapshot::new());
        assert_eq!(attrs, AttributeSet::from([(Lon, "-46.6"), (UserName, "someone")]));

        let site = site_with(
            "openseamap",
            Extractors::new().with_page_state(FixedState(vec![(Zoom, "z12"), (Lat, "1"), (NodeId, "n1")])),
        );
        let attrs = ExtractionChain::new(&registry).page_state_attributes(&site, &PageSnapshot::new());
        assert_eq!(attrs, AttributeSet::from([(Lat, "1"), (NodeId, "n1")]));
    }

    #[test]
    fn test_capability_panics_are_contained() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new().with_permalink(Panicking).with_page_state(Panicking),
        );
        assert!(ExtractionChain::new(&registry)
            .extract(&site, &PageSnapshot::new())
            .is_empty());
    }

    #[test]
    fn test_enrich_keeps_base_values() {
        let registry = registry();
        let site = site_with(
            "openseamap",
            Extractors::new().with_page_state(FixedState(vec![(Lat, "1"), (Lon, "2"), (Zoom, "3")])),
        );
        let base = AttributeSet::from([(Zoom, "12")]);
        let attrs = ExtractionChain::new(&registry).enrich(&site, &base, &PageSnapshot::new());
        assert_eq!(attrs, AttributeSet::from([(Zoom, "12"), (Lat, "1"), (Lon, "2")]));
    }
}
