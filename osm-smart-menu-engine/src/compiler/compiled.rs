use rustc_hash::{FxHashMap, FxHashSet};
use url::form_urlencoded;

use super::matcher::ComponentMatcher;
use super::template::{parse_ordered, Component};
use crate::core::{AttributeKind, AttributeSet, PatternDef, UrlParts};
use crate::error::{CoreError, CoreResult};

/// 编译后的模板（匹配器 + 生成器）
/// 职责：
/// 1. 有序组件：逐组件正则匹配/占位符替换
/// 2. 无序组件：键名查找表，读写 query/fragment 中的 key=value
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// 原始声明
    pub source: PatternDef,
    /// 有序组件匹配器，顺序固定为 path → query → fragment
    components: Vec<ComponentMatcher>,
    /// 有序占位符属性（生成时必须全部存在）
    required: Vec<AttributeKind>,
    /// 无序键名 → 属性
    unordered_lookup: FxHashMap<String, AttributeKind>,
}

impl CompiledPattern {
    /// 编译单条模板
    /// 配置期校验：语法、属性名、同一属性在模板内只能出现一次
    pub fn compile(def: &PatternDef) -> CoreResult<Self> {
        let templates = parse_ordered(&def.ordered)?;

        let mut seen: FxHashSet<AttributeKind> = FxHashSet::default();
        let mut required = Vec::new();
        for kind in templates.iter().flat_map(|t| t.placeholders()) {
            if !seen.insert(kind) {
                return Err(CoreError::DuplicateAttribute {
                    attribute: kind,
                    pattern: def.ordered.clone(),
                });
            }
            required.push(kind);
        }

        let mut unordered_lookup = FxHashMap::default();
        for entry in &def.unordered {
            if entry.key.trim().is_empty() {
                return Err(CoreError::syntax(
                    &def.ordered,
                    format!("empty query key for attribute `{}`", entry.attribute),
                ));
            }
            if !seen.insert(entry.attribute) {
                return Err(CoreError::DuplicateAttribute {
                    attribute: entry.attribute,
                    pattern: def.ordered.clone(),
                });
            }
            if unordered_lookup.insert(entry.key.clone(), entry.attribute).is_some() {
                return Err(CoreError::syntax(
                    &def.ordered,
                    format!("query key `{}` mapped twice", entry.key),
                ));
            }
        }

        let components = templates
            .into_iter()
            .map(ComponentMatcher::compile)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            source: def.clone(),
            components,
            required,
            unordered_lookup,
        })
    }

    /// 有序占位符引用的属性
    pub fn required_attributes(&self) -> &[AttributeKind] {
        &self.required
    }

    /// 有序骨架是否包含 query / fragment 组件
    pub fn has_component(&self, component: Component) -> bool {
        self.components.iter().any(|m| m.component() == component)
    }

    /// 结构匹配
    /// - 有序组件：骨架中出现的组件必须在 URL 中存在且完整匹配，骨架未声明的组件不做约束
    /// - 无序组件：query 优先，其次 fragment；缺失的键不影响匹配
    /// 返回：提取出的属性集合 | None（结构不匹配）
    pub fn match_parts(&self, parts: &UrlParts<'_>) -> Option<AttributeSet> {
        let mut attributes = AttributeSet::new();

        for matcher in &self.components {
            let input = match matcher.component() {
                Component::Path => Some(parts.path),
                Component::Query => parts.query,
                Component::Fragment => parts.fragment,
            }?;
            if !matcher.capture_into(input, &mut attributes) {
                return None;
            }
        }

        if !self.unordered_lookup.is_empty() {
            for (key, value) in parts.key_value_pairs() {
                let Some(kind) = self.unordered_lookup.get(&key) else {
                    continue;
                };
                if value.is_empty() || attributes.contains(*kind) {
                    continue;
                }
                attributes.insert(*kind, value);
            }
        }

        Some(attributes)
    }

    /// 生成相对URL（path + query + fragment）
    /// 返回：None 表示有序占位符未被满足
    pub fn render(&self, attributes: &AttributeSet) -> Option<String> {
        let mut path = String::new();
        let mut query: Option<String> = None;
        let mut fragment: Option<String> = None;

        for matcher in &self.components {
            let rendered = matcher.render(attributes)?;
            match matcher.component() {
                Component::Path => path = rendered,
                Component::Query => query = Some(rendered),
                Component::Fragment => fragment = Some(rendered),
            }
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut appended = false;
        for entry in &self.source.unordered {
            if let Some(value) = attributes.get(entry.attribute) {
                serializer.append_pair(&entry.key, value);
                appended = true;
            }
        }
        if appended {
            let pairs = serializer.finish();
            query = Some(match query {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, pairs),
                _ => pairs,
            });
        }

        let mut url = path;
        if let Some(query) = query {
            url.push('?');
            url.push_str(&query);
        }
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(&fragment);
        }
        Some(url)
    }

    /// 有序占位符是否全部可满足（无序属性从不阻塞选择）
    #[inline(always)]
    pub fn is_satisfiable(&self, attributes: &AttributeSet) -> bool {
        self.required.iter().all(|kind| attributes.contains(*kind))
    }

    /// 渲染时是否会用到输入中的至少一个属性
    pub fn uses_any(&self, attributes: &AttributeSet) -> bool {
        self.required.iter().any(|kind| attributes.contains(*kind))
            || self
                .source
                .unordered
                .iter()
                .any(|entry| attributes.contains(entry.attribute))
    }

    /// 规则描述（日志用）
    pub fn describe(&self) -> &str {
        &self.source.ordered
    }

    /// 组件级正则（调试用）
    pub fn component_regexes(&self) -> impl Iterator<Item = (Component, &str)> {
        self.components.iter().map(|m| (m.component(), m.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttributeKind::*;

    fn compile(def: PatternDef) -> CompiledPattern {
        CompiledPattern::compile(&def).unwrap()
    }

    #[test]
    fn test_match_ordered_and_ignore_unlisted_query() {
        let p = compile(PatternDef::new("/way/{wayId}#map={zoom}/{lat}/{lon}"));
        let parts = UrlParts::split("/way/263290462?locale=pt#map=17/-26.30144/-48.84531");
        let attrs = p.match_parts(&parts).unwrap();
        assert_eq!(
            attrs,
            AttributeSet::from([
                (WayId, "263290462"),
                (Zoom, "17"),
                (Lat, "-26.30144"),
                (Lon, "-48.84531"),
            ])
        );
    }

    #[test]
    fn test_missing_fragment_fails_structural_match() {
        let p = compile(PatternDef::new("/way/{wayId}#map={zoom}/{lat}/{lon}"));
        assert!(p.match_parts(&UrlParts::split("/way/263290462")).is_none());
    }

    #[test]
    fn test_unordered_keys_any_order() {
        let p = compile(
            PatternDef::new("/app")
                .with_unordered(Zoom, "z")
                .with_unordered(Lat, "lat")
                .with_unordered(Lon, "lng"),
        );
        let a = p.match_parts(&UrlParts::split("/app?lat=1.25&lng=2.5&z=14.3")).unwrap();
        let b = p.match_parts(&UrlParts::split("/app?z=14.3&lng=2.5&lat=1.25")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(Zoom), Some("14.3"));
    }

    #[test]
    fn test_unordered_query_wins_over_fragment() {
        let p = compile(PatternDef::new("/").with_unordered(Lat, "lat"));
        let attrs = p.match_parts(&UrlParts::split("/?lat=1#lat=2")).unwrap();
        assert_eq!(attrs.get(Lat), Some("1"));
        let attrs = p.match_parts(&UrlParts::split("/#lat=2")).unwrap();
        assert_eq!(attrs.get(Lat), Some("2"));
    }

    #[test]
    fn test_unordered_keys_are_optional_for_match() {
        let p = compile(PatternDef::new("/").with_unordered(Lat, "mlat").with_unordered(Lon, "mlon"));
        let attrs = p.match_parts(&UrlParts::split("/")).unwrap();
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_render_appends_unordered_in_declared_order() {
        let p = compile(
            PatternDef::new("/")
                .with_unordered(Zoom, "zoom")
                .with_unordered(Lat, "lat")
                .with_unordered(Lon, "lon"),
        );
        let attrs = AttributeSet::from([(Lon, "2.35"), (Lat, "48.85"), (Zoom, "12")]);
        assert_eq!(p.render(&attrs).as_deref(), Some("/?zoom=12&lat=48.85&lon=2.35"));

        let partial = AttributeSet::from([(Lat, "48.85")]);
        assert_eq!(p.render(&partial).as_deref(), Some("/?lat=48.85"));
        assert_eq!(p.render(&AttributeSet::new()).as_deref(), Some("/"));
    }

    #[test]
    fn test_render_unordered_joins_existing_query_and_keeps_fragment() {
        let p = compile(PatternDef::new("/x?a={nodeId}#f={zoom}").with_unordered(Lat, "lat"));
        let attrs = AttributeSet::from([(NodeId, "5"), (Zoom, "3"), (Lat, "1")]);
        assert_eq!(p.render(&attrs).as_deref(), Some("/x?a=5&lat=1#f=3"));
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let err = CompiledPattern::compile(&PatternDef::new("/{lat}/x/{lat}")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAttribute { attribute: Lat, .. }));

        let err = CompiledPattern::compile(&PatternDef::new("/{lat}").with_unordered(Lat, "lat")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_satisfiable_and_uses_any() {
        let p = compile(PatternDef::new("/history/way.php").with_unordered(WayId, "id"));
        assert!(p.is_satisfiable(&AttributeSet::new()));
        assert!(!p.uses_any(&AttributeSet::from([(NodeId, "1")])));
        assert!(p.uses_any(&AttributeSet::from([(WayId, "1")])));
    }
}
