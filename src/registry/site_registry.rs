//! 站点注册表：一次构建、只读共享
use std::path::Path;

use log::{info, warn};
use rustc_hash::FxHashMap;
use serde_json::value::RawValue;
use url::Url;

use super::site::{Site, SiteDefinition};
use crate::error::{SmResult, SmartMenuError};

/// 已编译站点的有序集合
/// 声明顺序即“所有站点”菜单的顺序
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: Vec<Site>,
    by_name: FxHashMap<String, usize>,
}

impl SiteRegistry {
    /// 由站点声明构建
    /// strict=false：编译失败的站点记录日志后跳过；strict=true：首个失败即返回
    pub fn from_definitions(definitions: Vec<SiteDefinition>, strict: bool) -> SmResult<Self> {
        let mut registry = Self::default();
        for definition in definitions {
            match Site::compile(definition) {
                Ok(site) => registry.push(site, strict)?,
                Err(e) if strict => return Err(e),
                Err(e) => warn!("[REGISTRY]跳过站点 | 错误: {}", e),
            }
        }
        Ok(registry)
    }

    /// 由 JSON 站点表构建（顶层为数组）
    /// 单项结构非法与编译失败同样处理：宽松模式跳过，严格模式报错
    /// 逐项保留原始文本再反序列化，unordered 的键序不经过 Value 重排
    pub fn from_json_str(json: &str, strict: bool) -> SmResult<Self> {
        let entries: Vec<&RawValue> = serde_json::from_str(json)?;

        let mut definitions = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_str::<SiteDefinition>(entry.get()) {
                Ok(definition) => definitions.push(definition),
                Err(e) if strict => {
                    return Err(SmartMenuError::RegistryLoadError(format!(
                        "站点表第 {} 项结构非法: {}",
                        index, e
                    )))
                }
                Err(e) => warn!("[REGISTRY]跳过站点表第 {} 项 | 结构非法: {}", index, e),
            }
        }

        let registry = Self::from_definitions(definitions, strict)?;
        info!("[REGISTRY]站点表加载完成 | 站点数: {}", registry.len());
        Ok(registry)
    }

    /// 读取本地 JSON 站点表
    pub fn from_file(path: impl AsRef<Path>, strict: bool) -> SmResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SmartMenuError::RegistryLoadError(format!("读取站点表[{}]失败: {}", path.display(), e))
        })?;
        Self::from_json_str(&json, strict)
    }

    fn push(&mut self, site: Site, strict: bool) -> SmResult<()> {
        if self.by_name.contains_key(&site.name) {
            let message = format!("站点名称重复: {}", site.name);
            if strict {
                return Err(SmartMenuError::RegistryLoadError(message));
            }
            warn!("[REGISTRY]{}，保留先声明者", message);
            return Ok(());
        }
        self.by_name.insert(site.name.clone(), self.sites.len());
        self.sites.push(site);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Site> {
        self.by_name.get(name).map(|&index| &self.sites[index])
    }

    /// 按名称查找，不存在时返回 UnknownSite
    pub fn require(&self, name: &str) -> SmResult<&Site> {
        self.get(name)
            .ok_or_else(|| SmartMenuError::UnknownSite(name.to_string()))
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// 与URL主机/路径前缀兼容的全部站点
    /// 排序：精确主机优先 → link 越具体越优先 → 声明顺序
    pub fn sites_for_url(&self, url: &Url) -> Vec<&Site> {
        let mut candidates: Vec<(usize, &Site)> = self
            .sites
            .iter()
            .enumerate()
            .filter(|(_, site)| site.link.strip(url).is_some())
            .collect();

        candidates.sort_by(|(ia, a), (ib, b)| {
            let (exact_a, len_a) = a.link.specificity(url);
            let (exact_b, len_b) = b.link.specificity(url);
            exact_b
                .cmp(&exact_a)
                .then(len_b.cmp(&len_a))
                .then(ia.cmp(ib))
        });
        candidates.into_iter().map(|(_, site)| site).collect()
    }
}
