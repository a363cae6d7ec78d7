//! 内置站点表：编译期嵌入，首次访问时解析一次
use std::sync::Arc;

use log::error;
use once_cell::sync::Lazy;

use super::site_registry::SiteRegistry;

/// 内置站点表原文
pub static EMBEDDED_SITES_JSON: &str = include_str!("../../data/sites.json");

/// 全局懒加载的内置注册表 - 进程内仅一份实例
/// 解析失败只会出现在站点表本身损坏时，记录错误后退化为空表
pub static EMBEDDED_REGISTRY: Lazy<Arc<SiteRegistry>> = Lazy::new(|| {
    let registry = SiteRegistry::from_json_str(EMBEDDED_SITES_JSON, false).unwrap_or_else(|e| {
        error!("[REGISTRY]内置站点表解析失败: {}", e);
        SiteRegistry::default()
    });
    Arc::new(registry)
});

impl SiteRegistry {
    /// 内置站点表（共享实例）
    pub fn embedded() -> Arc<SiteRegistry> {
        Arc::clone(&EMBEDDED_REGISTRY)
    }
}
