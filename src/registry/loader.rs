use std::sync::Arc;

use log::debug;

use super::site_registry::SiteRegistry;
use crate::config::{RegistryOrigin, TranslatorConfig};
use crate::error::SmResult;

/// 按配置来源加载站点注册表
#[derive(Debug, Default)]
pub struct RegistryLoader;

impl RegistryLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, config: &TranslatorConfig) -> SmResult<Arc<SiteRegistry>> {
        match &config.origin {
            RegistryOrigin::Embedded => {
                debug!("[REGISTRY]使用内置站点表");
                if config.options.strict {
                    // 严格模式需要重新校验，不能复用宽松解析的共享实例
                    return SiteRegistry::from_json_str(super::embedded::EMBEDDED_SITES_JSON, true)
                        .map(Arc::new);
                }
                Ok(SiteRegistry::embedded())
            }
            RegistryOrigin::LocalFile(path) => {
                debug!("[REGISTRY]读取本地站点表 | 路径: {}", path.display());
                SiteRegistry::from_file(path, config.options.strict).map(Arc::new)
            }
        }
    }
}
