//! 站点注册表模块
//! 站点声明 → 编译 → 只读注册表（内置 / 本地文件）
pub mod embedded;
pub mod loader;
pub mod site;
pub mod site_registry;

pub use embedded::{EMBEDDED_REGISTRY, EMBEDDED_SITES_JSON};
pub use loader::RegistryLoader;
pub use site::{Site, SiteDefinition, SiteLink};
pub use site_registry::SiteRegistry;
