//! 全局翻译器单例管理
//! 进程生命周期内唯一的 Translator 实例，幂等初始化 + 懒加载

use once_cell::sync::OnceCell;

use super::translator::{MenuLink, Translator};
use crate::config::TranslatorConfig;
use crate::error::{SmResult, SmartMenuError};

static GLOBAL_TRANSLATOR: OnceCell<Translator> = OnceCell::new();

/// 初始化全局翻译器
/// 已初始化则直接返回 Ok(())，配置不会被替换
pub fn init_global_translator(config: TranslatorConfig) -> SmResult<()> {
    if GLOBAL_TRANSLATOR.get().is_some() {
        log::debug!("Global translator already initialized, skip reinitialization");
        return Ok(());
    }

    let translator = Translator::new(config).map_err(|e| {
        SmartMenuError::TranslatorInitError(format!("Failed to create Translator instance: {}", e))
    })?;

    // 并发初始化时由先到者胜出，后到者视为已初始化
    if GLOBAL_TRANSLATOR.set(translator).is_err() {
        log::debug!("Global translator initialized concurrently by another thread");
        return Ok(());
    }

    log::info!("Global Translator initialized successfully");
    Ok(())
}

/// 获取全局翻译器（未初始化时使用默认配置懒加载）
pub fn global_translator() -> SmResult<&'static Translator> {
    GLOBAL_TRANSLATOR.get_or_try_init(|| {
        log::debug!("Lazy initializing global Translator with default config");
        Translator::new(TranslatorConfig::default()).map_err(|e| {
            SmartMenuError::TranslatorInitError(format!("Failed to create Translator instance: {}", e))
        })
    })
}

/// 便捷接口：使用全局翻译器做跨站翻译
pub fn translate_url(url: &str, target: &str) -> SmResult<String> {
    global_translator()?.translate(url, target)
}

/// 便捷接口：使用全局翻译器生成当前URL的“所有站点”菜单
pub fn menu_links(url: &str) -> SmResult<Vec<MenuLink>> {
    global_translator()?.links_for_url(url, None)
}
