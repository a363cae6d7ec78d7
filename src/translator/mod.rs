//! 翻译器模块
pub mod global;
#[allow(clippy::module_inception)]
pub mod translator;

pub use global::{global_translator, init_global_translator, menu_links, translate_url};
pub use translator::{MenuLink, Recognized, Translator};
