//! HTML 元素提取器
//! 负责按 CSS 选择器从页面快照的 HTML 中读取首个匹配元素的属性或文本
use std::cell::{Cell, RefCell};

use lol_html::{element, text, HtmlRewriter, Selector, Settings};
use log::warn;
use osm_smart_menu_engine::log_preview;

/// 对外暴露的HTML提取器
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验选择器语法（配置加载期调用）
    pub fn validate_selector(selector: &str) -> Result<(), String> {
        selector
            .parse::<Selector>()
            .map(|_| ())
            .map_err(|e| format!("invalid CSS selector `{}`: {}", selector, e))
    }

    /// 首个匹配元素的属性值
    /// 首个匹配元素没有该属性时返回 None，不会继续向后查找（与 querySelector 语义一致）
    pub fn first_attribute(html: &str, selector: &str, attribute: &str) -> Option<String> {
        Self::validate_selector(selector).ok()?;

        let matched = Cell::new(false);
        let value: RefCell<Option<String>> = RefCell::new(None);

        let settings = Settings {
            element_content_handlers: vec![element!(selector, |el| {
                if !matched.replace(true) {
                    *value.borrow_mut() = el.get_attribute(attribute);
                }
                Ok(())
            })],
            ..Settings::default()
        };

        if !Self::run(settings, html) {
            return None;
        }
        value.into_inner()
    }

    /// 首个匹配元素的文本内容（含后代文本）
    pub fn first_text(html: &str, selector: &str) -> Option<String> {
        Self::validate_selector(selector).ok()?;

        let matched_count = Cell::new(0usize);
        let content = RefCell::new(String::new());

        let settings = Settings {
            element_content_handlers: vec![
                element!(selector, |_el| {
                    matched_count.set(matched_count.get() + 1);
                    Ok(())
                }),
                text!(selector, |chunk| {
                    // 仅累积第一个匹配元素内部的文本
                    if matched_count.get() == 1 {
                        content.borrow_mut().push_str(chunk.as_str());
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        };

        if !Self::run(settings, html) || matched_count.get() == 0 {
            return None;
        }
        Some(content.into_inner())
    }

    /// 只读遍历，输出丢弃
    fn run(settings: Settings<'_, '_>, html: &str) -> bool {
        let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
        let result = rewriter.write(html.as_bytes()).and_then(|_| rewriter.end());
        if let Err(e) = result {
            warn!(
                "[EXTRACT]HTML解析失败 | 错误: {} | 内容: {}",
                e,
                log_preview(html, 80)
            );
            return false;
        }
        true
    }
}
