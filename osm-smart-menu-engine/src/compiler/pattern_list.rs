use log::debug;

use super::compiled::CompiledPattern;
use crate::core::{AttributeSet, PatternDef, UrlParts};
use crate::error::CoreResult;
use crate::utils::preview::log_preview;

/// 单个站点的有序候选模板列表
/// 声明顺序即优先级：识别与生成都按顺序短路，不做打分
#[derive(Debug, Clone, Default)]
pub struct CompiledPatternList {
    patterns: Vec<CompiledPattern>,
}

/// 生成结果：选中的模板序号 + 相对URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub pattern_index: usize,
    pub relative_url: String,
}

impl CompiledPatternList {
    /// 编译整组模板，任一失败即整组失败（由上层决定跳过该站点）
    pub fn compile(defs: &[PatternDef]) -> CoreResult<Self> {
        let patterns = defs
            .iter()
            .map(CompiledPattern::compile)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CompiledPattern> {
        self.patterns.get(index)
    }

    /// 首个结构匹配的模板胜出
    /// 返回：(模板序号, 属性集合) | None
    pub fn match_first(&self, parts: &UrlParts<'_>) -> Option<(usize, AttributeSet)> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            if let Some(attributes) = pattern.match_parts(parts) {
                debug!(
                    "[MATCH]命中模板 #{} | 模板: {} | 输入: {} | 属性: {:?}",
                    index,
                    pattern.describe(),
                    log_preview(parts.path, 80),
                    attributes
                );
                return Some((index, attributes));
            }
        }
        None
    }

    /// 选择生成模板
    /// 1. 有序占位符全部存在才可选，无序属性从不阻塞
    /// 2. 优先选首个会用到至少一个输入属性的模板
    /// 3. 都用不到时退回首个可满足模板（如仅主页的兜底模板）
    pub fn select_for(&self, attributes: &AttributeSet) -> Option<(usize, &CompiledPattern)> {
        let mut fallback: Option<(usize, &CompiledPattern)> = None;
        for (index, pattern) in self.patterns.iter().enumerate() {
            if !pattern.is_satisfiable(attributes) {
                continue;
            }
            if pattern.uses_any(attributes) {
                return Some((index, pattern));
            }
            if fallback.is_none() {
                fallback = Some((index, pattern));
            }
        }
        fallback
    }

    /// 选择模板并渲染
    pub fn render(&self, attributes: &AttributeSet) -> Option<Rendered> {
        let (pattern_index, pattern) = self.select_for(attributes)?;
        let relative_url = pattern.render(attributes)?;
        debug!(
            "[GENERATE]选中模板 #{} | 模板: {} | 输出: {}",
            pattern_index,
            pattern.describe(),
            relative_url
        );
        Some(Rendered {
            pattern_index,
            relative_url,
        })
    }
}
