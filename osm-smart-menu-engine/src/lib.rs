//! osm-smart-menu-engine：地图站点URL模板内核
//! 属性模型 + 模板编译 + 模板级匹配/生成，不含任何I/O

// 核心公共结构体+枚举
pub mod core;
// 模板编译与匹配/生成
pub mod compiler;
// 内核错误
pub mod error;
// 日志预览、缩放钳制等工具
pub mod utils;

// 顶层导出常用类型
pub use crate::core::{AttributeKind, AttributeSet, PatternDef, UnorderedKey, UrlParts};
pub use compiler::{CompiledPattern, CompiledPatternList, Component, Rendered};
pub use error::{CoreError, CoreResult};
pub use utils::{clamp_zoom, log_preview};

/// 单条模板的便捷编译入口
pub fn compile(def: &PatternDef) -> CoreResult<CompiledPattern> {
    CompiledPattern::compile(def)
}
