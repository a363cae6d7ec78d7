//! 模板编译模块：声明式模板 → 匹配器/生成器
pub mod compiled;
pub mod matcher;
pub mod pattern_list;
pub mod template;

pub use compiled::CompiledPattern;
pub use matcher::ComponentMatcher;
pub use pattern_list::{CompiledPatternList, Rendered};
pub use template::{parse_ordered, Component, ComponentTemplate, Segment};
