mod attribute;
mod pattern;
mod url_parts;

// 导出常用项
pub use attribute::{AttributeKind, AttributeSet};
pub use pattern::{PatternDef, UnorderedKey};
pub use url_parts::UrlParts;
