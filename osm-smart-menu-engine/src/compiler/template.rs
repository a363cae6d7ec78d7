//! 有序骨架词法拆分
//! 将 `/way/{wayId}#map={zoom}/{lat}/{lon}` 拆成 path / query / fragment 三个组件，
//! 每个组件内部是字面量与占位符交替出现的片段序列

use std::fmt::{Display, Formatter};

use crate::core::AttributeKind;
use crate::error::{CoreError, CoreResult};

/// URL 组件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Path,
    Query,
    Fragment,
}

impl Component {
    /// 组件前导分隔符（path 无）
    pub fn delimiter(&self) -> Option<char> {
        match self {
            Component::Path => None,
            Component::Query => Some('?'),
            Component::Fragment => Some('#'),
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Path => write!(f, "path"),
            Component::Query => write!(f, "query"),
            Component::Fragment => write!(f, "fragment"),
        }
    }
}

/// 骨架片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(AttributeKind),
}

/// 单个组件的片段序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTemplate {
    pub component: Component,
    pub segments: Vec<Segment>,
}

impl ComponentTemplate {
    fn new(component: Component) -> Self {
        Self {
            component,
            segments: Vec::new(),
        }
    }

    /// 追加字面量字符，与前一个字面量片段合并
    fn push_char(&mut self, ch: char) {
        match self.segments.last_mut() {
            Some(Segment::Literal(text)) => text.push(ch),
            _ => self.segments.push(Segment::Literal(ch.to_string())),
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(kind) => Some(*kind),
            Segment::Literal(_) => None,
        })
    }
}

/// 拆分有序骨架
/// 规则：
/// 1. `{name}` 为占位符，name 必须是已知属性名
/// 2. 字面量中首个 `?` 开启 query 组件，首个 `#` 开启 fragment 组件（`#` 之后的 `?` 仍属 fragment）
/// 3. 同一组件内两个占位符之间必须有字面量，否则捕获边界不确定
pub fn parse_ordered(ordered: &str) -> CoreResult<Vec<ComponentTemplate>> {
    let mut finished: Vec<ComponentTemplate> = Vec::with_capacity(3);
    let mut current = ComponentTemplate::new(Component::Path);
    let mut chars = ordered.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(CoreError::syntax(ordered, "nested `{` inside placeholder")),
                        other => name.push(other),
                    }
                }
                if !closed {
                    return Err(CoreError::syntax(ordered, "unclosed `{`"));
                }
                if name.trim().is_empty() {
                    return Err(CoreError::syntax(ordered, "empty placeholder `{}`"));
                }
                let kind: AttributeKind = name.trim().parse()?;

                if matches!(current.segments.last(), Some(Segment::Placeholder(_))) {
                    return Err(CoreError::syntax(
                        ordered,
                        format!("placeholder `{{{}}}` directly follows another placeholder", kind),
                    ));
                }
                current.segments.push(Segment::Placeholder(kind));
            }
            '}' => return Err(CoreError::syntax(ordered, "unmatched `}`")),
            '?' if current.component == Component::Path => {
                let next = ComponentTemplate::new(Component::Query);
                finished.push(std::mem::replace(&mut current, next));
            }
            '#' if current.component != Component::Fragment => {
                let next = ComponentTemplate::new(Component::Fragment);
                finished.push(std::mem::replace(&mut current, next));
            }
            other => current.push_char(other),
        }
    }
    finished.push(current);

    // 空 path 视为站点根路径
    if finished[0].segments.is_empty() {
        finished[0].push_char('/');
    }

    Ok(finished)
}
