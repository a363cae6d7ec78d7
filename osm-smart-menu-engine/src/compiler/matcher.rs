use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use super::template::{Component, ComponentTemplate, Segment};
use crate::core::{AttributeKind, AttributeSet};
use crate::error::CoreResult;

/// path 内占位符值的转义集合
const PATH_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// query/fragment 内占位符值的转义集合
const PAIR_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// 组件级匹配器
/// 字面量逐字节匹配，占位符捕获到下一个字面量边界为止，整体锚定到组件首尾
#[derive(Debug, Clone)]
pub struct ComponentMatcher {
    pub template: ComponentTemplate,
    regex: Regex,
    /// 捕获组序号 - 1 → 属性
    captures: Vec<AttributeKind>,
}

impl ComponentMatcher {
    pub fn compile(template: ComponentTemplate) -> CoreResult<Self> {
        let mut source = String::with_capacity(64);
        let mut captures = Vec::new();
        source.push('^');

        for (idx, segment) in template.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(text)),
                Segment::Placeholder(kind) => {
                    let next_literal = next_literal(&template.segments, idx);
                    source.push_str(&placeholder_group(template.component, next_literal));
                    captures.push(*kind);
                }
            }
        }

        // path 必须完整消费；query/fragment 允许尾随额外的 &key=value
        match template.component {
            Component::Path => source.push('$'),
            Component::Query | Component::Fragment => source.push_str("(?:&.*)?$"),
        }

        let regex = Regex::new(&source)?;
        Ok(Self {
            template,
            regex,
            captures,
        })
    }

    #[inline(always)]
    pub fn component(&self) -> Component {
        self.template.component
    }

    /// 匹配组件文本，成功时把捕获（已百分号解码）写入 out
    /// 返回：是否匹配
    pub fn capture_into(&self, input: &str, out: &mut AttributeSet) -> bool {
        let Some(caps) = self.regex.captures(input) else {
            return false;
        };
        for (group, kind) in self.captures.iter().enumerate() {
            if let Some(value) = caps.get(group + 1) {
                out.insert(*kind, decode_value(value.as_str()));
            }
        }
        true
    }

    /// 用属性集合渲染组件文本；任一占位符缺失返回 None
    /// 占位符值按组件转义，紧随其后的字面量首字符也一并转义，保证渲染结果能被同一模板匹配回来
    pub fn render(&self, attributes: &AttributeSet) -> Option<String> {
        let mut rendered = String::with_capacity(64);
        for (idx, segment) in self.template.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(kind) => {
                    let value = attributes.get(*kind)?;
                    let boundary = next_literal(&self.template.segments, idx);
                    rendered.push_str(&encode_value(self.component(), value, boundary));
                }
            }
        }
        Some(rendered)
    }

    /// 规则描述（日志用）
    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }
}

fn next_literal(segments: &[Segment], idx: usize) -> Option<char> {
    segments.get(idx + 1).and_then(|next| match next {
        Segment::Literal(text) => text.chars().next(),
        Segment::Placeholder(_) => None,
    })
}

fn encode_value(component: Component, value: &str, boundary: Option<char>) -> String {
    let set = match component {
        Component::Path => PATH_VALUE,
        Component::Query | Component::Fragment => PAIR_VALUE,
    };
    let encoded = utf8_percent_encode(value, set).to_string();
    match boundary {
        Some(ch) if ch.is_ascii() && encoded.contains(ch) => {
            encoded.replace(ch, &format!("%{:02X}", ch as u32))
        }
        _ => encoded,
    }
}

/// 非法 UTF-8 序列保留原文
fn decode_value(raw: &str) -> Cow<'_, str> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}

/// 占位符捕获组：排除下一个字面量首字符与组件分隔符
fn placeholder_group(component: Component, next_literal: Option<char>) -> String {
    let mut excluded: Vec<char> = vec!['?', '#'];
    match component {
        Component::Path => excluded.push('/'),
        Component::Query | Component::Fragment => excluded.push('&'),
    }
    if let Some(ch) = next_literal {
        if !excluded.contains(&ch) {
            excluded.push(ch);
        }
    }

    let class: String = excluded
        .iter()
        .map(|ch| regex::escape(&ch.to_string()))
        .collect();
    format!("([^{}]+)", class)
}
