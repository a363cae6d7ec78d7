//! osm-smart-menu-engine 内核错误定义
//! 内核层只产生配置期错误（模板语法/属性名/正则编译），匹配与生成的失败以显式返回值表达
use thiserror::Error;

use regex::Error as RegexError;

use crate::core::AttributeKind;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 模板相关错误 =====================
    /// 模板语法错误（未闭合的花括号、相邻占位符等）
    #[error("Pattern syntax error in `{pattern}`: {reason}")]
    PatternSyntax { pattern: String, reason: String },

    /// 占位符/无序键引用了未知的属性名
    #[error("Unknown attribute `{0}`")]
    UnknownAttribute(String),

    /// 同一模板内属性重复出现（有序占位符与无序键共用一个属性同样算重复）
    #[error("Attribute `{attribute}` used more than once in pattern `{pattern}`")]
    DuplicateAttribute {
        attribute: AttributeKind,
        pattern: String,
    },

    // ===================== 编译相关错误 =====================
    /// 模板转换出的正则编译失败
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // ===================== 基础错误 =====================
    /// 无效输入参数
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub(crate) fn syntax(pattern: &str, reason: impl Into<String>) -> Self {
        CoreError::PatternSyntax {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
