use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::AttributeKind;

/// 无序组件的单个键映射：属性 → 外部键名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedKey {
    pub attribute: AttributeKind,
    pub key: String,
}

impl From<(AttributeKind, &str)> for UnorderedKey {
    fn from((attribute, key): (AttributeKind, &str)) -> Self {
        UnorderedKey {
            attribute,
            key: key.to_string(),
        }
    }
}

/// 单条声明式模板（一个站点的一个候选URL模板）
/// - ordered: 字面量骨架 + `{attr}` 占位符，覆盖 path / query / fragment 的位置结构
/// - unordered: 属性 → query/fragment 键名，顺序无关；声明顺序决定生成时的输出顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDef {
    pub ordered: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_unordered",
        deserialize_with = "deserialize_unordered"
    )]
    pub unordered: Vec<UnorderedKey>,
}

impl PatternDef {
    pub fn new(ordered: impl Into<String>) -> Self {
        Self {
            ordered: ordered.into(),
            unordered: Vec::new(),
        }
    }

    /// 链式追加无序键
    pub fn with_unordered(mut self, attribute: AttributeKind, key: impl Into<String>) -> Self {
        self.unordered.push(UnorderedKey {
            attribute,
            key: key.into(),
        });
        self
    }
}

fn serialize_unordered<S: Serializer>(keys: &[UnorderedKey], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(keys.len()))?;
    for entry in keys {
        map.serialize_entry(&entry.attribute, &entry.key)?;
    }
    map.end()
}

// JSON对象按出现顺序读取，保留声明顺序
fn deserialize_unordered<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<UnorderedKey>, D::Error> {
    struct OrderedPairs;

    impl<'de> Visitor<'de> for OrderedPairs {
        type Value = Vec<UnorderedKey>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of attribute name to query key")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut keys = Vec::with_capacity(access.size_hint().unwrap_or(4));
            while let Some((attribute, key)) = access.next_entry::<AttributeKind, String>()? {
                keys.push(UnorderedKey { attribute, key });
            }
            Ok(keys)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OrderedPairs)
}
