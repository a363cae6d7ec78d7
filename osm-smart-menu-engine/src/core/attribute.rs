use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::CoreError;

/// 可提取属性枚举（封闭词表）
/// 声明顺序即排序顺序，AttributeSet 按此顺序遍历
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    NodeId,
    WayId,
    RelationId,
    UserId,
    UserName,
    ChangesetId,
    Zoom,
    Lat,
    Lon,
    TracesId,
    Key,
    Value,
}

impl AttributeKind {
    /// 全部属性，按声明顺序
    pub const ALL: [AttributeKind; 12] = [
        AttributeKind::NodeId,
        AttributeKind::WayId,
        AttributeKind::RelationId,
        AttributeKind::UserId,
        AttributeKind::UserName,
        AttributeKind::ChangesetId,
        AttributeKind::Zoom,
        AttributeKind::Lat,
        AttributeKind::Lon,
        AttributeKind::TracesId,
        AttributeKind::Key,
        AttributeKind::Value,
    ];

    /// 模板占位符/配置文件中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::NodeId => "nodeId",
            AttributeKind::WayId => "wayId",
            AttributeKind::RelationId => "relationId",
            AttributeKind::UserId => "userId",
            AttributeKind::UserName => "userName",
            AttributeKind::ChangesetId => "changesetId",
            AttributeKind::Zoom => "zoom",
            AttributeKind::Lat => "lat",
            AttributeKind::Lon => "lon",
            AttributeKind::TracesId => "tracesId",
            AttributeKind::Key => "key",
            AttributeKind::Value => "value",
        }
    }

    /// 是否为数值型坐标属性（lat/lon/zoom）
    #[inline(always)]
    pub fn is_coordinate(&self) -> bool {
        matches!(self, AttributeKind::Zoom | AttributeKind::Lat | AttributeKind::Lon)
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownAttribute(s.to_string()))
    }
}

/// 稀疏属性集合：属性 → 文本值
/// 缺失即未知，不存在“空字符串”语义；数值同样以文本保存，保留原始精度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<AttributeKind, String>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// 写入属性，返回旧值
    pub fn insert(&mut self, kind: AttributeKind, value: impl Into<String>) -> Option<String> {
        self.0.insert(kind, value.into())
    }

    pub fn remove(&mut self, kind: AttributeKind) -> Option<String> {
        self.0.remove(&kind)
    }

    #[inline(always)]
    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        self.0.keys().copied()
    }

    /// 仅补齐当前集合缺失的属性，已有值保持不变
    /// 返回：实际补入的属性数量
    pub fn merge_missing(&mut self, other: &AttributeSet) -> usize {
        let mut added = 0;
        for (kind, value) in other.iter() {
            if !self.contains(kind) {
                self.0.insert(kind, value.to_string());
                added += 1;
            }
        }
        added
    }
}

impl<V: Into<String>> FromIterator<(AttributeKind, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (AttributeKind, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<String>, const N: usize> From<[(AttributeKind, V); N]> for AttributeSet {
    fn from(pairs: [(AttributeKind, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for AttributeSet {
    type Item = (AttributeKind, String);
    type IntoIter = std::collections::btree_map::IntoIter<AttributeKind, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_name_round_trip() {
        for kind in AttributeKind::ALL {
            assert_eq!(kind.as_str().parse::<AttributeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_attribute_name() {
        let err = "latitude".parse::<AttributeKind>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownAttribute(name) if name == "latitude"));
    }

    #[test]
    fn test_serde_names_match_placeholder_names() {
        let json = serde_json::to_string(&AttributeKind::TracesId).unwrap();
        assert_eq!(json, "\"tracesId\"");
        let kind: AttributeKind = serde_json::from_str("\"changesetId\"").unwrap();
        assert_eq!(kind, AttributeKind::ChangesetId);
    }

    #[test]
    fn test_merge_missing_keeps_existing_values() {
        let mut base = AttributeSet::from([(AttributeKind::Lat, "1.5"), (AttributeKind::Zoom, "12")]);
        let extra = AttributeSet::from([
            (AttributeKind::Lat, "9.9"),
            (AttributeKind::Lon, "-3.25"),
        ]);

        let added = base.merge_missing(&extra);
        assert_eq!(added, 1);
        assert_eq!(base.get(AttributeKind::Lat), Some("1.5"));
        assert_eq!(base.get(AttributeKind::Lon), Some("-3.25"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_attribute_set_json_shape() {
        let set = AttributeSet::from([(AttributeKind::WayId, "263290462"), (AttributeKind::Zoom, "17")]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({"wayId": "263290462", "zoom": "17"}));
    }
}
