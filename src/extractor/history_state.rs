use osm_smart_menu_engine::{AttributeKind, AttributeSet};
use serde_json::Value;

/// 解析 Bing 地图写入 history.state 的地图状态
/// Firefox 下状态可能包在 wrappedJSObject 里；level 与中心点坐标都必须是数值
pub fn bing_map_state(state: &Value) -> Option<AttributeSet> {
    let state = state.get("wrappedJSObject").unwrap_or(state);
    let history = state.pointer("/state/MapModeStateHistory")?;

    let level = history.get("level").filter(|v| v.is_number())?;
    let latitude = history.pointer("/centerPoint/latitude").filter(|v| v.is_number())?;
    let longitude = history.pointer("/centerPoint/longitude").filter(|v| v.is_number())?;

    Some(AttributeSet::from([
        (AttributeKind::Lat, latitude.to_string()),
        (AttributeKind::Lon, longitude.to_string()),
        (AttributeKind::Zoom, level.to_string()),
    ]))
}
