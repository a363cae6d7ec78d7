use log::debug;

use crate::core::{AttributeKind, AttributeSet};

/// 按站点缩放上限钳制 zoom
/// zoom 以文本保存，仅在比较时临时解析为数值；无法解析的值原样保留
/// 返回：是否发生了钳制
pub fn clamp_zoom(attributes: &mut AttributeSet, max_zoom: u8) -> bool {
    let Some(raw) = attributes.get(AttributeKind::Zoom) else {
        return false;
    };
    // NaN/inf 也能被 f64 解析，同样按非数值处理
    let Some(zoom) = raw.trim().parse::<f64>().ok().filter(|z| z.is_finite()) else {
        debug!("[ZOOM]非数值缩放级别，跳过钳制: {}", raw);
        return false;
    };
    if zoom <= f64::from(max_zoom) {
        return false;
    }

    debug!("[ZOOM]缩放级别 {} 超出站点上限 {}，已钳制", raw, max_zoom);
    attributes.insert(AttributeKind::Zoom, max_zoom.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom_of(attrs: &AttributeSet) -> Option<&str> {
        attrs.get(AttributeKind::Zoom)
    }

    #[test]
    fn test_clamp_above_ceiling() {
        let mut attrs = AttributeSet::from([(AttributeKind::Zoom, "20")]);
        assert!(clamp_zoom(&mut attrs, 18));
        assert_eq!(zoom_of(&attrs), Some("18"));
    }

    #[test]
    fn test_keep_value_within_range_verbatim() {
        let mut attrs = AttributeSet::from([(AttributeKind::Zoom, "17.50")]);
        assert!(!clamp_zoom(&mut attrs, 18));
        assert_eq!(zoom_of(&attrs), Some("17.50"));

        let mut attrs = AttributeSet::from([(AttributeKind::Zoom, "18")]);
        assert!(!clamp_zoom(&mut attrs, 18));
        assert_eq!(zoom_of(&attrs), Some("18"));
    }

    #[test]
    fn test_fractional_overflow_clamped() {
        let mut attrs = AttributeSet::from([(AttributeKind::Zoom, "18.3")]);
        assert!(clamp_zoom(&mut attrs, 18));
        assert_eq!(zoom_of(&attrs), Some("18"));
    }

    #[test]
    fn test_non_numeric_and_missing_zoom_untouched() {
        let mut attrs = AttributeSet::from([(AttributeKind::Zoom, "far")]);
        assert!(!clamp_zoom(&mut attrs, 18));
        assert_eq!(zoom_of(&attrs), Some("far"));

        for raw in ["NaN", "inf", "-infinity"] {
            let mut attrs = AttributeSet::from([(AttributeKind::Zoom, raw)]);
            assert!(!clamp_zoom(&mut attrs, 18));
            assert_eq!(zoom_of(&attrs), Some(raw));
        }

        let mut empty = AttributeSet::new();
        assert!(!clamp_zoom(&mut empty, 18));
        assert!(empty.is_empty());
    }
}
