//! Built-in schemas for the common option panels.
//!
//! Defaults follow the rendering engine's documented defaults.

use chart_option_path::SubtreeSchema;
use serde_json::json;

pub const PRESET_NAMES: [&str; 7] = [
    "title",
    "legend",
    "axisLine",
    "splitLine",
    "lineStyle",
    "grid",
    "tooltip",
];

pub fn text_style() -> SubtreeSchema {
    SubtreeSchema::new()
        .color("color", "#333")
        .enumeration("fontStyle", ["normal", "italic", "oblique"])
        .enumeration("fontWeight", ["normal", "bold", "bolder", "lighter"])
        .text("fontFamily", "sans-serif")
        .number_in("fontSize", 12.0, 1.0, 200.0)
}

pub fn title() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .text("text", "")
        .text("subtext", "")
        .enumeration("textAlign", ["auto", "left", "right", "center"])
        .number_or_percent("left", json!("auto"))
        .number_or_percent("top", json!("auto"))
        .number("itemGap", 10.0)
        .nested("textStyle", &text_style())
}

pub fn legend() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .enumeration("type", ["plain", "scroll"])
        .enumeration("orient", ["horizontal", "vertical"])
        .number_or_percent("left", json!("auto"))
        .number_or_percent("top", json!("auto"))
        .number("itemGap", 10.0)
        .number("itemWidth", 25.0)
        .number("itemHeight", 14.0)
        .enumeration("selectedMode", ["multiple", "single"])
}

pub fn line_style() -> SubtreeSchema {
    SubtreeSchema::new()
        .color("color", "#6E7079")
        .number_in("width", 1.0, 0.0, 100.0)
        .enumeration("type", ["solid", "dashed", "dotted"])
        .number_in("opacity", 1.0, 0.0, 1.0)
}

pub fn axis_line() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .bool("onZero", true)
        .nested("lineStyle", &line_style())
}

pub fn split_line() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .number("interval", 0.0)
        .nested(
            "lineStyle",
            &line_style().color("color", "#E0E6F1"),
        )
}

pub fn grid() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", false)
        .number_or_percent("left", json!("10%"))
        .number_or_percent("top", json!(60))
        .number_or_percent("right", json!("10%"))
        .number_or_percent("bottom", json!(60))
        .bool("containLabel", false)
        .color("backgroundColor", "transparent")
        .color("borderColor", "#ccc")
        .number("borderWidth", 1.0)
}

pub fn tooltip() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .enumeration("trigger", ["item", "axis", "none"])
        .enumeration("triggerOn", ["mousemove|click", "mousemove", "click", "none"])
        .number("showDelay", 0.0)
        .number("hideDelay", 100.0)
        .bool("confine", false)
        .color("backgroundColor", "#fff")
        .color("borderColor", "#333")
        .number("borderWidth", 0.0)
}

/// Look up a preset by its option key.
pub fn preset(name: &str) -> Option<SubtreeSchema> {
    let schema = match name {
        "title" => title(),
        "legend" => legend(),
        "axisLine" | "axis-line" => axis_line(),
        "splitLine" | "split-line" => split_line(),
        "lineStyle" | "line-style" => line_style(),
        "grid" => grid(),
        "tooltip" => tooltip(),
        "textStyle" | "text-style" => text_style(),
        _ => return None,
    };
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_option_path::{field_path, read};

    #[test]
    fn test_every_listed_preset_resolves() {
        for name in PRESET_NAMES {
            assert!(preset(name).is_some(), "{name}");
        }
        assert!(preset("series").is_none());
    }

    #[test]
    fn test_legend_view_defaults_and_overrides() {
        let doc = json!({"legend": {"orient": "vertical", "itemGap": "wide"}});
        let view = read(&doc, &field_path!["legend"], &legend());
        assert_eq!(view.str("orient"), Some("vertical"));
        assert_eq!(view.f64("itemGap"), Some(10.0));
        assert_eq!(view.bool("show"), Some(true));
    }

    #[test]
    fn test_split_line_overrides_nested_color() {
        let view = split_line().defaults_view();
        assert_eq!(view.get("lineStyle")["color"], json!("#E0E6F1"));
    }

    #[test]
    fn test_grid_percent_offsets() {
        let doc = json!({"grid": [{"left": "5%"}, {"left": "bogus"}]});
        assert_eq!(
            read(&doc, &field_path!["grid", 0], &grid()).get("left"),
            &json!("5%")
        );
        assert_eq!(
            read(&doc, &field_path!["grid", 1], &grid()).get("left"),
            &json!("10%")
        );
    }
}
