use chart_option_path::{
    field_path, parse_pointer, read, remove_instance, write, RepeatableField, SubtreeSchema,
};
use serde_json::json;

fn axis_schema() -> SubtreeSchema {
    SubtreeSchema::new()
        .bool("show", true)
        .enumeration("position", ["left", "right"])
        .text("name", "")
        .number("offset", 0.0)
}

#[test]
fn selecting_index_past_end_reads_defaults_without_writing() {
    let doc = json!({"yAxis": [{"name": "Revenue", "position": "right"}]});
    let before = doc.clone();

    let axes = RepeatableField::new(&doc, field_path!["yAxis"]);
    assert_eq!(axes.available_count(), 1);
    assert_eq!(axes.view(2, &axis_schema()), axis_schema().defaults_view());
    assert_eq!(doc, before);
}

#[test]
fn first_write_to_new_instance_pads_the_array() {
    let doc = json!({"yAxis": [{"name": "Revenue"}]});
    let axes = RepeatableField::new(&doc, field_path!["yAxis"]);
    let path = axes.instance_path(2).key("name");

    let next = write(&doc, &path, json!("Margin"));
    assert_eq!(
        next,
        json!({"yAxis": [{"name": "Revenue"}, {}, {"name": "Margin"}]})
    );
    let axes = RepeatableField::new(&next, field_path!["yAxis"]);
    assert_eq!(axes.available_count(), 3);
    assert_eq!(axes.view(1, &axis_schema()), axis_schema().defaults_view());
    assert_eq!(axes.view(2, &axis_schema()).str("name"), Some("Margin"));
}

#[test]
fn bare_object_stays_bare_for_index_zero_panels() {
    let doc = json!({"xAxis": {"type": "category", "name": "Day"}});
    let axes = RepeatableField::new(&doc, field_path!["xAxis"]);
    let next = write(&doc, &axes.instance_path(0).key("name"), json!("Week"));
    assert_eq!(next, json!({"xAxis": {"type": "category", "name": "Week"}}));
}

#[test]
fn bare_object_is_promoted_on_second_instance() {
    let doc = json!({"xAxis": {"type": "category"}});
    let axes = RepeatableField::new(&doc, field_path!["xAxis"]);
    let next = write(&doc, &axes.instance_path(1).key("type"), json!("value"));
    assert_eq!(
        next,
        json!({"xAxis": [{"type": "category"}, {"type": "value"}]})
    );
}

#[test]
fn nested_reads_go_through_singleton_fields() {
    let doc = json!({"xAxis": {"axisLine": {"lineStyle": {"color": "#ccc"}}}});
    let schema = SubtreeSchema::new().color("color", "#6E7079").number("width", 1.0);
    let path = parse_pointer("/xAxis/0/axisLine/lineStyle").unwrap();
    let view = read(&doc, &path, &schema);
    assert_eq!(view.str("color"), Some("#ccc"));
    assert_eq!(view.f64("width"), Some(1.0));
}

#[test]
fn removing_instances() {
    let doc = json!({"grid": [{"left": 1}, {"left": 2}]});
    let next = remove_instance(&doc, &field_path!["grid"], 0);
    assert_eq!(next, json!({"grid": [{"left": 2}]}));
    let grids = RepeatableField::new(&next, field_path!["grid"]);
    assert_eq!(grids.available_count(), 1);
}
