//! Widget description passed to approver callbacks.

use serde::{Deserialize, Serialize};

/// A description of an embedded widget, as handed to approver callbacks.
///
/// Created by the host per widget instantiation; approvers only read it.
/// Contains the information needed to make approval decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    /// The unique identifier of the widget.
    pub id: String,
    /// The template URL of the widget. May contain placeholder tokens
    /// (e.g. `$matrix_*` variables) that the host substitutes at render
    /// time; these commonly live in the query string.
    pub template_url: String,
    /// The user ID of the user who created the widget.
    pub creator_user_id: String,
    /// The widget type tag, e.g. `m.custom`, `m.jitsi`, `m.stickerpicker`.
    #[serde(rename = "type")]
    pub widget_type: String,
    /// The origin of the widget URL.
    pub origin: String,
    /// The room the widget belongs to, if it is a room widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_type_serializes_as_type() {
        let widget = WidgetDescriptor {
            id: "w1".into(),
            template_url: "https://widgets.example.com/clock".into(),
            creator_user_id: "@alice:example.com".into(),
            widget_type: "m.custom".into(),
            origin: "https://widgets.example.com".into(),
            room_id: None,
        };
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["type"], "m.custom");
        assert!(json.get("room_id").is_none());

        let parsed: WidgetDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, widget);
    }
}
