//! Terminal rendering for the resource table and navigation column.
//!
//! Pure string builders: the console owns state, this module only formats.
//! Column visibility and widths come from the persisted table preferences.

use serde_json::Value;

use crate::schema::{FieldDescriptor, FieldKind, ResourceConfig};
use crate::settings::{Settings, TableSettings};

/// Display text for one table cell.
pub fn cell_text(field: &FieldDescriptor, value: &Value) -> String {
    match field.kind {
        FieldKind::Checkbox => {
            if value.as_bool().unwrap_or(false) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        FieldKind::Text
        | FieldKind::Number
        | FieldKind::Textarea
        | FieldKind::Select
        | FieldKind::File
        | FieldKind::Array
        | FieldKind::Relation
        | FieldKind::MultiSelect => match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        },
    }
}

/// Render the item list honoring the visible-column set and widths.
pub fn render_table(resource: &ResourceConfig, prefs: &TableSettings, items: &[Value]) -> String {
    let visible: Vec<&FieldDescriptor> = resource
        .fields
        .iter()
        .filter(|field| prefs.is_visible(field.name))
        .collect();

    if visible.is_empty() {
        return "All columns hidden.\n".to_string();
    }

    let mut out = String::new();
    let mut header = Vec::with_capacity(visible.len());
    for field in &visible {
        header.push(pad(field.label, prefs.width(field.name)));
    }
    out.push_str(&header.join("  "));
    out.push('\n');

    let rule_len: usize = visible
        .iter()
        .map(|f| prefs.width(f.name) as usize + 2)
        .sum::<usize>()
        .saturating_sub(2);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    if items.is_empty() {
        out.push_str("No entries yet.\n");
        return out;
    }

    for item in items {
        let mut row = Vec::with_capacity(visible.len());
        for field in &visible {
            let value = item.get(field.name).unwrap_or(&Value::Null);
            row.push(pad(&cell_text(field, value), prefs.width(field.name)));
        }
        out.push_str(&row.join("  "));
        out.push('\n');
    }
    out
}

/// Render the resource navigation column.
pub fn render_nav(
    resources: &[ResourceConfig],
    active_key: &str,
    settings: &Settings,
) -> String {
    let width = settings.sidebar_width;
    let user = settings.admin_user.as_deref().unwrap_or("Admin");

    let mut out = String::new();
    out.push_str(&pad(&format!("[{}] {}", initials(user), user), width));
    out.push('\n');
    out.push_str(&"-".repeat(width as usize));
    out.push('\n');
    for resource in resources {
        let marker = if resource.key == active_key { ">" } else { " " };
        let label = if settings.sidebar_compact {
            resource.key.to_string()
        } else {
            format!("{} ({})", resource.title, resource.key)
        };
        out.push_str(&pad(&format!("{marker} {label}"), width));
        out.push('\n');
    }
    out
}

/// Initials for the user badge: first letters of the first and last word,
/// or the first two letters of a single word.
pub fn initials(label: &str) -> String {
    let parts: Vec<&str> = label.split_whitespace().collect();
    match parts.as_slice() {
        [] => "A".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let mut out = String::new();
            out.extend(first.chars().next());
            out.extend(last.chars().next());
            out.to_uppercase()
        }
    }
}

fn pad(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut clipped: String = text.chars().take(width).collect();
    if text.chars().count() > width && width > 0 {
        clipped.pop();
        clipped.push('…');
    }
    format!("{clipped:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::resource_by_key;
    use serde_json::json;

    #[test]
    fn test_cell_text_flags_render_yes_no() {
        let experience = resource_by_key("experience").unwrap();
        let field = experience.field("is_current").unwrap();
        assert_eq!(cell_text(field, &json!(true)), "Yes");
        assert_eq!(cell_text(field, &json!(false)), "No");
        assert_eq!(cell_text(field, &Value::Null), "No");
    }

    #[test]
    fn test_cell_text_joins_arrays() {
        let projects = resource_by_key("projects").unwrap();
        let field = projects.field("technologies").unwrap();
        assert_eq!(cell_text(field, &json!([1, 2, 3])), "1, 2, 3");
    }

    #[test]
    fn test_hidden_columns_stay_out() {
        let projects = resource_by_key("projects").unwrap();
        let mut prefs = TableSettings::default();
        prefs.set_visible("description", false);
        let rendered = render_table(projects, &prefs, &[json!({"id": 1, "title": "Folio"})]);
        assert!(rendered.contains("Title"));
        assert!(!rendered.contains("Description"));
        assert!(rendered.contains("Folio"));
    }

    #[test]
    fn test_empty_list_message() {
        let projects = resource_by_key("projects").unwrap();
        let rendered = render_table(projects, &TableSettings::default(), &[]);
        assert!(rendered.contains("No entries yet."));
    }

    #[test]
    fn test_long_cells_clip_to_width() {
        let technologies = resource_by_key("technologies").unwrap();
        let mut prefs = TableSettings::default();
        prefs.set_width("name", 12);
        let rendered = render_table(
            technologies,
            &prefs,
            &[json!({"id": 1, "name": "an unreasonably long technology name"})],
        );
        assert!(rendered.contains("an unreason…"));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("admin"), "AD");
        assert_eq!(initials(""), "A");
        assert_eq!(initials("Ada King Lovelace"), "AL");
    }
}
