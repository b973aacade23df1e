//! # Markdown Field Reference
//!
//! Renders a registered schema as a human-readable Markdown document:
//! one section per record and per enumeration, in the order they are
//! first reached from the root record. Record sections list every field
//! with its wire name, type, whether it is required, its default and its
//! description.

use std::collections::{HashSet, VecDeque};

use crate::registry::SchemaEntry;
use crate::shape::{EnumShape, FieldShape, RecordShape, TypeShape};

/// Render the field reference of `entry`.
pub fn document_schema(entry: &SchemaEntry) -> String {
    let mut lines = vec![
        format!("# {}", entry.name),
        String::new(),
        format!(
            "Schema version `{}`, registered as `{}`.",
            entry.expected_version(),
            entry.version
        ),
    ];

    let mut queue = VecDeque::from([entry.shape()]);
    let mut seen: HashSet<&'static str> = HashSet::new();
    while let Some(shape) = queue.pop_front() {
        match shape {
            TypeShape::Record(record) => {
                if seen.insert(record.name) {
                    let fields = record.fields();
                    record_section(&mut lines, &record, &fields);
                    for field in fields {
                        if let Some(shape) = field.shape {
                            collect_named(shape, &mut queue);
                        }
                    }
                }
            }
            TypeShape::Enum(e) => {
                if seen.insert(e.name) {
                    enum_section(&mut lines, &e);
                }
            }
            other => collect_named(other, &mut queue),
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Queue every record and enumeration directly nested in `shape`.
fn collect_named(shape: TypeShape, queue: &mut VecDeque<TypeShape>) {
    match shape {
        TypeShape::Record(_) | TypeShape::Enum(_) => queue.push_back(shape),
        TypeShape::Sequence(inner) | TypeShape::Set(inner) => collect_named(*inner, queue),
        TypeShape::Map { key, value } => {
            collect_named(*key, queue);
            collect_named(*value, queue);
        }
        TypeShape::Tuple(items) => items.into_iter().for_each(|i| collect_named(i, queue)),
        TypeShape::Union(union) => union
            .members
            .into_iter()
            .for_each(|m| collect_named(m, queue)),
        TypeShape::Primitive(_) | TypeShape::Literal(_) | TypeShape::Opaque(_) => {}
    }
}

/// Blank line, heading and optional description shared by every section.
fn section_heading(lines: &mut Vec<String>, name: &str, description: &str) {
    lines.extend([String::new(), format!("## {name}")]);
    if !description.is_empty() {
        lines.extend([String::new(), description.to_string()]);
    }
    lines.push(String::new());
}

fn record_section(lines: &mut Vec<String>, record: &RecordShape, fields: &[FieldShape]) {
    section_heading(lines, record.name, record.description);
    lines.push("| Field | Type | Required | Default | Description |".to_string());
    lines.push("|-------|------|----------|---------|-------------|".to_string());
    lines.extend(fields.iter().map(field_row));
}

fn field_row(field: &FieldShape) -> String {
    let ty = field
        .shape
        .as_ref()
        .map(type_name)
        .unwrap_or_else(|| "unknown".to_string());
    let default = field
        .default
        .as_ref()
        .map(|d| format!("`{d}`"))
        .unwrap_or_default();
    format!(
        "| `{}` | {} | {} | {} | {} |",
        field.name,
        ty,
        if field.required { "yes" } else { "no" },
        escape(&default),
        escape(&constraints(field)),
    )
}

fn enum_section(lines: &mut Vec<String>, e: &EnumShape) {
    section_heading(lines, e.name, e.description);
    lines.extend(e.values.iter().map(|value| format!("- `{value}`")));
}

/// The description followed by any bounds.
fn constraints(field: &FieldShape) -> String {
    let mut text = field.description.to_string();
    let mut notes = Vec::new();
    match (field.minimum, field.maximum.filter(|m| m.is_finite())) {
        (Some(min), Some(max)) => notes.push(format!("range [{min}, {max}]")),
        (Some(min), None) => notes.push(format!("minimum {min}")),
        (None, Some(max)) => notes.push(format!("maximum {max}")),
        (None, None) => {}
    }
    if let Some(n) = field.min_items {
        notes.push(format!("at least {n} item(s)"));
    }
    if let Some(pattern) = field.pattern {
        notes.push(format!("pattern `{pattern}`"));
    }
    if !notes.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("({})", notes.join(", ")));
    }
    text
}

fn type_name(shape: &TypeShape) -> String {
    match shape {
        TypeShape::Primitive(kind) => kind.as_str().to_string(),
        TypeShape::Literal(_) | TypeShape::Opaque(_) => shape.to_string(),
        TypeShape::Enum(e) => link(e.name),
        TypeShape::Record(r) => link(r.name),
        TypeShape::Sequence(inner) => format!("list of {}", type_name(inner)),
        TypeShape::Set(inner) => format!("set of {}", type_name(inner)),
        TypeShape::Tuple(items) => {
            let items: Vec<String> = items.iter().map(type_name).collect();
            format!("({})", items.join(", "))
        }
        TypeShape::Map { key, value } => {
            format!("map of {} to {}", type_name(key), type_name(value))
        }
        TypeShape::Union(union) => match (union.name, union.optional_inner()) {
            (Some(name), _) => name.to_string(),
            (None, Some(inner)) => format!("{} or null", type_name(inner)),
            (None, None) => {
                let members: Vec<String> = union.members.iter().map(type_name).collect();
                members.join(" or ")
            }
        },
    }
}

fn link(name: &str) -> String {
    format!("[{name}](#{})", name.to_lowercase())
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::current_schema;

    #[test]
    fn test_every_record_and_enum_has_a_section_once() {
        let doc = document_schema(&current_schema());
        for name in [
            "ExtendedDatasetProfile",
            "AssetReference",
            "License",
            "StructuredDataSet",
            "NumericColumn",
            "DatasetTreeNode",
            "JsonReference",
            "Trend",
            "VideoPixelFormat",
        ] {
            let heading = format!("\n## {name}\n");
            assert_eq!(doc.matches(&heading).count(), 1, "section {name}");
        }
    }

    #[test]
    fn test_field_rows() {
        let doc = document_schema(&current_schema());
        assert!(doc.contains("| `name` | str | yes |  | Name of the asset |"));
        assert!(doc.contains(
            "| `structuredDatasets` | list of [StructuredDataSet](#structureddataset) | no | `[]` |"
        ));
        assert!(doc.contains("| `min` | Numeric | yes |"));
        assert!(doc.contains("(range [0, 1])"));
        assert!(doc.contains("- `No Trend`"));
    }

    #[test]
    fn test_sections_are_separated_by_blank_lines() {
        let doc = document_schema(&current_schema());
        assert!(doc.starts_with("# ExtendedDatasetProfile\n\nSchema version `"));
        assert!(doc.ends_with('\n') && !doc.ends_with("\n\n"));
        assert!(!doc.contains("\n\n\n"));
        for (i, line) in doc.lines().enumerate().filter(|(_, l)| l.starts_with("## ")) {
            assert_eq!(doc.lines().nth(i - 1), Some(""), "{line}");
            assert_eq!(doc.lines().nth(i + 1), Some(""), "{line}");
        }
        let profile = doc.split("\n## ").nth(1).unwrap();
        assert!(profile.starts_with("ExtendedDatasetProfile\n"));
        let header = "\n| Field | Type | Required | Default | Description |\n|-------|";
        assert!(profile.contains(header));
    }
}
