use crate::types::{EnumBinding, FieldDecl};

/// Result of interpreting one field's tag: either the field opted out of the
/// mapping entirely, or it maps to an external key, possibly with an enum
/// binding attached.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    Excluded,
    Mapped {
        external_key: String,
        enum_binding: Option<EnumBinding>,
    },
}

/// Derive a field's external key and optional enum binding from its tag.
///
/// Key policy, in order: no tag means the field maps to its own name; a
/// `json:"..."` segment supplies the key, with the `-` sentinel excluding
/// the field altogether; any other tag falls back to the field name.
/// An excluded field produces no entry and its enum annotation is ignored.
pub fn interpret_tag(field: &FieldDecl, package: &str) -> TagOutcome {
    let external_key = match field.tag.as_deref() {
        None => field.name.clone(),
        Some(tag) => match json_name(tag) {
            Some(name) if name == "-" => return TagOutcome::Excluded,
            Some(name) => name,
            None => field.name.clone(),
        },
    };

    let enum_binding = field
        .tag
        .as_deref()
        .and_then(|tag| enum_annotation(tag, package))
        .map(|enum_type| EnumBinding {
            field_name: field.name.clone(),
            enum_type,
            is_collection: field.type_.is_collection,
        });

    TagOutcome::Mapped {
        external_key,
        enum_binding,
    }
}

/// The value of the first `json:"..."` segment, delimiters stripped. Options
/// such as `,omitempty` are kept verbatim; only the exact value `-` is the
/// opt-out sentinel.
fn json_name(tag: &str) -> Option<String> {
    for segment in tag.split_whitespace() {
        if let Some(rest) = segment.strip_prefix("json:\"") {
            let value = rest.strip_suffix('"').unwrap_or(rest);
            return Some(value.to_string());
        }
    }
    None
}

/// The enum type named by an `enum=` annotation inside a `protobuf:"..."`
/// segment, if any. The type name runs to the end of its segment; a
/// same-package qualifier (`<package>.`) is stripped so the generated
/// reference stays unqualified within its own unit.
fn enum_annotation(tag: &str, package: &str) -> Option<String> {
    for segment in tag.split_whitespace() {
        if !segment.starts_with("protobuf:") {
            continue;
        }
        if let Some(position) = segment.find("enum=") {
            let raw = &segment[position + "enum=".len()..];
            let name = raw.strip_suffix('"').unwrap_or(raw);
            let qualifier = format!("{}.", package);
            let name = name.strip_prefix(&qualifier).unwrap_or(name);
            return Some(name.to_string());
        }
    }
    None
}
