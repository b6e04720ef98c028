use crate::tag::{interpret_tag, TagOutcome};
use crate::types::{Emission, EnumBinding, RecordDecl};
use std::collections::BTreeMap;

/// The per-record field-map: one emission expression per processed field,
/// the side list of enum bindings, and whether any binding is
/// collection-typed (which pulls in string-splitting support downstream).
///
/// Entries live in a `BTreeMap` so lookups are by field name and iteration
/// is deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMapping {
    pub entries:                  BTreeMap<String, Emission>,
    pub enum_bindings:            Vec<EnumBinding>,
    pub needs_collection_support: bool,
}

/// Run the tag interpreter over every field of a record and aggregate the
/// results. Fields that opt out are absent from the entries; their enum
/// annotations, if any, are dropped with them.
pub fn build_mapping(record: &RecordDecl, package: &str) -> RecordMapping {
    let mut entries = BTreeMap::new();
    let mut enum_bindings = Vec::new();

    for field in &record.fields {
        match interpret_tag(field, package) {
            TagOutcome::Excluded => {}
            TagOutcome::Mapped {
                external_key,
                enum_binding,
            } => {
                entries.insert(field.name.clone(), Emission::Key(external_key));
                if let Some(binding) = enum_binding {
                    enum_bindings.push(binding);
                }
            }
        }
    }

    let needs_collection_support = enum_bindings.iter().any(|b| b.is_collection);

    RecordMapping {
        entries,
        enum_bindings,
        needs_collection_support,
    }
}

impl RecordMapping {
    /// Replace a field's emission expression. Override, never merge: the
    /// previous entry is discarded wholesale. Only fields that already have
    /// an entry may be overridden.
    pub fn override_entry(&mut self, field: &str, expression: String) {
        debug_assert!(
            self.entries.contains_key(field),
            "override_entry called for unmapped field {}",
            field
        );
        self.entries
            .insert(field.to_string(), Emission::Binder(expression));
    }

    /// The current plain key for a field, if it still has one.
    pub fn plain_key(&self, field: &str) -> Option<&str> {
        match self.entries.get(field) {
            Some(Emission::Key(key)) => Some(key),
            _ => None,
        }
    }
}
