use crate::error::BindError;
use crate::types::EnumBinding;
use crate::utils::quote;

/// The receiver identifier used in generated methods: the record name's
/// first letter, lower-cased.
pub fn receiver_name(record_name: &str) -> Result<String, BindError> {
    let first = record_name.chars().next().ok_or_else(|| {
        BindError::RenderError("cannot derive a receiver from an empty record name".to_string())
    })?;
    Ok(first.to_lowercase().to_string())
}

/// Synthesize the binder expression that replaces a field's plain key.
/// Output depends only on the binding, receiver, and external key.
pub fn synthesize(binding: &EnumBinding, receiver: &str, external_key: &str) -> String {
    if binding.is_collection {
        collection_binder(binding, receiver, external_key)
    } else {
        scalar_binder(binding, receiver, external_key)
    }
}

/// One raw value, one lookup. A miss records a deserialization error keyed
/// by the field's external name; the resolved (or zero) value is assigned
/// either way.
fn scalar_binder(binding: &EnumBinding, receiver: &str, external_key: &str) -> String {
    let lines = vec![
        "binding.Field{".to_string(),
        format!("Form: {},", quote(external_key)),
        "Binder: func(fieldName string, formVals []string, errs binding.Errors) binding.Errors {".to_string(),
        format!("val, ok := {}_value[formVals[0]]", binding.enum_type),
        "if !ok {".to_string(),
        "errs.Add([]string{fieldName}, binding.DeserializationError, formVals[0])".to_string(),
        "}".to_string(),
        format!("{}.{} = {}(val)", receiver, binding.field_name, binding.enum_type),
        "return errs".to_string(),
        "},".to_string(),
        "}".to_string(),
    ];
    lines.join("\n")
}

/// Comma-separated raw value. The collection is sized to the split result
/// and built token by token; lookup failures accumulate without aborting
/// the remaining tokens.
fn collection_binder(binding: &EnumBinding, receiver: &str, external_key: &str) -> String {
    let target = format!("{}.{}", receiver, binding.field_name);
    let lines = vec![
        "binding.Field{".to_string(),
        format!("Form: {},", quote(external_key)),
        "Binder: func(fieldName string, formVals []string, errs binding.Errors) binding.Errors {".to_string(),
        "parts := strings.Split(formVals[0], \",\")".to_string(),
        format!("{} = make([]{}, 0, len(parts))", target, binding.enum_type),
        "for _, part := range parts {".to_string(),
        format!("val, ok := {}_value[part]", binding.enum_type),
        "if !ok {".to_string(),
        "errs.Add([]string{fieldName}, binding.DeserializationError, part)".to_string(),
        "}".to_string(),
        format!("{} = append({}, {}(val))", target, target, binding.enum_type),
        "}".to_string(),
        "return errs".to_string(),
        "},".to_string(),
        "}".to_string(),
    ];
    lines.join("\n")
}
