use crate::{
    binder::{receiver_name, synthesize},
    emit::{emit_enum_unit, emit_record_unit},
    error::BindError,
    format::format_source,
    mapping::build_mapping,
    parser::parse_unit,
    tokenizer::tokenize_source,
    types::{GenerationUnit, RecordDecl, SourceUnit},
};

/// Tokenize and parse one input file into the declaration model.
pub fn parse_source(text: &str) -> Result<SourceUnit, BindError> {
    let tokens = tokenize_source(text)?;
    parse_unit(&tokens)
}

/// Run the whole pipeline over one input file: one formatted unit per
/// record, then one per distinct enum type referenced anywhere in the unit,
/// in first-encounter order.
pub fn generate_units(text: &str) -> Result<Vec<GenerationUnit>, BindError> {
    let unit = parse_source(text)?;
    let mut units = Vec::new();
    let mut enum_types: Vec<String> = Vec::new();

    for record in &unit.records {
        let (generated, referenced) = record_unit(record, &unit.package)?;
        units.push(generated);
        for enum_type in referenced {
            if !enum_types.contains(&enum_type) {
                enum_types.push(enum_type);
            }
        }
    }

    for enum_type in &enum_types {
        let raw = emit_enum_unit(enum_type, &unit.package);
        units.push(GenerationUnit {
            file_name: raw.file_name,
            text:      format_source(&raw.text)?,
        });
    }

    Ok(units)
}

/// Preview mode: the formatted text of the first record's unit only. No
/// enum companion units are produced and nothing is written; a unit with no
/// records previews as `None`.
pub fn preview_first(text: &str) -> Result<Option<String>, BindError> {
    let unit = parse_source(text)?;
    match unit.records.first() {
        Some(record) => {
            let (generated, _) = record_unit(record, &unit.package)?;
            Ok(Some(generated.text))
        }
        None => Ok(None),
    }
}

/// Build one record's mapping, let the binder synthesizer override the
/// entries for enum-bound fields, and render the formatted unit. Also
/// reports which enum types the record referenced.
fn record_unit(
    record: &RecordDecl,
    package: &str,
) -> Result<(GenerationUnit, Vec<String>), BindError> {
    let mut mapping = build_mapping(record, package);
    let receiver = receiver_name(&record.name)?;

    let bindings = mapping.enum_bindings.clone();
    let mut referenced = Vec::new();
    for binding in &bindings {
        let key = match mapping.plain_key(&binding.field_name) {
            Some(key) => key.to_string(),
            None => continue,
        };
        let expression = synthesize(binding, &receiver, &key);
        mapping.override_entry(&binding.field_name, expression);
        if !referenced.contains(&binding.enum_type) {
            referenced.push(binding.enum_type.clone());
        }
    }

    let raw = emit_record_unit(record, &mapping, package, &receiver);
    let generated = GenerationUnit {
        file_name: raw.file_name,
        text:      format_source(&raw.text)?,
    };
    Ok((generated, referenced))
}
