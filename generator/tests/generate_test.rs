#![cfg(test)]

use autobind_generator::{
    binder::{receiver_name, synthesize},
    generate_units,
    mapping::build_mapping,
    parse_source, preview_first,
    tag::{interpret_tag, TagOutcome},
    types::{Emission, FieldDecl, TypeDesc},
};

#[test]
fn test_parse_unit() {
    let input = r#"
package mypkg

import (
	"net/http"
)

type Role int

type Alias = Role

const (
	RoleAdmin Role = 0
)

type Profile struct {
	Base
	Name string
	Role ProtoRole `json:"role" protobuf:"varint,2,opt,name=role,enum=mypkg.ProtoRole"`
	Tags []ProtoRole `json:"tags" protobuf:"varint,3,rep,name=tags,enum=mypkg.ProtoRole"`
	X, Y int
}

func (p *Profile) Reset() { *p = Profile{} }
"#;

    let unit = parse_source(input).expect("parse_source failed");

    assert_eq!(unit.package, "mypkg");

    // Only the struct survives; the enum-backing type, alias, const block,
    // and func are skipped.
    assert_eq!(unit.records.len(), 1);

    let profile = &unit.records[0];
    assert_eq!(profile.name, "Profile");

    // The embedded field is excluded; the multi-name field contributes only
    // its first name.
    assert_eq!(profile.fields.len(), 4);

    assert_eq!(profile.fields[0].name, "Name");
    assert_eq!(profile.fields[0].type_.name, "string");
    assert_eq!(profile.fields[0].type_.is_collection, false);
    assert_eq!(profile.fields[0].tag, None);

    assert_eq!(profile.fields[1].name, "Role");
    assert_eq!(profile.fields[1].type_.name, "ProtoRole");
    assert_eq!(profile.fields[1].type_.is_collection, false);
    assert_eq!(
        profile.fields[1].tag.as_deref(),
        Some("json:\"role\" protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"")
    );

    assert_eq!(profile.fields[2].name, "Tags");
    assert_eq!(profile.fields[2].type_.name, "ProtoRole");
    assert_eq!(profile.fields[2].type_.is_collection, true);

    assert_eq!(profile.fields[3].name, "X");
    assert_eq!(profile.fields[3].type_.name, "int");
}

#[test]
fn test_untagged_fields_map_to_themselves() {
    let input = "package mypkg\n\ntype Point struct {\n\tX int\n\tY int\n}\n";
    let unit = parse_source(input).unwrap();
    let mapping = build_mapping(&unit.records[0], &unit.package);

    assert_eq!(mapping.entries.len(), 2);
    assert_eq!(
        mapping.entries.get("X"),
        Some(&Emission::Key("X".to_string()))
    );
    assert_eq!(
        mapping.entries.get("Y"),
        Some(&Emission::Key("Y".to_string()))
    );
    assert!(mapping.enum_bindings.is_empty());
    assert!(!mapping.needs_collection_support);
}

#[test]
fn test_json_names_and_opt_out() {
    let input = "package mypkg\n\ntype User struct {\n\tName string `json:\"name\"`\n\tSecret string `json:\"-\"`\n\tOther string `db:\"other\"`\n}\n";
    let unit = parse_source(input).unwrap();
    let mapping = build_mapping(&unit.records[0], &unit.package);

    // The opted-out field is absent entirely; a tag without a json segment
    // falls back to the field name.
    assert_eq!(mapping.entries.len(), 2);
    assert_eq!(
        mapping.entries.get("Name"),
        Some(&Emission::Key("name".to_string()))
    );
    assert_eq!(mapping.entries.get("Secret"), None);
    assert_eq!(
        mapping.entries.get("Other"),
        Some(&Emission::Key("Other".to_string()))
    );
}

#[test]
fn test_opt_out_shrinks_generated_table() {
    let input = "package mypkg\n\ntype User struct {\n\tName string `json:\"name\"`\n\tSecret string `json:\"-\"`\n\tAge int\n}\n";
    let units = generate_units(input).unwrap();
    assert_eq!(units.len(), 1);

    let text = &units[0].text;
    assert_eq!(text.matches("&u.").count(), 2);
    assert!(!text.contains("Secret"));
}

#[test]
fn test_enum_binding_overrides_plain_key() {
    let input = "package mypkg\n\ntype Profile struct {\n\tRole ProtoRole `json:\"role\" protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n";
    let unit = parse_source(input).unwrap();
    let record = &unit.records[0];

    let mut mapping = build_mapping(record, &unit.package);
    assert_eq!(mapping.enum_bindings.len(), 1);

    let binding = mapping.enum_bindings[0].clone();
    assert_eq!(binding.enum_type, "ProtoRole");
    assert!(!binding.is_collection);

    let receiver = receiver_name(&record.name).unwrap();
    let key = mapping.plain_key(&binding.field_name).unwrap().to_string();
    mapping.override_entry(&binding.field_name, synthesize(&binding, &receiver, &key));

    match mapping.entries.get("Role") {
        Some(Emission::Binder(expression)) => {
            assert!(expression.contains("Form: \"role\","));
            assert!(expression.contains("ProtoRole_value[formVals[0]]"));
            assert!(expression.contains("p.Role = ProtoRole(val)"));
        }
        other => panic!("expected a binder expression, got {:?}", other),
    }
}

#[test]
fn test_collection_binder_splits_and_accumulates() {
    let input = "package mypkg\n\ntype Profile struct {\n\tTags []ProtoRole `json:\"tags\" protobuf:\"varint,3,rep,name=tags,enum=mypkg.ProtoRole\"`\n}\n";
    let units = generate_units(input).unwrap();
    let text = &units[0].text;

    // Split on comma, size to the split result, look up per token, and keep
    // going after a failed token.
    assert!(text.contains("strings.Split(formVals[0], \",\")"));
    assert!(text.contains("make([]ProtoRole, 0, len(parts))"));
    assert!(text.contains("for _, part := range parts {"));
    assert!(text.contains("val, ok := ProtoRole_value[part]"));
    assert!(text.contains("errs.Add([]string{fieldName}, binding.DeserializationError, part)"));
    assert!(text.contains("p.Tags = append(p.Tags, ProtoRole(val))"));
    assert!(!text.contains("break"));

    // Collection support pulls in the strings import.
    assert!(text.contains("\"strings\""));
}

#[test]
fn test_scalar_binder_needs_no_strings_import() {
    let input = "package mypkg\n\ntype Profile struct {\n\tRole ProtoRole `protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n";
    let units = generate_units(input).unwrap();
    assert!(!units[0].text.contains("\"strings\""));

    // No json segment: the binder's form key falls back to the field name.
    assert!(units[0].text.contains("Form: \"Role\","));
}

#[test]
fn test_same_package_prefix_is_stripped() {
    let field = FieldDecl {
        name:   "Role".to_string(),
        line:   1,
        column: 1,
        type_:  TypeDesc { name: "ProtoRole".to_string(), is_collection: false },
        tag:    Some("protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"".to_string()),
    };
    match interpret_tag(&field, "mypkg") {
        TagOutcome::Mapped { enum_binding: Some(binding), .. } => {
            assert_eq!(binding.enum_type, "ProtoRole");
        }
        other => panic!("expected an enum binding, got {:?}", other),
    }

    // A different package's qualifier stays as-is.
    match interpret_tag(&field, "otherpkg") {
        TagOutcome::Mapped { enum_binding: Some(binding), .. } => {
            assert_eq!(binding.enum_type, "mypkg.ProtoRole");
        }
        other => panic!("expected an enum binding, got {:?}", other),
    }

    // Prefix stripping requires the separator: `my` must not bite into
    // `mypkg.ProtoRole`.
    match interpret_tag(&field, "my") {
        TagOutcome::Mapped { enum_binding: Some(binding), .. } => {
            assert_eq!(binding.enum_type, "mypkg.ProtoRole");
        }
        other => panic!("expected an enum binding, got {:?}", other),
    }
}

#[test]
fn test_exclusion_wins_over_enum_binding() {
    let field = FieldDecl {
        name:   "Role".to_string(),
        line:   1,
        column: 1,
        type_:  TypeDesc { name: "ProtoRole".to_string(), is_collection: false },
        tag:    Some("json:\"-\" protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"".to_string()),
    };
    assert_eq!(interpret_tag(&field, "mypkg"), TagOutcome::Excluded);
}

#[test]
fn test_profile_scenario() {
    let input = "package mypkg\n\ntype Profile struct {\n\tName string\n\tRole ProtoRole `json:\"role\" protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n";
    let units = generate_units(input).unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].file_name, "profile_bindings.go");
    assert_eq!(units[1].file_name, "protorole_enum_bindings.go");

    let bindings = &units[0].text;
    assert!(bindings.starts_with("package mypkg\n"));
    assert!(bindings
        .contains("func (p *Profile) FieldMap(request *http.Request) binding.FieldMap {"));
    assert!(bindings.contains("&p.Name: \"Name\","));
    assert!(bindings.contains("&p.Role: binding.Field{"));
    assert!(bindings.contains("ProtoRole_value[formVals[0]]"));

    let marshal = &units[1].text;
    assert!(marshal.contains("func (e ProtoRole) MarshalText() ([]byte, error) {"));
    assert!(marshal.contains("return []byte(e.String()), nil"));
}

#[test]
fn test_enum_unit_emitted_once_per_distinct_type() {
    let input = "package mypkg\n\ntype A struct {\n\tRole ProtoRole `protobuf:\"varint,1,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n\ntype B struct {\n\tRole ProtoRole `protobuf:\"varint,1,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n";
    let units = generate_units(input).unwrap();

    let enum_units: Vec<_> = units
        .iter()
        .filter(|u| u.file_name.ends_with("_enum_bindings.go"))
        .collect();
    assert_eq!(enum_units.len(), 1);
    assert_eq!(units.len(), 3);
}

#[test]
fn test_generation_is_deterministic() {
    let input = "package mypkg\n\ntype Profile struct {\n\tName string\n\tRole ProtoRole `json:\"role\" protobuf:\"varint,2,opt,name=role,enum=mypkg.ProtoRole\"`\n\tTags []ProtoRole `json:\"tags\" protobuf:\"varint,3,rep,name=tags,enum=mypkg.ProtoRole\"`\n}\n";
    let first = generate_units(input).unwrap();
    let second = generate_units(input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_preview_emits_first_record_only() {
    let input = "package mypkg\n\ntype Alpha struct {\n\tName string\n\tRole ProtoRole `protobuf:\"varint,1,opt,name=role,enum=mypkg.ProtoRole\"`\n}\n\ntype Beta struct {\n\tName string\n}\n";
    let preview = preview_first(input).unwrap().expect("expected a preview");

    assert!(preview.contains("func (a *Alpha) FieldMap"));
    assert!(!preview.contains("Beta"));
    // No enum companion text in preview mode.
    assert!(!preview.contains("MarshalText"));
}

#[test]
fn test_preview_of_empty_unit() {
    let input = "package mypkg\n\ntype Role int\n";
    assert_eq!(preview_first(input).unwrap(), None);
}

#[test]
fn test_malformed_input_fails_loudly() {
    let err = parse_source("package mypkg\n\ntype Broken struct {\n").unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("Parse error"), "got: {}", message);
}
