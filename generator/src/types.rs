use serde::Serialize;

/// One parsed input file: the package it declares plus every struct
/// declaration found in it, in declaration order.
#[derive(Debug, PartialEq, Serialize)]
pub struct SourceUnit {
    pub package: String,
    pub records: Vec<RecordDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub fields: Vec<FieldDecl>,
}

/// A named struct field. Anonymous (embedded) fields never make it into the
/// model; a multi-name declaration contributes only its first name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub type_:  TypeDesc,
    pub tag:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDesc {
    pub name:          String,
    pub is_collection: bool,
}

/// Association of a field with an enum's name/value table, derived from its
/// tag. `enum_type` is stored with any current-package qualifier already
/// stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumBinding {
    pub field_name:    String,
    pub enum_type:     String,
    pub is_collection: bool,
}

/// What gets written for one field in the generated field-map table: either a
/// plain external-key string literal or a synthesized binder expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Emission {
    Key(String),
    Binder(String),
}

/// One fully rendered output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationUnit {
    pub file_name: String,
    pub text:      String,
}
