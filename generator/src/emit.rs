use crate::mapping::RecordMapping;
use crate::types::{Emission, GenerationUnit, RecordDecl};
use crate::utils::quote;

pub const BINDING_IMPORT: &str = "github.com/mholt/binding";

fn banner(lines: &mut Vec<String>) {
    lines.push("/*".to_string());
    lines.push("This is an autogenerated file by autobind".to_string());
    lines.push("*/".to_string());
}

/// Render the field-map unit for one record: package clause, banner,
/// imports, and the FieldMap method whose table pairs each field reference
/// with its emission expression, in mapping iteration order. Text is raw;
/// the formatter canonicalizes it.
pub fn emit_record_unit(
    record: &RecordDecl,
    mapping: &RecordMapping,
    package: &str,
    receiver: &str,
) -> GenerationUnit {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("package {}", package));
    lines.push(String::new());
    banner(&mut lines);
    lines.push(String::new());
    lines.push("import (".to_string());
    lines.push(quote(BINDING_IMPORT));
    lines.push(quote("net/http"));
    if mapping.needs_collection_support {
        lines.push(quote("strings"));
    }
    lines.push(")".to_string());
    lines.push(String::new());
    lines.push(format!(
        "func ({} *{}) FieldMap(request *http.Request) binding.FieldMap {{",
        receiver, record.name
    ));
    lines.push("return binding.FieldMap{".to_string());
    for (field, emission) in &mapping.entries {
        match emission {
            Emission::Key(key) => {
                lines.push(format!("&{}.{}: {},", receiver, field, quote(key)));
            }
            Emission::Binder(expression) => {
                let mut parts = expression.lines();
                let first = parts.next().unwrap_or_default();
                lines.push(format!("&{}.{}: {}", receiver, field, first));
                for part in parts {
                    lines.push(part.to_string());
                }
                if let Some(last) = lines.last_mut() {
                    last.push(',');
                }
            }
        }
    }
    lines.push("}".to_string());
    lines.push("}".to_string());

    GenerationUnit {
        file_name: format!("{}_bindings.go", record.name.to_lowercase()),
        text:      lines.join("\n"),
    }
}

/// Render the companion unit giving one enum type a textual-serialization
/// method. Emitted once per distinct enum type in the unit.
pub fn emit_enum_unit(enum_type: &str, package: &str) -> GenerationUnit {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("package {}", package));
    lines.push(String::new());
    banner(&mut lines);
    lines.push(String::new());
    lines.push(format!(
        "func (e {}) MarshalText() ([]byte, error) {{",
        enum_type
    ));
    lines.push("return []byte(e.String()), nil".to_string());
    lines.push("}".to_string());

    GenerationUnit {
        file_name: format!("{}_enum_bindings.go", enum_type.to_lowercase()),
        text:      lines.join("\n"),
    }
}
