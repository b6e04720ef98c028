//! autobind-generator
//!
//! This crate implements:
//!  1) A tokenizer + parser for source files containing tagged struct
//!     declarations,
//!  2) Tag interpretation (external keys, `enum=` bindings) and per-record
//!     mapping construction,
//!  3) Binder synthesis for enum-bound fields (scalar and collection),
//!  4) Code emission + canonical formatting of the generated units,
//!  5) Error types (`BindError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod tag;
pub mod mapping;
pub mod binder;
pub mod emit;
pub mod format;
pub mod generate;

pub use generate::generate_units;
pub use generate::parse_source;
pub use generate::preview_first;
