use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Format error: {0}")]
    FormatError(String),
}
