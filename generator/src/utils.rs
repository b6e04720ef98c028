use crate::error::BindError;
use serde_json;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap()
}

pub fn error(msg: &str, line: usize, column: usize) -> BindError {
    BindError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}
