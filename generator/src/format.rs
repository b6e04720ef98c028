use crate::error::BindError;

/// Canonicalize generated source text: every line is re-indented with tabs
/// according to its bracket nesting depth, counted outside string literals
/// and line comments. Structurally unbalanced text is a `FormatError`, which
/// in practice means a defect in an emission function rather than bad input.
pub fn format_source(text: &str) -> Result<String, BindError> {
    let mut out = String::new();
    let mut depth: usize = 0;

    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        let (opens, closes, leading_closes) = scan_line(trimmed, number + 1)?;

        let indent = depth.checked_sub(leading_closes).ok_or_else(|| {
            BindError::FormatError(format!(
                "unbalanced closing bracket at line {}: {}",
                number + 1,
                trimmed
            ))
        })?;

        for _ in 0..indent {
            out.push('\t');
        }
        out.push_str(trimmed);
        out.push('\n');

        depth = (depth + opens).checked_sub(closes).ok_or_else(|| {
            BindError::FormatError(format!(
                "unbalanced closing bracket at line {}: {}",
                number + 1,
                trimmed
            ))
        })?;
    }

    if depth != 0 {
        return Err(BindError::FormatError(format!(
            "{} bracket group(s) left open at end of unit",
            depth
        )));
    }

    Ok(out)
}

/// Count bracket opens/closes on one line, plus the run of closing brackets
/// at the start of the line (those dedent the line itself). Double-quoted
/// and backtick strings are opaque; a `//` comment ends the scan.
fn scan_line(line: &str, number: usize) -> Result<(usize, usize, usize), BindError> {
    let mut opens = 0;
    let mut closes = 0;
    let mut leading_closes = 0;
    let mut leading = true;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                leading = false;
                let mut terminated = false;
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            terminated = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !terminated {
                    return Err(BindError::FormatError(format!(
                        "unterminated string literal at line {}",
                        number
                    )));
                }
            }
            '`' => {
                leading = false;
                if !chars.by_ref().any(|inner| inner == '`') {
                    return Err(BindError::FormatError(format!(
                        "unterminated raw string literal at line {}",
                        number
                    )));
                }
            }
            '/' if chars.peek() == Some(&'/') => break,
            '{' | '(' | '[' => {
                leading = false;
                opens += 1;
            }
            '}' | ')' | ']' => {
                closes += 1;
                if leading {
                    leading_closes += 1;
                }
            }
            _ => leading = false,
        }
    }

    Ok((opens, closes, leading_closes))
}
