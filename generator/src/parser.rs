use crate::{
    error::BindError,
    tokenizer::Token,
    types::{FieldDecl, RecordDecl, SourceUnit, TypeDesc},
    utils::{error, quote},
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:      Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref SEPARATOR:       Regex = Regex::new(r"^(\n|;)$").unwrap();
    static ref RAW_TAG:         Regex = Regex::new(r"^`[^`]*`$").unwrap();
    static ref LEFT_BRACE:      Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:     Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_PAREN:      Regex = Regex::new(r"^\($").unwrap();
    static ref RIGHT_PAREN:     Regex = Regex::new(r"^\)$").unwrap();
    static ref ARRAY_TOKEN:     Regex = Regex::new(r"^\[\]$").unwrap();
    static ref STAR:            Regex = Regex::new(r"^\*$").unwrap();
    static ref DOT:             Regex = Regex::new(r"^\.$").unwrap();
    static ref COMMA:           Regex = Regex::new(r"^,$").unwrap();
    static ref EQUALS:          Regex = Regex::new(r"^=$").unwrap();
    static ref PACKAGE_KEYWORD: Regex = Regex::new(r"^package$").unwrap();
    static ref IMPORT_KEYWORD:  Regex = Regex::new(r"^import$").unwrap();
    static ref TYPE_KEYWORD:    Regex = Regex::new(r"^type$").unwrap();
    static ref STRUCT_KEYWORD:  Regex = Regex::new(r"^struct$").unwrap();
    static ref CONST_OR_VAR:    Regex = Regex::new(r"^(const|var)$").unwrap();
    static ref FUNC_KEYWORD:    Regex = Regex::new(r"^func$").unwrap();
    static ref EOF:             Regex = Regex::new(r"^$").unwrap();
}

/// Extract every struct declaration from the token stream. Non-struct type
/// declarations, imports, const/var blocks, and function bodies are skipped
/// silently; anything else at the top level is a parse error.
pub fn parse_unit(tokens: &[Token]) -> Result<SourceUnit, BindError> {
    let mut records = Vec::new();
    let mut index = 0;

    fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
        tokens.get(index).expect("Unexpected end of tokens")
    }

    fn at_eof(tokens: &[Token], index: usize) -> bool {
        current_token(tokens, index).text.is_empty()
    }

    fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
        if test.is_match(&current_token(tokens, *index).text) {
            *index += 1;
            true
        } else {
            false
        }
    }

    fn expect(tokens: &[Token], index: &mut usize, test: &Regex, expected: &str) -> Result<(), BindError> {
        if !eat(tokens, index, test) {
            let tok = current_token(tokens, *index);
            return Err(error(
                &format!("Expected {} but found {}", expected, quote(&tok.text)),
                tok.line,
                tok.column,
            ));
        }
        Ok(())
    }

    fn unexpected_token(tokens: &[Token], index: &mut usize) -> BindError {
        let tok = current_token(tokens, *index);
        error(
            &format!("Unexpected token {}", quote(&tok.text)),
            tok.line,
            tok.column,
        )
    }

    fn skip_separators(tokens: &[Token], index: &mut usize) {
        while !at_eof(tokens, *index) && eat(tokens, index, &SEPARATOR) {}
    }

    // Skip to the end of the current line, balancing any bracket groups
    // opened along the way. Stops before a closing brace/paren at depth zero
    // so struct bodies and grouped declarations stay intact for the caller.
    fn skip_balanced_line(tokens: &[Token], index: &mut usize) {
        let mut depth = 0usize;
        loop {
            if at_eof(tokens, *index) {
                return;
            }
            match current_token(tokens, *index).text.as_str() {
                "\n" | ";" if depth == 0 => {
                    *index += 1;
                    return;
                }
                "}" | ")" | "]" if depth == 0 => return,
                "{" | "(" | "[" => {
                    depth += 1;
                    *index += 1;
                }
                "}" | ")" | "]" => {
                    depth -= 1;
                    *index += 1;
                }
                _ => *index += 1,
            }
        }
    }

    // Skip a parenthesized declaration group. The caller has consumed the
    // opening paren.
    fn skip_group(tokens: &[Token], index: &mut usize) -> Result<(), BindError> {
        let mut depth = 1usize;
        while depth > 0 {
            if at_eof(tokens, *index) {
                let tok = current_token(tokens, *index);
                return Err(error("Unterminated declaration group", tok.line, tok.column));
            }
            match current_token(tokens, *index).text.as_str() {
                "(" => depth += 1,
                ")" => depth -= 1,
                _ => {}
            }
            *index += 1;
        }
        Ok(())
    }

    // Skip a func declaration: signature up to the body brace (tracking
    // paren/bracket nesting), then the balanced body. A declaration without
    // a body ends at its line separator.
    fn skip_func(tokens: &[Token], index: &mut usize) -> Result<(), BindError> {
        let mut parens = 0usize;
        loop {
            if at_eof(tokens, *index) {
                return Ok(());
            }
            match current_token(tokens, *index).text.as_str() {
                "\n" | ";" if parens == 0 => {
                    *index += 1;
                    return Ok(());
                }
                "(" | "[" => {
                    parens += 1;
                    *index += 1;
                }
                ")" | "]" => {
                    parens = parens.saturating_sub(1);
                    *index += 1;
                }
                "{" if parens == 0 => {
                    *index += 1;
                    let mut depth = 1usize;
                    while depth > 0 {
                        if at_eof(tokens, *index) {
                            let tok = current_token(tokens, *index);
                            return Err(error("Unterminated function body", tok.line, tok.column));
                        }
                        match current_token(tokens, *index).text.as_str() {
                            "{" => depth += 1,
                            "}" => depth -= 1,
                            _ => {}
                        }
                        *index += 1;
                    }
                    return Ok(());
                }
                _ => *index += 1,
            }
        }
    }

    fn parse_field_type(tokens: &[Token], index: &mut usize) -> Result<TypeDesc, BindError> {
        let is_collection = eat(tokens, index, &ARRAY_TOKEN);
        let mut name = String::new();
        if eat(tokens, index, &STAR) {
            name.push('*');
        }
        let base = current_token(tokens, *index).text.clone();
        expect(tokens, index, &IDENTIFIER, "type name")?;
        name.push_str(&base);
        while eat(tokens, index, &DOT) {
            let qualified = current_token(tokens, *index).text.clone();
            expect(tokens, index, &IDENTIFIER, "identifier")?;
            name.push('.');
            name.push_str(&qualified);
        }
        Ok(TypeDesc { name, is_collection })
    }

    fn parse_struct_fields(tokens: &[Token], index: &mut usize) -> Result<Vec<FieldDecl>, BindError> {
        let mut fields = Vec::new();
        loop {
            skip_separators(tokens, index);
            if eat(tokens, index, &RIGHT_BRACE) {
                return Ok(fields);
            }
            if at_eof(tokens, *index) {
                let tok = current_token(tokens, *index);
                return Err(error("Unterminated struct body", tok.line, tok.column));
            }

            // Embedded pointer field: no name, excluded from the model.
            if eat(tokens, index, &STAR) {
                skip_balanced_line(tokens, index);
                continue;
            }

            let f_tok = current_token(tokens, *index);
            let (f_text, f_line, f_column) = (f_tok.text.clone(), f_tok.line, f_tok.column);
            expect(tokens, index, &IDENTIFIER, "identifier")?;

            // Embedded qualified field, e.g. a bare `pkg.Type`: excluded.
            if DOT.is_match(&current_token(tokens, *index).text) {
                skip_balanced_line(tokens, index);
                continue;
            }

            // Additional names in a multi-name declaration. Only the first
            // name participates in the mapping.
            let mut extra_names = 0;
            while eat(tokens, index, &COMMA) {
                expect(tokens, index, &IDENTIFIER, "identifier")?;
                extra_names += 1;
            }

            // A lone identifier followed by a separator, tag, or the closing
            // brace is an embedded field: excluded.
            let next = current_token(tokens, *index);
            if extra_names == 0
                && (SEPARATOR.is_match(&next.text)
                    || RAW_TAG.is_match(&next.text)
                    || RIGHT_BRACE.is_match(&next.text))
            {
                skip_balanced_line(tokens, index);
                continue;
            }

            let type_ = parse_field_type(tokens, index)?;

            let tag = if RAW_TAG.is_match(&current_token(tokens, *index).text) {
                let raw = &current_token(tokens, *index).text;
                let stripped = raw[1..raw.len() - 1].to_string();
                *index += 1;
                Some(stripped)
            } else {
                None
            };

            if !RIGHT_BRACE.is_match(&current_token(tokens, *index).text) {
                expect(tokens, index, &SEPARATOR, "end of field declaration")?;
            }

            fields.push(FieldDecl {
                name: f_text,
                line: f_line,
                column: f_column,
                type_,
                tag,
            });
        }
    }

    fn parse_type_spec(
        tokens: &[Token],
        index: &mut usize,
        records: &mut Vec<RecordDecl>,
    ) -> Result<(), BindError> {
        let name_tok = current_token(tokens, *index);
        let (name, line, column) = (name_tok.text.clone(), name_tok.line, name_tok.column);
        expect(tokens, index, &IDENTIFIER, "identifier")?;

        // Alias declarations and non-struct underlying types are not an
        // error; the unit may declare enums and aliases alongside structs.
        if eat(tokens, index, &EQUALS) {
            skip_balanced_line(tokens, index);
            return Ok(());
        }
        if eat(tokens, index, &STRUCT_KEYWORD) {
            expect(tokens, index, &LEFT_BRACE, "\"{\"")?;
            let fields = parse_struct_fields(tokens, index)?;
            records.push(RecordDecl { name, line, column, fields });
            return Ok(());
        }
        skip_balanced_line(tokens, index);
        Ok(())
    }

    // Package clause comes first.
    skip_separators(tokens, &mut index);
    expect(tokens, &mut index, &PACKAGE_KEYWORD, "\"package\"")?;
    let package = current_token(tokens, index).text.clone();
    expect(tokens, &mut index, &IDENTIFIER, "identifier")?;

    // Top-level declarations one by one.
    loop {
        skip_separators(tokens, &mut index);
        if eat(tokens, &mut index, &EOF) {
            break;
        }
        if eat(tokens, &mut index, &IMPORT_KEYWORD) {
            if eat(tokens, &mut index, &LEFT_PAREN) {
                skip_group(tokens, &mut index)?;
            } else {
                skip_balanced_line(tokens, &mut index);
            }
        } else if eat(tokens, &mut index, &TYPE_KEYWORD) {
            if eat(tokens, &mut index, &LEFT_PAREN) {
                loop {
                    skip_separators(tokens, &mut index);
                    if eat(tokens, &mut index, &RIGHT_PAREN) {
                        break;
                    }
                    if at_eof(tokens, index) {
                        let tok = current_token(tokens, index);
                        return Err(error("Unterminated declaration group", tok.line, tok.column));
                    }
                    parse_type_spec(tokens, &mut index, &mut records)?;
                }
            } else {
                parse_type_spec(tokens, &mut index, &mut records)?;
            }
        } else if eat(tokens, &mut index, &CONST_OR_VAR) {
            if eat(tokens, &mut index, &LEFT_PAREN) {
                skip_group(tokens, &mut index)?;
            } else {
                skip_balanced_line(tokens, &mut index);
            }
        } else if eat(tokens, &mut index, &FUNC_KEYWORD) {
            skip_func(tokens, &mut index)?;
        } else {
            return Err(unexpected_token(tokens, &mut index));
        }
    }

    Ok(SourceUnit { package, records })
}
