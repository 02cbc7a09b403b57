//! Placeholder substitution for SQL templates.
//!
//! ClickHouse receives a fully-substituted statement string, so `?`
//! placeholders are replaced with escaped literals before execution.
//! Placeholders inside quoted spans (`'...'`, `"..."`, `` `...` ``) are
//! left untouched.

use crate::error::{ChError, ChResult};
use crate::value::SqlValue;

/// Substitute each `?` placeholder in `template` with the matching argument
/// rendered as a SQL literal.
///
/// Errors with [`ChError::Format`] when the placeholder and argument counts
/// differ, or when the template contains an unterminated quoted span.
pub fn format_sql(template: &str, args: &[SqlValue]) -> ChResult<String> {
    let tokens = tokenize(template)?;
    let placeholders = tokens
        .iter()
        .filter(|t| matches!(t, Token::Placeholder))
        .count();
    if placeholders != args.len() {
        return Err(ChError::format_error(format!(
            "template has {placeholders} placeholder(s) but {} argument(s) were supplied",
            args.len()
        )));
    }

    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next_arg = args.iter();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            // Counts are already balanced, so the iterator cannot run dry.
            Token::Placeholder => {
                if let Some(arg) = next_arg.next() {
                    out.push_str(&arg.to_sql_literal());
                }
            }
        }
    }
    Ok(out)
}

enum Token<'a> {
    Text(&'a str),
    Placeholder,
}

/// Split a template into literal text and placeholders, skipping quoted spans.
fn tokenize(template: &str) -> ChResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in template.char_indices() {
        if let Some(quote) = in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_quote = Some(c),
            '?' => {
                if i > start {
                    tokens.push(Token::Text(&template[start..i]));
                }
                tokens.push(Token::Placeholder);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quote.is_some() {
        return Err(ChError::format_error(
            "unterminated quoted span in template",
        ));
    }
    if start < template.len() {
        tokens.push(Token::Text(&template[start..]));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_in_order() {
        let sql = format_sql(
            "SELECT * FROM t WHERE id = ? AND name = ?",
            &[SqlValue::from(5), SqlValue::from("alice")],
        )
        .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE id = 5 AND name = 'alice'");
    }

    #[test]
    fn escapes_text_values() {
        let sql = format_sql("SELECT ?", &[SqlValue::from("it's")]).unwrap();
        assert_eq!(sql, r"SELECT 'it\'s'");
    }

    #[test]
    fn skips_placeholders_inside_quotes() {
        let sql = format_sql(
            "SELECT 'a?b', id FROM t WHERE id = ?",
            &[SqlValue::from(1)],
        )
        .unwrap();
        assert_eq!(sql, "SELECT 'a?b', id FROM t WHERE id = 1");
    }

    #[test]
    fn too_few_arguments_errors() {
        let err = format_sql("SELECT ? + ?", &[SqlValue::from(1)]).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn too_many_arguments_errors() {
        let err = format_sql("SELECT 1", &[SqlValue::from(1)]).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn unterminated_quote_errors() {
        let err = format_sql("SELECT 'oops", &[]).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn null_and_array_literals() {
        let sql = format_sql(
            "INSERT INTO t VALUES (?, ?)",
            &[SqlValue::Null, SqlValue::from(vec![1, 2])],
        )
        .unwrap();
        assert_eq!(sql, "INSERT INTO t VALUES (NULL, [1, 2])");
    }
}
