//! sandlisp reader: source text to forms.
//!
//! Purely syntactic. The output is plain [`Value`]s (symbols, literals and
//! lists); nothing is resolved or evaluated here.

use pest::error::{Error, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::{List, Symbol, Value, QUOTE};
use crate::errors::SyntaxError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct SandlispParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Reads every top-level form in `source`.
pub fn parse(source: &str) -> Result<Vec<Value>, SyntaxError> {
    parse_named("<input>", source)
}

/// Like [`parse`], with a source name for diagnostics.
pub fn parse_named(name: &str, source: &str) -> Result<Vec<Value>, SyntaxError> {
    let mut pairs = SandlispParser::parse(Rule::program, source)
        .map_err(|e| convert_parse_error(e, name, source))?;
    let Some(program) = pairs.next() else {
        return Ok(Vec::new());
    };
    program
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(|pair| build_form(pair, name, source))
        .collect()
}

/// Reads exactly one form.
pub fn parse_form(source: &str) -> Result<Value, SyntaxError> {
    let mut forms = parse(source)?;
    if forms.len() != 1 {
        return Err(SyntaxError::new(
            format!("expected exactly one form, found {}", forms.len()),
            "<input>",
            source,
            (0, source.len()),
        ));
    }
    Ok(forms.remove(0))
}

// ============================================================================
// FORM BUILDERS
// ============================================================================

fn build_form(pair: Pair<Rule>, name: &str, source: &str) -> Result<Value, SyntaxError> {
    let span = pair.as_span();
    match pair.as_rule() {
        Rule::list => {
            let items = pair
                .into_inner()
                .map(|inner| build_form(inner, name, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(List::from(items)))
        }
        Rule::quote => {
            let quoted = pair
                .into_inner()
                .next()
                .map(|inner| build_form(inner, name, source))
                .transpose()?
                .unwrap_or_default();
            Ok(Value::list([Value::Symbol(*QUOTE), quoted]))
        }
        Rule::integer => {
            let text = pair.as_str();
            match text.parse::<i64>() {
                Ok(n) => Ok(Value::Int(n)),
                // Out-of-range integer literals read as floats.
                Err(_) => text.parse::<f64>().map(Value::Float).map_err(|_| {
                    SyntaxError::new(
                        format!("invalid integer literal `{}`", text),
                        name,
                        source,
                        (span.start(), span.end()),
                    )
                }),
            }
        }
        Rule::float => {
            let text = pair.as_str();
            text.parse::<f64>().map(Value::Float).map_err(|_| {
                SyntaxError::new(
                    format!("invalid float literal `{}`", text),
                    name,
                    source,
                    (span.start(), span.end()),
                )
            })
        }
        Rule::string => {
            let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Value::Str(unescape(body)))
        }
        Rule::symbol => Ok(Value::Symbol(Symbol::new(pair.as_str()))),
        other => Err(SyntaxError::new(
            format!("unexpected {:?}", other),
            name,
            source,
            (span.start(), span.end()),
        )),
    }
}

fn unescape(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some('r') => text.push('\r'),
            Some('0') => text.push('\0'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    text
}

fn convert_parse_error(error: Error<Rule>, name: &str, source: &str) -> SyntaxError {
    let span = match error.location {
        InputLocation::Pos(pos) => (pos, pos + 1),
        InputLocation::Span((start, end)) => (start, end),
    };
    let end = span.1.min(source.len());
    let start = span.0.min(end);
    SyntaxError::new(error.variant.message().to_string(), name, source, (start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(source: &str) -> Value {
        parse_form(source).unwrap()
    }

    #[test]
    fn all_brackets_delimit_lists() {
        let expected = Value::list([Value::sym("a"), Value::Int(1)]);
        assert_eq!(read("(a 1)"), expected);
        assert_eq!(read("[a 1]"), expected);
        assert_eq!(read("{a 1}"), expected);
    }

    #[test]
    fn quote_sugar() {
        assert_eq!(
            read("'(1 2)"),
            Value::list([
                Value::sym("quote"),
                Value::list([Value::Int(1), Value::Int(2)])
            ])
        );
    }

    #[test]
    fn literals() {
        assert_eq!(read("-12"), Value::Int(-12));
        assert_eq!(read("2.5"), Value::Float(2.5));
        assert_eq!(read("1e3"), Value::Float(1000.0));
        assert_eq!(read(r#""a\"b\n""#), Value::str("a\"b\n"));
        assert_eq!(read("-"), Value::sym("-"));
        assert_eq!(read("<Vector>"), Value::sym("<Vector>"));
        assert_eq!(read("1+"), Value::sym("1+"));
    }

    #[test]
    fn comments_are_skipped() {
        let forms = parse("; leading\n(a) ; trailing\nb").unwrap();
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn unbalanced_input_is_a_syntax_error() {
        let err = parse("(a (b)").unwrap_err();
        assert!(!err.message.is_empty());
    }
}
