//! Tolerant data-literal parser for JavaScript-style object text.
//!
//! Accepts what a model typically emits when asked for JSON but thinking in
//! JavaScript: unquoted keys, single-quoted strings, trailing commas,
//! comments, and a surrounding `const x = ...;`. Only literal structure is
//! recognised. The sole identifiers accepted as values are `true`, `false`,
//! `null` and `undefined`; anything that would need evaluation is an error.

use std::sync::LazyLock;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1, one_of},
    combinator::{map, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::ResolutionError;

/// Nesting limit for objects and arrays.
const MAX_DEPTH: usize = 64;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=|export\s+default\b|module\.exports\s*=)\s*")
        .unwrap()
});

/// Parse `text` as a single data literal.
pub fn parse_literal(text: &str) -> Result<Value, ResolutionError> {
    let body = strip_declaration(text);
    if body.is_empty() {
        return Err(ResolutionError::Parse("empty literal".into()));
    }

    let (rest, parsed) = literal(body, 0).map_err(|e| match e {
        nom::Err::Failure(inner) if inner.code == ErrorKind::TooLarge => {
            ResolutionError::Parse(format!("literal nested deeper than {MAX_DEPTH} levels"))
        }
        _ => ResolutionError::Parse("text is not a data literal".into()),
    })?;

    let rest = skip_ws(rest);
    if !rest.is_empty() {
        return Err(ResolutionError::Parse(format!(
            "unexpected content after literal at offset {}",
            body.len() - rest.len()
        )));
    }
    Ok(parsed)
}

/// Drop a leading declaration, a trailing `;` and one pair of wrapping parens.
fn strip_declaration(text: &str) -> &str {
    let text = text.trim();
    let text = match DECLARATION.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let text = text.trim_end().trim_end_matches(';').trim();
    if text.starts_with('(') && text.ends_with(')') {
        text[1..text.len() - 1].trim()
    } else {
        text
    }
}

fn literal(input: &str, depth: usize) -> IResult<&str, Value> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let input = skip_ws(input);
    match input.chars().next() {
        Some('{') => object(input, depth + 1),
        Some('[') => array(input, depth + 1),
        Some('"') | Some('\'') => map(string_literal, Value::String)(input),
        _ => alt((number, keyword))(input),
    }
}

fn object(input: &str, depth: usize) -> IResult<&str, Value> {
    let (mut input, _) = expect_char(input, '{')?;
    let mut fields = Map::new();

    loop {
        input = skip_ws(input);
        if let Some(rest) = input.strip_prefix('}') {
            return Ok((rest, Value::Object(fields)));
        }

        let (rest, key) = object_key(input)?;
        let (rest, _) = expect_char(skip_ws(rest), ':')?;
        let (rest, field) = literal(rest, depth)?;
        fields.insert(key, field);

        let rest = skip_ws(rest);
        if let Some(rest) = rest.strip_prefix(',') {
            input = rest;
            continue;
        }
        let (rest, _) = expect_char(rest, '}')?;
        return Ok((rest, Value::Object(fields)));
    }
}

fn array(input: &str, depth: usize) -> IResult<&str, Value> {
    let (mut input, _) = expect_char(input, '[')?;
    let mut items = Vec::new();

    loop {
        input = skip_ws(input);
        if let Some(rest) = input.strip_prefix(']') {
            return Ok((rest, Value::Array(items)));
        }

        let (rest, item) = literal(input, depth)?;
        items.push(item);

        let rest = skip_ws(rest);
        if let Some(rest) = rest.strip_prefix(',') {
            input = rest;
            continue;
        }
        let (rest, _) = expect_char(rest, ']')?;
        return Ok((rest, Value::Array(items)));
    }
}

fn object_key(input: &str) -> IResult<&str, String> {
    alt((
        string_literal,
        map(identifier, str::to_string),
        map(digit1, str::to_string),
    ))(input)
}

/// Double- or single-quoted string with JSON/JS escapes.
fn string_literal(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };
    let body = &input[1..];
    let mut out = String::new();
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((&body[idx + 1..], out)),
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    '0' => out.push('\0'),
                    'u' => {
                        let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Escaped)))?;
                        // lone surrogates have no char; keep the position visible
                        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                    }
                    '\n' => {}
                    other => out.push(other),
                }
            }
            '\n' => break,
            other => out.push(other),
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = number_text(input)?;
    let text = text.strip_prefix('+').unwrap_or(text);

    let parsed = match text.parse::<i64>() {
        Ok(int) => Some(Value::Number(int.into())),
        Err(_) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
    };

    match parsed {
        Some(v) => Ok((rest, v)),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

fn number_text(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

fn keyword(input: &str) -> IResult<&str, Value> {
    let (rest, word) = identifier(input)?;
    match word {
        "true" => Ok((rest, Value::Bool(true))),
        "false" => Ok((rest, Value::Bool(false))),
        "null" | "undefined" => Ok((rest, Value::Null)),
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

fn expect_char(input: &str, expected: char) -> IResult<&str, ()> {
    match input.strip_prefix(expected) {
        Some(rest) => Ok((rest, ())),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
}

/// Whitespace, `// line` and `/* block */` comments.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(tag("//"), take_while(|c: char| c != '\n'))),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn skip_ws(input: &str) -> &str {
    ws(input).map(|(rest, _)| rest).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_json() {
        let v = parse_literal(r#"{"kind": "bar", "values": [1, 2.5, -3]}"#).unwrap();
        assert_eq!(v, json!({"kind": "bar", "values": [1, 2.5, -3]}));
    }

    #[test]
    fn parses_unquoted_keys_and_single_quotes() {
        let v = parse_literal("{ type: 'line', data: { labels: ['Jan', 'Feb'] } }").unwrap();
        assert_eq!(v, json!({"type": "line", "data": {"labels": ["Jan", "Feb"]}}));
    }

    #[test]
    fn tolerates_trailing_commas() {
        let v = parse_literal("{a: [1, 2, 3,], b: {c: true,},}").unwrap();
        assert_eq!(v, json!({"a": [1, 2, 3], "b": {"c": true}}));
    }

    #[test]
    fn treats_comments_as_whitespace() {
        let text = "{\n  // chart kind\n  type: 'pie', /* slices */ data: [1, 2]\n}";
        let v = parse_literal(text).unwrap();
        assert_eq!(v, json!({"type": "pie", "data": [1, 2]}));
    }

    #[test]
    fn strips_declarations_and_semicolons() {
        assert_eq!(parse_literal("const config = {a: 1};").unwrap(), json!({"a": 1}));
        assert_eq!(parse_literal("export default {a: 1}").unwrap(), json!({"a": 1}));
        assert_eq!(parse_literal("module.exports = {a: 1};").unwrap(), json!({"a": 1}));
        assert_eq!(parse_literal("({a: 1})").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn maps_undefined_to_null() {
        assert_eq!(parse_literal("{a: undefined}").unwrap(), json!({"a": null}));
    }

    #[test]
    fn number_forms() {
        let v = parse_literal("[+1, .5, 3., 1e3, -2E-2]").unwrap();
        assert_eq!(v, json!([1, 0.5, 3.0, 1000.0, -0.02]));
    }

    #[test]
    fn string_escapes() {
        let v = parse_literal(r#"['it\'s', "tab\tnew\nline", "é"]"#).unwrap();
        assert_eq!(v, json!(["it's", "tab\tnew\nline", "é"]));
    }

    #[test]
    fn rejects_function_calls() {
        assert!(parse_literal("{a: alert(1)}").is_err());
        assert!(parse_literal("{a: window.location}").is_err());
        assert!(parse_literal("(() => ({a: 1}))()").is_err());
    }

    #[test]
    fn rejects_bare_identifiers_and_expressions() {
        assert!(parse_literal("{a: someVariable}").is_err());
        assert!(parse_literal("{a: 1 + 2}").is_err());
        assert!(parse_literal("{a: NaN}").is_err());
    }

    #[test]
    fn rejects_prose_and_unterminated_input() {
        assert!(parse_literal("Here is your chart!").is_err());
        assert!(parse_literal("{a: 1").is_err());
        assert!(parse_literal("{a: 'unterminated}").is_err());
        assert!(parse_literal("   ").is_err());
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(parse_literal("{a: 1} and more").is_err());
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let err = parse_literal(&deep).unwrap_err();
        assert!(err.to_string().contains("nested"));
    }

    #[test]
    fn numeric_keys_become_strings() {
        assert_eq!(parse_literal("{1: 'a'}").unwrap(), json!({"1": "a"}));
    }
}
