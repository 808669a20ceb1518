//! Reader and writer for the `export const dialogs = {...};` module.
//!
//! The reader is a small recursive-descent parser over a JSON superset:
//! `//` and `/* */` comments, single-quoted strings, bare identifier keys
//! and trailing commas are accepted. Nothing is evaluated.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::domain::{Dialog, Event, EventId, Speaker, MAX_TEXT_CHARS};
use crate::error::{ImportError, Result};

const HEADER: [&str; 3] = ["export", "const", "dialogs"];

/// Deepest array/object nesting accepted. A valid module nests three levels.
const MAX_DEPTH: usize = 64;

/// One validated entry of an imported module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSet {
    pub key: String,
    pub dialogs: Vec<Dialog>,
}

/// Render every event's dialogs, keyed by event id, in the given order.
pub fn write_module(events: &[Event]) -> Result<String> {
    let mut root = Map::new();
    for event in events {
        root.insert(
            event.id().as_str().to_string(),
            serde_json::to_value(event.dialogs())?,
        );
    }
    let body = serde_json::to_string_pretty(&Value::Object(root))?;
    Ok(format!("export const dialogs = {body};\n"))
}

/// Parse and validate a dialogs module.
pub fn read_module(source: &str) -> std::result::Result<Vec<DialogSet>, ImportError> {
    let literal = Parser::new(source).module()?;
    validate(literal)
}

/// Parsed value. Objects keep duplicate keys so validation can report them.
#[derive(Debug, Clone)]
enum Literal {
    Null,
    Bool,
    Number,
    String(String),
    Array(Vec<Literal>),
    Object(Vec<(String, Literal)>),
}

impl Literal {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Number => "a number",
            Self::String(_) => "a string",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

type Parsed<T> = std::result::Result<T, ImportError>;

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn module(&mut self) -> Parsed<Literal> {
        for word in HEADER {
            self.skip_trivia()?;
            let start = self.pos;
            let ident = self.identifier();
            if ident != word {
                return Err(self.error_at(start, format!("expected '{word}'")));
            }
        }
        self.skip_trivia()?;
        self.expect('=')?;
        self.skip_trivia()?;
        if self.peek() != Some('{') {
            return Err(self.error("expected an object literal"));
        }
        let value = self.value()?;
        self.skip_trivia()?;
        if self.peek() == Some(';') {
            self.pos += 1;
            self.skip_trivia()?;
        }
        if self.peek().is_some() {
            return Err(self.error("unexpected content after the object literal"));
        }
        Ok(value)
    }

    fn value(&mut self) -> Parsed<Literal> {
        match self.peek() {
            Some('{' | '[') => self.nested(),
            Some(q @ ('"' | '\'')) => Ok(Literal::String(self.string(q)?)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_char(c) => {
                let start = self.pos;
                match self.identifier().as_str() {
                    "true" | "false" => Ok(Literal::Bool),
                    "null" => Ok(Literal::Null),
                    other => Err(self.error_at(start, format!("unexpected identifier '{other}'"))),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(&mut self) -> Parsed<Literal> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = if self.peek() == Some('{') {
            self.object()
        } else {
            self.array()
        };
        self.depth -= 1;
        value
    }

    fn object(&mut self) -> Parsed<Literal> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Literal::Object(entries));
            }
            let key = match self.peek() {
                Some(q @ ('"' | '\'')) => self.string(q)?,
                Some(c) if is_ident_char(c) => self.identifier(),
                Some(c) => return Err(self.error(format!("expected a key, found '{c}'"))),
                None => return Err(self.error("unterminated object")),
            };
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.value()?;
            entries.push((key, value));
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn array(&mut self) -> Parsed<Literal> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Literal::Array(items));
            }
            if self.peek().is_none() {
                return Err(self.error("unterminated array"));
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected ',' or ']', found '{c}'"))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Parsed<String> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '\n' | '\r' => return Err(self.error_at(start, "unterminated string")),
                '\\' => out.push(self.escape()?),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Parsed<char> {
        let at = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        Ok(match c {
            '"' | '\'' | '\\' | '/' => c,
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let high = self.hex4()?;
                if (0xD800..0xDC00).contains(&high) {
                    if self.peek() != Some('\\') || self.chars.get(self.pos + 1) != Some(&'u') {
                        return Err(self.error_at(at, "unpaired surrogate in escape"));
                    }
                    self.pos += 2;
                    let low = self.hex4()?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error_at(at, "unpaired surrogate in escape"));
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(code).ok_or_else(|| self.error_at(at, "invalid escape"))?
                } else {
                    char::from_u32(high).ok_or_else(|| self.error_at(at, "invalid escape"))?
                }
            }
            other => return Err(self.error_at(at, format!("invalid escape '\\{other}'"))),
        })
    }

    fn hex4(&mut self) -> Parsed<u32> {
        let start = self.pos;
        let digits: String = self.chars.iter().skip(self.pos).take(4).collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error_at(start, "expected four hex digits"));
        }
        let code = u32::from_str_radix(&digits, 16)
            .map_err(|_| self.error_at(start, "expected four hex digits"))?;
        self.pos += 4;
        Ok(code)
    }

    /// JSON number grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
    fn number(&mut self) -> Parsed<Literal> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        match self.peek() {
            Some('0') => self.pos += 1,
            Some('1'..='9') => {
                self.digits();
            }
            _ => return Err(self.invalid_number(start)),
        }
        if self.peek() == Some('.') {
            self.pos += 1;
            if self.digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        if matches!(self.peek(), Some(c) if is_number_char(c)) {
            return Err(self.invalid_number(start));
        }
        Ok(Literal::Number)
    }

    fn invalid_number(&mut self, start: usize) -> ImportError {
        while matches!(self.peek(), Some(c) if is_number_char(c)) {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        self.error_at(start, format!("invalid number '{raw}'"))
    }

    /// Skip ASCII digits, returning how many.
    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_trivia(&mut self) -> Parsed<()> {
        loop {
            match (self.peek(), self.chars.get(self.pos + 1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.chars.get(self.pos + 1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => return Err(self.error_at(start, "unterminated comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, want: char) -> Parsed<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}', found end of input"))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ImportError {
        self.error_at(self.pos, message)
    }

    /// Error at a character offset, reported as one-based line and column.
    fn error_at(&self, offset: usize, message: impl Into<String>) -> ImportError {
        let before = &self.chars[..offset.min(self.chars.len())];
        let line = before.iter().filter(|&&c| c == '\n').count() + 1;
        let column = before.iter().rev().take_while(|&&c| c != '\n').count() + 1;
        ImportError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn schema(path: impl Into<String>, message: impl Into<String>) -> ImportError {
    ImportError::Schema {
        path: path.into(),
        message: message.into(),
    }
}

fn validate(root: Literal) -> std::result::Result<Vec<DialogSet>, ImportError> {
    let entries = match root {
        Literal::Object(entries) => entries,
        other => {
            return Err(schema(
                "dialogs",
                format!("expected an object, found {}", other.kind()),
            ))
        }
    };

    let mut seen = HashSet::new();
    let mut sets = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let path = format!("dialogs[{key:?}]");
        if !EventId::is_valid(&key) {
            return Err(schema(path, "key is not a valid event id"));
        }
        if !seen.insert(key.clone()) {
            return Err(schema(path, "duplicate key"));
        }
        let items = match value {
            Literal::Array(items) => items,
            other => {
                return Err(schema(
                    path,
                    format!("expected an array, found {}", other.kind()),
                ))
            }
        };
        if items.is_empty() {
            return Err(schema(path, "an event needs at least one dialog"));
        }
        let dialogs = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| dialog(&format!("{path}[{i}]"), item))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        sets.push(DialogSet { key, dialogs });
    }
    Ok(sets)
}

fn dialog(path: &str, item: Literal) -> std::result::Result<Dialog, ImportError> {
    let fields = match item {
        Literal::Object(fields) => fields,
        other => {
            return Err(schema(
                path,
                format!("expected an object, found {}", other.kind()),
            ))
        }
    };

    let mut text = None;
    let mut speaker = None;
    let mut image_path = None;
    for (name, value) in fields {
        let field_path = format!("{path}.{name}");
        let slot = match name.as_str() {
            "text" => &mut text,
            "speaker" => &mut speaker,
            "imagePath" => &mut image_path,
            _ => return Err(schema(field_path, "unknown field")),
        };
        if slot.is_some() {
            return Err(schema(field_path, "duplicate field"));
        }
        match value {
            Literal::String(s) => *slot = Some(s),
            other => {
                return Err(schema(
                    field_path,
                    format!("expected a string, found {}", other.kind()),
                ))
            }
        }
    }

    let text = text.ok_or_else(|| schema(format!("{path}.text"), "missing field"))?;
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(schema(
            format!("{path}.text"),
            format!("text is {chars} characters, limit is {MAX_TEXT_CHARS}"),
        ));
    }
    let speaker = match speaker.as_deref() {
        Some("left") => Speaker::Left,
        Some("right") => Speaker::Right,
        Some(other) => {
            return Err(schema(
                format!("{path}.speaker"),
                format!("expected \"left\" or \"right\", found {other:?}"),
            ))
        }
        None => return Err(schema(format!("{path}.speaker"), "missing field")),
    };

    Ok(Dialog {
        text,
        speaker,
        image_path: image_path.unwrap_or_default(),
    })
}
