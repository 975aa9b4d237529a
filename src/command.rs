use std::{iter::Peekable, str::CharIndices};

use crate::{
    diagnostics::{AmaryllisError, Diagnostic, DiagnosticKind, Result, SourceSpan},
    value::Value,
};

/// One line of the registry command language.
#[derive(Debug)]
pub enum Command {
    /// `export <name> <literal>`: bind a value under a symbolic name.
    Export { name: String, value: Value },
    /// `import <name>`: retrieve the value bound to a name.
    Import { name: String },
    /// `exports`: snapshot all current bindings.
    Exports,
}

/// Parses a single command line.
pub fn parse_line(line: &str) -> Result<Command> {
    let mut scanner = Scanner::new(line);
    scanner.skip_whitespace();
    let (keyword, span) = scanner
        .identifier()
        .ok_or_else(|| error("expected a command", scanner_end(line)))?;
    let command = match keyword.as_str() {
        "export" => {
            let name = expect_name(&mut scanner, line)?;
            let value = parse_literal(&mut scanner, line)?;
            Command::Export { name, value }
        }
        "import" => {
            let name = expect_name(&mut scanner, line)?;
            Command::Import { name }
        }
        "exports" => Command::Exports,
        other => {
            return Err(error(format!("unknown command `{other}`"), span));
        }
    };
    expect_end(&mut scanner, line)?;
    Ok(command)
}

fn expect_name(scanner: &mut Scanner<'_>, line: &str) -> Result<String> {
    scanner.skip_whitespace();
    scanner
        .identifier()
        .map(|(name, _)| name)
        .ok_or_else(|| error("expected a symbol name", scanner_end(line)))
}

fn expect_end(scanner: &mut Scanner<'_>, line: &str) -> Result<()> {
    scanner.skip_whitespace();
    if let Some((idx, _)) = scanner.peek() {
        return Err(error(
            "unexpected trailing input",
            SourceSpan::new(idx, line.len()),
        ));
    }
    Ok(())
}

fn parse_literal(scanner: &mut Scanner<'_>, line: &str) -> Result<Value> {
    scanner.skip_whitespace();
    match scanner.peek() {
        None => Err(error("expected a literal", scanner_end(line))),
        Some((_, '"')) => parse_string(scanner, line),
        Some((_, '[')) => parse_array(scanner, line),
        Some((_, ch)) if ch.is_ascii_digit() || ch == '-' => parse_number(scanner, line),
        Some((_, ch)) if ch.is_ascii_alphabetic() || ch == '_' => {
            let (word, span) = scanner
                .identifier()
                .expect("caller checked for identifier start");
            match word.as_str() {
                "true" => Ok(Value::bool(true)),
                "false" => Ok(Value::bool(false)),
                "none" => Ok(Value::unit()),
                "object" => Ok(Value::opaque()),
                other => Err(error(format!("unknown literal `{other}`"), span)),
            }
        }
        Some((idx, ch)) => Err(error(
            format!("unexpected character `{ch}`"),
            SourceSpan::new(idx, idx + ch.len_utf8()),
        )),
    }
}

fn parse_string(scanner: &mut Scanner<'_>, line: &str) -> Result<Value> {
    let (start, _) = scanner.bump().expect("caller checked for opening quote");
    let mut text = String::new();
    loop {
        match scanner.bump() {
            Some((_, '"')) => return Ok(Value::string(text)),
            Some((idx, '\\')) => match scanner.bump() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, '"')) => text.push('"'),
                Some((_, other)) => {
                    return Err(error(
                        format!("unsupported escape `\\{other}`"),
                        SourceSpan::new(idx, idx + 2),
                    ));
                }
                None => {
                    return Err(error(
                        "unterminated string literal",
                        SourceSpan::new(start, line.len()),
                    ));
                }
            },
            Some((_, ch)) => text.push(ch),
            None => {
                return Err(error(
                    "unterminated string literal",
                    SourceSpan::new(start, line.len()),
                ));
            }
        }
    }
}

fn parse_array(scanner: &mut Scanner<'_>, line: &str) -> Result<Value> {
    let (start, _) = scanner.bump().expect("caller checked for opening bracket");
    let mut values = Vec::new();
    scanner.skip_whitespace();
    if matches!(scanner.peek(), Some((_, ']'))) {
        scanner.bump();
        return Ok(Value::array(values));
    }
    loop {
        values.push(parse_literal(scanner, line)?);
        scanner.skip_whitespace();
        match scanner.bump() {
            Some((_, ',')) => {
                scanner.skip_whitespace();
            }
            Some((_, ']')) => return Ok(Value::array(values)),
            Some((idx, ch)) => {
                return Err(error(
                    format!("expected `,` or `]` in array literal, found `{ch}`"),
                    SourceSpan::new(idx, idx + ch.len_utf8()),
                ));
            }
            None => {
                return Err(error(
                    "unterminated array literal",
                    SourceSpan::new(start, line.len()),
                ));
            }
        }
    }
}

fn parse_number(scanner: &mut Scanner<'_>, line: &str) -> Result<Value> {
    let start = scanner.position(line);
    let mut text = String::new();
    if matches!(scanner.peek(), Some((_, '-'))) {
        let (_, ch) = scanner.bump().expect("peeked minus sign");
        text.push(ch);
    }
    let mut is_float = false;
    while let Some((_, ch)) = scanner.peek() {
        if ch.is_ascii_digit() {
            text.push(ch);
            scanner.bump();
        } else if ch == '.' && !is_float {
            is_float = true;
            text.push(ch);
            scanner.bump();
        } else {
            break;
        }
    }
    let span = SourceSpan::new(start, scanner.position(line));
    if is_float {
        text.parse::<f64>()
            .map(Value::float)
            .map_err(|_| error(format!("invalid float literal `{text}`"), span))
    } else {
        text.parse::<i64>()
            .map(Value::int)
            .map_err(|_| error(format!("invalid integer literal `{text}`"), span))
    }
}

fn error(message: impl Into<String>, span: SourceSpan) -> AmaryllisError {
    AmaryllisError::from(Diagnostic::new(DiagnosticKind::Command, message).with_span(span))
}

fn scanner_end(line: &str) -> SourceSpan {
    SourceSpan::new(line.len(), line.len())
}

struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn position(&mut self, source: &str) -> usize {
        self.peek().map(|(idx, _)| idx).unwrap_or(source.len())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, ch)) if ch.is_whitespace()) {
            self.bump();
        }
    }

    /// Consumes `[A-Za-z_][A-Za-z0-9_]*` and returns it with its span.
    fn identifier(&mut self) -> Option<(String, SourceSpan)> {
        let (start, first) = self.peek()?;
        if !first.is_ascii_alphabetic() && first != '_' {
            return None;
        }
        let mut text = String::new();
        let mut end = start;
        while let Some((idx, ch)) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                end = idx + ch.len_utf8();
                self.bump();
            } else {
                break;
            }
        }
        Some((text, SourceSpan::new(start, end)))
    }
}
