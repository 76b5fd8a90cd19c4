//! Rendering of a contract's output.

use crate::error::{Result, SolcError};
use serde_json::Value;
use std::{fmt, str::FromStr};
use yansi::Paint;

/// Width at which [OutputFormat::Raw] breaks containers over multiple lines.
const BREAK_LENGTH: usize = 80;

/// How the output of a contract is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Pretty printed json
    #[default]
    Json,
    /// Compact json
    JsonMin,
    /// A human readable dump of the whole output
    Raw,
    /// An ES module exporting every output as a `const`
    Module,
    /// A CommonJS module assigning every output to `exports`
    Cjs,
}

impl OutputFormat {
    pub const VARIANTS: &'static [Self] =
        &[Self::Json, Self::JsonMin, Self::Raw, Self::Module, Self::Cjs];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::JsonMin => "JSON-MIN",
            Self::Raw => "RAW",
            Self::Module => "MODULE",
            Self::Cjs => "CJS",
        }
    }

    /// Renders `output`. `color` only affects [OutputFormat::Raw].
    pub fn format(&self, output: &Value, color: bool) -> Result<String> {
        let formatted = match self {
            Self::Json => serde_json::to_string_pretty(output)?,
            Self::JsonMin => serde_json::to_string(output)?,
            Self::Raw => Inspector { color }.render(output, 0, 0).text,
            Self::Module => module(output, |name| format!("export const {name}"))?,
            Self::Cjs => module(output, |name| format!("exports.{name}"))?,
        };
        Ok(formatted)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown output format \"{s}\""))
    }
}

/// One `<binding> = <literal>` statement per property, separated by blank lines.
fn module(output: &Value, binding: impl Fn(&str) -> String) -> Result<String> {
    let Value::Object(properties) = output else {
        return Err(SolcError::msg("only objects can be rendered as a module"));
    };
    let statements: Vec<_> = properties
        .iter()
        .map(|(name, value)| format!("{} = {}", binding(name), js_literal(value, 0)))
        .collect();
    Ok(statements.join(";\n\n"))
}

/// Renders `value` as a javascript literal, every container element on its own line.
fn js_literal(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent + 1);
    let close = "  ".repeat(indent);
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(items) => {
            let items: Vec<_> =
                items.iter().map(|item| format!("{pad}{}", js_literal(item, indent + 1))).collect();
            format!("[\n{}\n{close}]", items.join(",\n"))
        }
        Value::Object(map) => {
            let entries: Vec<_> = map
                .iter()
                .map(|(key, value)| {
                    format!("{pad}{}: {}", key_literal(key), js_literal(value, indent + 1))
                })
                .collect();
            format!("{{\n{}\n{close}}}", entries.join(",\n"))
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn key_literal(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Single quotes `s`, escaping quotes, backslashes and control characters.
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// A rendered value and its width without color codes.
struct Rendered {
    text: String,
    width: usize,
}

impl Rendered {
    fn plain(text: String) -> Self {
        Self { width: text.chars().count(), text }
    }

    fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}

/// Dumps values the way node's `util.inspect` does: containers stay on one line while they fit
/// in [BREAK_LENGTH] columns.
struct Inspector {
    color: bool,
}

impl Inspector {
    /// Renders `value` starting at `column`, nested lines are indented by `indent`.
    fn render(&self, value: &Value, indent: usize, column: usize) -> Rendered {
        match value {
            Value::Null => self.paint("null".to_string(), Paint::new),
            Value::Bool(b) => self.paint(b.to_string(), Paint::yellow),
            Value::Number(n) => self.paint(n.to_string(), Paint::yellow),
            Value::String(s) => self.paint(quote(s), Paint::green),
            Value::Array(items) if items.is_empty() => Rendered::plain("[]".to_string()),
            Value::Object(map) if map.is_empty() => Rendered::plain("{}".to_string()),
            Value::Array(items) => {
                let items =
                    items.iter().map(|item| self.render(item, indent + 2, indent + 2)).collect();
                self.container(items, ('[', ']'), indent, column)
            }
            Value::Object(map) => {
                let entries = map
                    .iter()
                    .map(|(key, value)| {
                        let key = key_literal(key);
                        let key_width = key.chars().count() + 2;
                        let value = self.render(value, indent + 2, indent + 2 + key_width);
                        Rendered {
                            width: key_width + value.width,
                            text: format!("{key}: {}", value.text),
                        }
                    })
                    .collect();
                self.container(entries, ('{', '}'), indent, column)
            }
        }
    }

    fn container(
        &self,
        entries: Vec<Rendered>,
        (open, close): (char, char),
        indent: usize,
        column: usize,
    ) -> Rendered {
        // `{ ` + entries separated by `, ` + ` }`
        let width = entries.iter().map(|entry| entry.width).sum::<usize>() + entries.len() * 2 + 2;
        if column + width <= BREAK_LENGTH && !entries.iter().any(Rendered::is_multiline) {
            let entries: Vec<_> = entries.into_iter().map(|entry| entry.text).collect();
            return Rendered { text: format!("{open} {} {close}", entries.join(", ")), width };
        }

        let pad = " ".repeat(indent + 2);
        let entries: Vec<_> =
            entries.into_iter().map(|entry| format!("{pad}{}", entry.text)).collect();
        let text = format!("{open}\n{}\n{}{close}", entries.join(",\n"), " ".repeat(indent));
        Rendered::plain(text)
    }

    fn paint(&self, text: String, style: fn(String) -> Paint<String>) -> Rendered {
        let width = text.chars().count();
        if self.color {
            Rendered { text: style(text).to_string(), width }
        } else {
            Rendered { text, width }
        }
    }
}
