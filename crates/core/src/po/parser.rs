//! Parser for PO catalog text.
//!
//! Line-oriented: blank lines separate entries, comments attach to the entry
//! that follows them, and `"..."` continuation lines extend the last keyword.
//! Malformed input fails fast with the offending line number.

use std::path::Path;

use tracing::{debug, warn};

use crate::catalog::{Catalog, Entry};
use crate::errors::CatalogError;

/// Which string the next continuation line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str,
    StrPlural(usize),
}

/// Accumulates the lines of a single entry.
#[derive(Debug, Default)]
struct EntryBuilder {
    entry: Entry,
    last: Option<Field>,
    has_msgid: bool,
    has_msgstr: bool,
    has_content: bool,
    start_line: usize,
}

impl EntryBuilder {
    fn touch(&mut self, line: usize) {
        if !self.has_content {
            self.has_content = true;
            self.start_line = line;
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Context => self.entry.msgctxt.get_or_insert_with(String::new),
            Field::Id => &mut self.entry.msgid,
            Field::IdPlural => self.entry.msgid_plural.get_or_insert_with(String::new),
            Field::Str => &mut self.entry.msgstr,
            Field::StrPlural(index) => {
                let forms = &mut self.entry.msgstr_plural;
                if forms.len() <= index {
                    forms.resize(index + 1, String::new());
                }
                &mut forms[index]
            }
        }
    }
}

struct Parser<'a> {
    origin: &'a Path,
    catalog: Catalog,
    current: EntryBuilder,
}

/// Parse PO text into a [`Catalog`].
///
/// `origin` is only used to label errors.
pub fn parse(text: &str, origin: &Path) -> Result<Catalog, CatalogError> {
    debug!("parsing PO text ({} bytes)", text.len());
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut parser = Parser {
        origin,
        catalog: Catalog::new(),
        current: EntryBuilder::default(),
    };

    for (index, raw) in text.lines().enumerate() {
        parser.line(index + 1, raw.trim())?;
    }
    parser.finish()?;

    debug!(count = parser.catalog.len(), "parsed PO entries");
    Ok(parser.catalog)
}

impl Parser<'_> {
    fn error(&self, line: usize, detail: impl Into<String>) -> CatalogError {
        CatalogError::Parse {
            path: self.origin.to_path_buf(),
            line,
            detail: detail.into(),
        }
    }

    fn line(&mut self, number: usize, line: &str) -> Result<(), CatalogError> {
        if line.is_empty() {
            return self.finish();
        }

        if let Some(rest) = line.strip_prefix("#~") {
            if let Some(previous) = rest.strip_prefix('|') {
                self.comment_boundary()?;
                self.current.touch(number);
                self.current.entry.disabled = true;
                self.current.entry.previous.push(strip_one_space(previous).to_string());
                return Ok(());
            }
            let rest = rest.trim_start();
            if rest.is_empty() {
                return Ok(());
            }
            return self.keyword(number, rest, true);
        }

        if let Some(rest) = line.strip_prefix('#') {
            self.comment_boundary()?;
            self.current.touch(number);
            let entry = &mut self.current.entry;
            match rest.chars().next() {
                Some(',') => entry.flags.add_all(&rest[1..]),
                Some(':') => entry.references.push(rest[1..].trim().to_string()),
                Some('.') => entry
                    .extracted_comments
                    .push(strip_one_space(&rest[1..]).to_string()),
                Some('|') => entry.previous.push(strip_one_space(&rest[1..]).to_string()),
                _ => entry
                    .translator_comments
                    .push(strip_one_space(rest).to_string()),
            }
            return Ok(());
        }

        self.keyword(number, line, false)
    }

    /// A comment after a complete entry starts the next one.
    fn comment_boundary(&mut self) -> Result<(), CatalogError> {
        if self.current.has_msgstr {
            self.finish()?;
        }
        Ok(())
    }

    fn keyword(&mut self, number: usize, line: &str, obsolete: bool) -> Result<(), CatalogError> {
        if line.starts_with('"') {
            let Some(field) = self.current.last else {
                return Err(self.error(number, "string continuation without a keyword"));
            };
            let value = unquote(line).map_err(|detail| self.error(number, detail))?;
            self.current.field_mut(field).push_str(&value);
            return Ok(());
        }

        let Some((keyword, rest)) = line.split_once(char::is_whitespace) else {
            return Err(self.error(number, format!("expected a string after '{line}'")));
        };
        let value = unquote(rest.trim())
            .map_err(|detail| self.error(number, format!("{detail} after '{keyword}'")))?;

        let field = match keyword {
            "msgctxt" => {
                if self.current.has_msgstr {
                    self.finish()?;
                }
                if self.current.has_msgid {
                    return Err(self.error(number, "msgctxt after msgid"));
                }
                Field::Context
            }
            "msgid" => {
                if self.current.has_msgstr {
                    self.finish()?;
                }
                if self.current.has_msgid {
                    return Err(self.error(number, "duplicate msgid"));
                }
                self.current.has_msgid = true;
                Field::Id
            }
            "msgid_plural" => {
                if !self.current.has_msgid || self.current.has_msgstr {
                    return Err(self.error(number, "msgid_plural must follow msgid"));
                }
                Field::IdPlural
            }
            "msgstr" => {
                if !self.current.has_msgid {
                    return Err(self.error(number, "msgstr without msgid"));
                }
                if self.current.entry.msgid_plural.is_some() {
                    return Err(self.error(number, "plural entry needs indexed msgstr[N]"));
                }
                self.current.has_msgstr = true;
                Field::Str
            }
            other => {
                let index = other
                    .strip_prefix("msgstr[")
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| self.error(number, format!("unknown keyword '{other}'")))?;
                let index: usize = index
                    .parse()
                    .map_err(|_| self.error(number, format!("invalid plural index in '{other}'")))?;
                if !self.current.has_msgid {
                    return Err(self.error(number, "msgstr without msgid"));
                }
                if self.current.entry.msgid_plural.is_none() {
                    return Err(self.error(number, format!("'{other}' without msgid_plural")));
                }
                // Plural forms are dense: each index is at most one past the last.
                if index > self.current.entry.msgstr_plural.len() {
                    return Err(
                        self.error(number, format!("plural index out of order in '{other}'"))
                    );
                }
                self.current.has_msgstr = true;
                Field::StrPlural(index)
            }
        };

        self.current.touch(number);
        self.current.entry.disabled |= obsolete;
        *self.current.field_mut(field) = value;
        self.current.last = Some(field);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CatalogError> {
        let builder = std::mem::take(&mut self.current);
        if !builder.has_content {
            return Ok(());
        }
        if !builder.has_msgid {
            warn!(
                line = builder.start_line,
                "dropping comment block that is not attached to an entry"
            );
            return Ok(());
        }

        let entry = builder.entry;
        if self.catalog.header.is_none() && !entry.disabled && entry.is_header() {
            self.catalog.header = Some(entry);
        } else {
            self.catalog.push(entry);
        }
        Ok(())
    }
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

/// Remove the surrounding quotes and decode C escape sequences.
///
/// Fails with a short description when the text is not a complete quoted
/// string or contains an escape gettext does not accept.
fn unquote(s: &str) -> Result<String, String> {
    let body = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| "unterminated string".to_string())?;

    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        // A trailing backslash escapes the closing quote.
        let Some(escape) = chars.next() else {
            return Err("unterminated string".into());
        };
        let decoded = match escape {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '"' | '\\' | '\'' | '?' => escape,
            '0'..='7' => {
                let mut value = escape as u32 - '0' as u32;
                for _ in 0..2 {
                    let Some(digit) = chars.peek().and_then(|d| d.to_digit(8)) else {
                        break;
                    };
                    value = value * 8 + digit;
                    chars.next();
                }
                ascii_escape(value)?
            }
            'x' => {
                let mut value = 0;
                let mut digits = 0;
                while digits < 2 {
                    let Some(digit) = chars.peek().and_then(|d| d.to_digit(16)) else {
                        break;
                    };
                    value = value * 16 + digit;
                    digits += 1;
                    chars.next();
                }
                if digits == 0 {
                    return Err("'\\x' escape without hex digits".into());
                }
                ascii_escape(value)?
            }
            other => return Err(format!("invalid escape sequence '\\{other}'")),
        };
        result.push(decoded);
    }
    Ok(result)
}

/// Numeric escapes must name an ASCII character; catalog text is UTF-8.
fn ascii_escape(value: u32) -> Result<char, String> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .map(char::from)
        .ok_or_else(|| format!("escape value {value:#x} is outside ASCII"))
}
