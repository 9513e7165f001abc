//! Serializer for PO catalog text.

use crate::catalog::{Catalog, Entry};

/// Render a catalog as PO text: header first, entries separated by one
/// blank line.
pub fn to_po_string(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (index, entry) in catalog.header.iter().chain(catalog.entries()).enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_entry(&mut out, entry);
    }
    out
}

fn write_entry(out: &mut String, entry: &Entry) {
    for comment in &entry.translator_comments {
        if comment.is_empty() {
            out.push_str("#\n");
        } else {
            push_line(out, "# ", comment);
        }
    }
    for comment in &entry.extracted_comments {
        push_line(out, "#. ", comment);
    }
    for reference in &entry.references {
        push_line(out, "#: ", reference);
    }
    if !entry.flags.is_empty() {
        let flags = entry.flags.iter().collect::<Vec<_>>().join(", ");
        push_line(out, "#, ", &flags);
    }

    let (previous_prefix, prefix) = if entry.disabled {
        ("#~| ", "#~ ")
    } else {
        ("#| ", "")
    };
    for previous in &entry.previous {
        push_line(out, previous_prefix, previous);
    }

    if let Some(ctxt) = &entry.msgctxt {
        write_keyword(out, prefix, "msgctxt", ctxt);
    }
    write_keyword(out, prefix, "msgid", &entry.msgid);
    match &entry.msgid_plural {
        Some(plural) => {
            write_keyword(out, prefix, "msgid_plural", plural);
            if entry.msgstr_plural.is_empty() {
                write_keyword(out, prefix, "msgstr[0]", "");
            }
            for (index, form) in entry.msgstr_plural.iter().enumerate() {
                write_keyword(out, prefix, &format!("msgstr[{index}]"), form);
            }
        }
        None => write_keyword(out, prefix, "msgstr", &entry.msgstr),
    }
}

fn push_line(out: &mut String, prefix: &str, text: &str) {
    out.push_str(prefix);
    out.push_str(text);
    out.push('\n');
}

/// Write `keyword "value"`. Values with an interior line break use the
/// gettext layout: an empty first string, then one line per chunk.
fn write_keyword(out: &mut String, prefix: &str, keyword: &str, value: &str) {
    let chunks: Vec<&str> = value.split_inclusive('\n').collect();

    out.push_str(prefix);
    out.push_str(keyword);
    if chunks.len() <= 1 {
        out.push_str(" \"");
        out.push_str(&escape(value));
        out.push_str("\"\n");
        return;
    }

    out.push_str(" \"\"\n");
    for chunk in chunks {
        out.push_str(prefix);
        out.push('"');
        out.push_str(&escape(chunk));
        out.push_str("\"\n");
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{7}' => escaped.push_str("\\a"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            '\u{b}' => escaped.push_str("\\v"),
            other if other.is_ascii_control() => {
                escaped.push_str(&format!("\\{:03o}", u32::from(other)));
            }
            other => escaped.push(other),
        }
    }
    escaped
}
