//! In-memory model of a gettext catalog.
//!
//! A [`Catalog`] is an ordered list of [`Entry`] records plus an optional
//! header entry. The model keeps every comment kind and plural form so a
//! catalog can be written back without losing anything the resolver did not
//! touch.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// The flag that marks a translation as needing review.
pub const FUZZY_FLAG: &str = "fuzzy";

/// Ordered, duplicate-free set of entry flags (`#, fuzzy, c-format`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags(Vec<String>);

impl Flags {
    /// Add every flag listed in the body of a `#,` comment.
    pub fn add_all(&mut self, body: &str) {
        for flag in body.split(',') {
            self.add(flag);
        }
    }

    pub fn has(&self, flag: &str) -> bool {
        self.0.iter().any(|f| f == flag)
    }

    /// Add a flag; blank and duplicate flags are ignored.
    pub fn add(&mut self, flag: &str) {
        let flag = flag.trim();
        if !flag.is_empty() && !self.has(flag) {
            self.0.push(flag.to_string());
        }
    }

    /// Remove a flag. Returns `true` if it was present.
    pub fn remove(&mut self, flag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f != flag);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One translation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// `# ` comments written by translators.
    pub translator_comments: Vec<String>,
    /// `#.` comments extracted from the source code.
    pub extracted_comments: Vec<String>,
    /// `#:` source references, one line each.
    pub references: Vec<String>,
    /// `#,` flags.
    pub flags: Flags,
    /// `#|` previous-string lines, kept verbatim.
    pub previous: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    /// Singular translation. Unused when `msgid_plural` is set.
    pub msgstr: String,
    /// `msgstr[N]` translations, indexed by plural form.
    pub msgstr_plural: Vec<String>,
    /// Obsolete entry (`#~` lines).
    pub disabled: bool,
}

impl Entry {
    /// Build a singular entry with a translation.
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            msgstr: msgstr.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, msgctxt: impl Into<String>) -> Self {
        self.msgctxt = Some(msgctxt.into());
        self
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flags.add(flag);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    /// The header entry has an empty `msgid` and no context.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }

    /// The translated text: `msgstr`, or `msgstr[0]` for plural entries.
    /// `None` when there is no translation.
    pub fn translation(&self) -> Option<&str> {
        let text = if self.is_plural() {
            self.msgstr_plural.first().map(String::as_str)?
        } else {
            self.msgstr.as_str()
        };
        (!text.is_empty()).then_some(text)
    }

    /// Overwrite the translated text (`msgstr[0]` for plural entries).
    pub fn set_translation(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.is_plural() {
            match self.msgstr_plural.first_mut() {
                Some(first) => *first = text,
                None => self.msgstr_plural.push(text),
            }
        } else {
            self.msgstr = text;
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A full PO catalog: the header plus the ordered translation records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// The `msgid ""` header entry, if the file has one.
    pub header: Option<Entry>,
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Number of records, not counting the header.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for Catalog {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            header: None,
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_add_all_keeps_order() {
        let mut flags = Flags::default();
        flags.add_all(" fuzzy, c-format ,fuzzy,, ");
        flags.add_all("c-format, no-wrap");
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec!["fuzzy", "c-format", "no-wrap"]
        );
        assert!(flags.has("c-format"));
        assert!(!flags.has("php-format"));
    }

    #[test]
    fn test_flags_remove() {
        let mut flags = Flags::default();
        flags.add_all("fuzzy, c-format");
        assert!(flags.remove(FUZZY_FLAG));
        assert!(!flags.remove(FUZZY_FLAG));
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn test_translation_empty_is_none() {
        let entry = Entry::new("Hello", "");
        assert_eq!(entry.translation(), None);
    }

    #[test]
    fn test_plural_translation_uses_first_form() {
        let mut entry = Entry {
            msgid: "file".into(),
            msgid_plural: Some("files".into()),
            msgstr_plural: vec!["fichier".into(), "fichiers".into()],
            ..Entry::default()
        };
        assert_eq!(entry.translation(), Some("fichier"));

        entry.set_translation("document");
        assert_eq!(entry.msgstr_plural, vec!["document", "fichiers"]);
        assert!(entry.msgstr.is_empty());
    }

    #[test]
    fn test_header_detection() {
        assert!(Entry::new("", "Project-Id-Version: x\n").is_header());
        assert!(!Entry::new("", "").with_context("menu").is_header());
    }

    #[test]
    fn test_catalog_from_iter() {
        let catalog: Catalog = vec![Entry::new("a", "b"), Entry::new("c", "d")]
            .into_iter()
            .collect();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.header.is_none());
    }
}
