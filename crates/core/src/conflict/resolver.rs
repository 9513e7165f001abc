//! Catalog-wide conflict resolution.
//!
//! The [`ConflictResolver`] walks every record of a catalog once, keeps the
//! variant of the requested revision in each conflicted record, and folds the
//! per-record [`Outcome`]s into a [`ResolveReport`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::catalog::{Catalog, Entry, FUZZY_FLAG};
use crate::errors::ConflictError;

use super::extract::{is_conflicted, VariantMatcher};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The conflicted text was replaced by the requested variant.
    Resolved,
    /// Disabled, untranslated, or free of conflict markers.
    Unmodified,
    /// Conflicted, but no variant exists for the requested label.
    Unmatched,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved => write!(f, "resolved"),
            Self::Unmodified => write!(f, "unmodified"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Tallies for one run. `total == resolved + unmodified + unmatched`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub total: usize,
    pub resolved: usize,
    pub unmodified: usize,
    pub unmatched: usize,
}

impl RunCounters {
    /// Count one more record.
    pub fn record(mut self, outcome: Outcome) -> Self {
        self.total += 1;
        match outcome {
            Outcome::Resolved => self.resolved += 1,
            Outcome::Unmodified => self.unmodified += 1,
            Outcome::Unmatched => self.unmatched += 1,
        }
        self
    }
}

/// A conflicted record the label could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    /// The translation as it was left, markers included.
    pub translation: String,
}

impl From<&Entry> for UnmatchedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            msgctxt: entry.msgctxt.clone(),
            msgid: entry.msgid.clone(),
            translation: entry.translation().unwrap_or_default().to_string(),
        }
    }
}

/// Result of resolving a whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReport {
    pub label: String,
    pub counters: RunCounters,
    pub unmatched: Vec<UnmatchedEntry>,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Keeps one revision's variant in every conflicted record.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    label: String,
    keep_fuzzy: bool,
    matcher: VariantMatcher,
}

impl ConflictResolver {
    /// Create a resolver for `label`. With `keep_fuzzy` the `fuzzy` flag of
    /// resolved records is left alone; otherwise it is cleared.
    pub fn new(label: impl Into<String>, keep_fuzzy: bool) -> Result<Self, ConflictError> {
        let label = label.into();
        let matcher = VariantMatcher::new(&label)?;
        Ok(Self {
            label,
            keep_fuzzy,
            matcher,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolve every record of `catalog` in place.
    ///
    /// The header entry is not a translation record and is left untouched.
    pub fn resolve(&self, catalog: &mut Catalog) -> ResolveReport {
        info!(
            label = %self.label,
            entries = catalog.len(),
            keep_fuzzy = self.keep_fuzzy,
            "resolving catalog conflicts"
        );

        let initial = ResolveReport {
            label: self.label.clone(),
            ..ResolveReport::default()
        };
        let report = catalog
            .entries_mut()
            .iter_mut()
            .fold(initial, |mut report, entry| {
                let outcome = self.resolve_entry(entry);
                trace!(msgid = %entry.msgid, %outcome, "record processed");
                if outcome == Outcome::Unmatched {
                    report.unmatched.push(UnmatchedEntry::from(&*entry));
                }
                report.counters = report.counters.record(outcome);
                report
            });

        info!(
            total = report.counters.total,
            resolved = report.counters.resolved,
            unmodified = report.counters.unmodified,
            unmatched = report.counters.unmatched,
            "conflict resolution finished"
        );
        report
    }

    /// Resolve a single record in place.
    pub fn resolve_entry(&self, entry: &mut Entry) -> Outcome {
        if entry.disabled {
            return Outcome::Unmodified;
        }
        let Some(text) = entry.translation() else {
            return Outcome::Unmodified;
        };
        if !is_conflicted(text) {
            return Outcome::Unmodified;
        }

        let Some(variant) = self.matcher.extract(text).map(str::to_owned) else {
            warn!(
                label = %self.label,
                translation = %text,
                "revision label not found in conflicted translation"
            );
            return Outcome::Unmatched;
        };

        debug!(msgid = %entry.msgid, variant = %variant, "conflict resolved");
        entry.set_translation(variant);

        // Other plural forms carry their own markers.
        if entry.is_plural() {
            for form in entry.msgstr_plural.iter_mut().skip(1) {
                if !is_conflicted(form) {
                    continue;
                }
                if let Some(variant) = self.matcher.extract(form).map(str::to_owned) {
                    *form = variant;
                }
            }
        }

        if !self.keep_fuzzy && entry.flags.remove(FUZZY_FLAG) {
            debug!(msgid = %entry.msgid, "fuzzy flag cleared");
        }

        Outcome::Resolved
    }
}

/// Resolve `catalog` in place, keeping the `label` variant of each conflict.
pub fn resolve(
    catalog: &mut Catalog,
    label: &str,
    keep_fuzzy: bool,
) -> Result<ResolveReport, ConflictError> {
    Ok(ConflictResolver::new(label, keep_fuzzy)?.resolve(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFLICTED: &str =
        "#-#-#-#-#  ours r1  #-#-#-#-#\nHello\n#-#-#-#-#  theirs r2  #-#-#-#-#\nHola\n";

    fn assert_consistent(counters: &RunCounters) {
        assert_eq!(
            counters.total,
            counters.resolved + counters.unmodified + counters.unmatched
        );
    }

    #[test]
    fn test_resolve_ours() {
        let mut entry = Entry::new("Hello", CONFLICTED);
        let resolver = ConflictResolver::new("ours", false).unwrap();
        assert_eq!(resolver.resolve_entry(&mut entry), Outcome::Resolved);
        assert_eq!(entry.msgstr, "Hello");
    }

    #[test]
    fn test_outcome_display_matches_serde_name() {
        for outcome in [Outcome::Resolved, Outcome::Unmodified, Outcome::Unmatched] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{outcome}\""));
        }
    }

    #[test]
    fn test_unmatched_label_leaves_text() {
        let mut catalog: Catalog = std::iter::once(Entry::new("Hello", CONFLICTED)).collect();
        let report = resolve(&mut catalog, "mine", false).unwrap();

        assert_eq!(catalog.entries()[0].msgstr, CONFLICTED);
        assert_eq!(report.counters.unmatched, 1);
        assert_eq!(report.unmatched[0].msgid, "Hello");
        assert_eq!(report.unmatched[0].translation, CONFLICTED);
        assert_eq!(report.label, "mine");
    }

    #[test]
    fn test_unmarked_entry_untouched() {
        let mut entry = Entry::new("Hello", "Bonjour").with_flag(FUZZY_FLAG);
        let before = entry.clone();
        let resolver = ConflictResolver::new("ours", false).unwrap();
        assert_eq!(resolver.resolve_entry(&mut entry), Outcome::Unmodified);
        assert_eq!(entry, before);
    }

    #[test]
    fn test_disabled_entry_untouched() {
        let mut entry = Entry::new("Hello", CONFLICTED).with_flag(FUZZY_FLAG).disabled();
        let before = entry.clone();
        let resolver = ConflictResolver::new("ours", false).unwrap();
        assert_eq!(resolver.resolve_entry(&mut entry), Outcome::Unmodified);
        assert_eq!(entry, before);
    }

    #[test]
    fn test_untranslated_entry_is_unmodified() {
        let mut entry = Entry::new("Hello", "");
        let resolver = ConflictResolver::new("ours", false).unwrap();
        assert_eq!(resolver.resolve_entry(&mut entry), Outcome::Unmodified);
    }

    #[test]
    fn test_fuzzy_cleared_by_default() {
        let mut entry = Entry::new("Hello", CONFLICTED)
            .with_flag(FUZZY_FLAG)
            .with_flag("c-format");
        ConflictResolver::new("ours", false)
            .unwrap()
            .resolve_entry(&mut entry);
        assert!(!entry.flags.has(FUZZY_FLAG));
        assert!(entry.flags.has("c-format"));
    }

    #[test]
    fn test_fuzzy_kept_on_request() {
        let mut entry = Entry::new("Hello", CONFLICTED).with_flag(FUZZY_FLAG);
        ConflictResolver::new("ours", true)
            .unwrap()
            .resolve_entry(&mut entry);
        assert_eq!(entry.msgstr, "Hello");
        assert!(entry.flags.has(FUZZY_FLAG));
    }

    #[test]
    fn test_unmatched_keeps_fuzzy() {
        let mut entry = Entry::new("Hello", CONFLICTED).with_flag(FUZZY_FLAG);
        ConflictResolver::new("mine", false)
            .unwrap()
            .resolve_entry(&mut entry);
        assert!(entry.flags.has(FUZZY_FLAG));
    }

    #[test]
    fn test_empty_catalog() {
        let mut catalog = Catalog::new();
        let report = resolve(&mut catalog, "ours", false).unwrap();
        assert_eq!(report.counters, RunCounters::default());
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn test_counters_over_mixed_catalog() {
        let mut catalog: Catalog = vec![
            Entry::new("a", CONFLICTED),
            Entry::new("b", "plain"),
            Entry::new("c", "#-#-#-#-#  theirs r2  #-#-#-#-#\nOnly theirs\n"),
            Entry::new("d", CONFLICTED).disabled(),
            Entry::new("e", ""),
            Entry::new("f", CONFLICTED).with_context("menu"),
        ]
        .into_iter()
        .collect();

        let report = resolve(&mut catalog, "ours", false).unwrap();
        assert_eq!(
            report.counters,
            RunCounters {
                total: 6,
                resolved: 2,
                unmodified: 3,
                unmatched: 1,
            }
        );
        assert_consistent(&report.counters);
        assert_eq!(report.unmatched[0].msgid, "c");
        assert_eq!(catalog.entries()[5].msgstr, "Hello");
    }

    #[test]
    fn test_header_not_counted_or_touched() {
        let mut catalog = Catalog::new();
        let header = Entry::new(
            "",
            "#-#-#-#-#  ours r1  #-#-#-#-#\nProject-Id-Version: a\n",
        );
        catalog.header = Some(header.clone());

        let report = resolve(&mut catalog, "ours", false).unwrap();
        assert_eq!(report.counters.total, 0);
        assert_eq!(catalog.header, Some(header));
    }

    #[test]
    fn test_plural_forms_resolved_together() {
        let mut entry = Entry {
            msgid: "file".into(),
            msgid_plural: Some("files".into()),
            msgstr_plural: vec![
                "#-#-#-#-#  ours r1  #-#-#-#-#\nfichier\n#-#-#-#-#  theirs r2  #-#-#-#-#\ndoc\n".into(),
                "#-#-#-#-#  ours r1  #-#-#-#-#\nfichiers\n#-#-#-#-#  theirs r2  #-#-#-#-#\ndocs\n".into(),
                "#-#-#-#-#  theirs r2  #-#-#-#-#\nonly theirs\n".into(),
            ],
            ..Entry::default()
        };
        let outcome = ConflictResolver::new("ours", false)
            .unwrap()
            .resolve_entry(&mut entry);
        assert_eq!(outcome, Outcome::Resolved);
        assert_eq!(entry.msgstr_plural[0], "fichier");
        assert_eq!(entry.msgstr_plural[1], "fichiers");
        assert!(entry.msgstr_plural[2].starts_with("#-#-#-#-#  theirs"));
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!(matches!(
            ConflictResolver::new("", false),
            Err(ConflictError::EmptyLabel)
        ));
    }

    #[test]
    fn test_report_serializes() {
        let report = ResolveReport {
            label: "ours".into(),
            counters: RunCounters::default().record(Outcome::Resolved),
            unmatched: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["counters"]["resolved"], 1);
        assert_eq!(json["counters"]["total"], 1);
    }
}
