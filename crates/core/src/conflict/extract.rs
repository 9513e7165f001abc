//! Extraction of one revision's variant from a conflicted translation.
//!
//! Merge tools such as `msgcat` join diverging translations into a single
//! string, each variant introduced by a marker line:
//!
//! ```text
//! #-#-#-#-#  ours.po (project 1.0)  #-#-#-#-#
//! Hello
//! #-#-#-#-#  theirs.po (project 1.0)  #-#-#-#-#
//! Hola
//! ```
//!
//! Only the first line after the matching marker is captured. Multi-line
//! variants come back truncated to their first line.

use regex_lite::Regex;

use crate::errors::ConflictError;

/// Boundary sequence that opens every conflict marker line.
pub const CONFLICT_MARKER: &str = "#-#-#-#-#";

/// `true` if the text contains at least one conflict marker.
pub fn is_conflicted(text: &str) -> bool {
    text.contains(CONFLICT_MARKER)
}

/// Compiled matcher for the variant of one revision label.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    regex: Regex,
}

impl VariantMatcher {
    /// Build the matcher for `label`. The label is matched literally.
    pub fn new(label: &str) -> Result<Self, ConflictError> {
        if label.is_empty() {
            return Err(ConflictError::EmptyLabel);
        }
        let marker = regex_lite::escape(CONFLICT_MARKER);
        let pattern = format!(
            r"{marker}  {label} .*  {marker}.*[\r\n]+([^\r\n]+)",
            label = regex_lite::escape(label),
        );
        let regex = Regex::new(&pattern).map_err(|e| ConflictError::InvalidPattern(e.to_string()))?;
        Ok(Self { regex })
    }

    /// The line following the first marker for this label, if any.
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Pull the `label` variant out of a conflicted translation.
///
/// Returns `None` when the label is empty or no marker block for it exists.
pub fn extract_variant(text: &str, label: &str) -> Option<String> {
    VariantMatcher::new(label)
        .ok()?
        .extract(text)
        .map(str::to_owned)
}
