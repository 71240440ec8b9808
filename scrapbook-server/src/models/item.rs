//! Item text validation and the partial-update patch type

use super::ValidationError;

/// Maximum length for item text (64KB)
const MAX_TEXT_LEN: usize = 65536;

/// Validated item text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemText(String);

impl ItemText {
    /// Create item text.
    ///
    /// # Rules
    /// - Must not be empty
    /// - Max 64KB (65536 bytes)
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        if s.len() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "text",
                max: MAX_TEXT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ItemText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Partial update for a stored item.
///
/// Every field is optional; only fields present here reach the store
/// mutation. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub text: Option<ItemText>,
    pub completed: Option<bool>,
    /// Resolved image URL; inline payloads are uploaded before this is set.
    pub image: Option<String>,
}

impl ItemPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_text() {
        assert!(ItemText::new("Buy milk").is_ok());
    }

    #[test]
    fn empty_text_rejected() {
        let err = ItemText::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "text" }));
    }

    #[test]
    fn max_length() {
        let text_64k = "a".repeat(65536);
        assert!(ItemText::new(&text_64k).is_ok());

        let text_over = "a".repeat(65537);
        let err = ItemText::new(&text_over).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 65536, .. }));
    }

    #[test]
    fn empty_patch() {
        assert!(ItemPatch::default().is_empty());

        let patch = ItemPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
