use regex::{NoExpand, Regex};

/// Replacement written over every masked value.
pub const MASK_TOKEN: &str = "***";

/// Replaces detected values with a fixed token.
#[derive(Debug, Clone)]
pub struct Masker {
    token: String,
}

impl Default for Masker {
    fn default() -> Self {
        Self::new(MASK_TOKEN)
    }
}

impl Masker {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Mask every literal occurrence of each match, in the given order.
    ///
    /// Replacement is global: a value recorded once is masked wherever it
    /// appears in the current text, not only at its original position.
    pub fn mask<S: AsRef<str>>(&self, text: &str, matches: &[S]) -> String {
        let mut masked = text.to_string();
        for m in matches {
            let m = m.as_ref();
            if m.is_empty() {
                continue;
            }
            masked = match Regex::new(&regex::escape(m)) {
                Ok(re) => re
                    .replace_all(&masked, NoExpand(&self.token))
                    .into_owned(),
                // size limit only; the escaped pattern is always valid syntax
                Err(_) => masked.replace(m, &self.token),
            };
        }
        masked
    }
}
