//! Normalized identifier of the subject a verification code belongs to.

use sb_shared::email::mask_email;

/// Case-folded email address used as the entry store key
///
/// Two addresses that differ only in letter case produce equal keys. No
/// other rewriting (trimming, dot or plus-tag removal) is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectKey(String);

impl SubjectKey {
    /// Normalize a raw subject identifier
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    /// The normalized identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for log output
    pub fn masked(&self) -> String {
        mask_email(&self.0)
    }
}

impl From<&str> for SubjectKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for SubjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
