use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// API credential attached to outbound requests.
///
/// The client keeps it write-only; only [`Transport`](crate::Transport)
/// implementations read it back through [`expose_secret`](Self::expose_secret).
/// `Debug` and `Display` print `[REDACTED]`, and the backing buffer is zeroed
/// on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read access for transports building the auth header.
    ///
    /// Callers must not log, store, or otherwise persist the returned slice.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// `Bearer <credential>` in a buffer that is zeroed on drop.
    #[must_use]
    pub fn bearer(&self) -> zeroize::Zeroizing<String> {
        zeroize::Zeroizing::new(format!("Bearer {}", self.expose_secret()))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let c = Credential::new("hunter2");
        assert_eq!(format!("{c:?}"), "[REDACTED]");
        assert_eq!(format!("{c}"), "[REDACTED]");
    }

    #[test]
    fn bearer_wraps_secret() {
        let c = Credential::new("k-123");
        assert_eq!(c.bearer().as_str(), "Bearer k-123");
    }

    #[test]
    fn zeroize_clears_buffer() {
        let mut c = Credential::new("sensitive");
        c.zeroize();
        assert!(c.0.is_empty());
    }
}
