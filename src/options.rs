//! Encoder and decoder settings.

use crate::MAX_DEPTH;

/// Settings for encoding.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Maximum container nesting. Encoding anything deeper fails with
    /// [`Error::DepthLimit`](crate::Error::DepthLimit).
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// Settings for decoding.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Maximum container nesting.
    pub max_depth: usize,
    /// When decoding an Object into a struct, fail on names that aren't one of the struct's
    /// fields. When off, such entries are skipped.
    pub deny_unknown_fields: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            deny_unknown_fields: true,
        }
    }
}

impl DecodeOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }
}

impl EncodeOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
