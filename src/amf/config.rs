//! Decoder configuration

/// Default container nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// AMF0 decoder options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Accept containers cut short by end of input
    ///
    /// When set, an Object or ECMA Array without its terminator and a strict
    /// array with fewer elements than declared are returned as decoded so far.
    /// Some encoders omit the trailing object end marker.
    pub lenient: bool,

    /// Maximum nesting depth for objects/arrays (prevent stack overflow)
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            lenient: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Strict mode - reject truncated containers
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient mode - accept containers truncated by end of input
    pub fn lenient() -> Self {
        Self {
            lenient: true,
            ..Default::default()
        }
    }

    /// Set lenient mode
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Set maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
