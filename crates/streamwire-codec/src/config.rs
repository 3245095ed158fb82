//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::{
    order::{ByteOrder, process_default_order},
    text::TextEncoding,
};

/// Defaults applied when a call does not specify its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Directive used when a call passes [`ByteOrder::Unspecified`]
    pub default_order: ByteOrder,
    /// Encoding used when a text call passes none
    ///
    /// `None` selects UTF-16 in the resolved byte order.
    pub default_encoding: Option<TextEncoding>,
}

impl CodecConfig {
    /// Configuration seeded from the process-wide default directive.
    ///
    /// The directive is read once, here.
    pub fn from_process_default() -> Self {
        Self { default_order: process_default_order(), ..Self::default() }
    }

    /// Replace the default directive.
    #[must_use]
    pub fn with_order(mut self, order: ByteOrder) -> Self {
        self.default_order = order;
        self
    }

    /// Replace the default text encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.default_encoding = Some(encoding);
        self
    }
}
