use serde::{Deserialize, Serialize};

/// Text encoding of the database connection and preferred encoding of a function.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    pub fn is_utf16(self) -> bool {
        matches!(self, TextEncoding::Utf16Le | TextEncoding::Utf16Be)
    }

    /// Both encodings are UTF-16 but with different byte order.
    pub fn is_byte_swap_of(self, other: TextEncoding) -> bool {
        self != other && self.is_utf16() && other.is_utf16()
    }
}
