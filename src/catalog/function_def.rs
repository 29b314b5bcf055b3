use crate::catalog::TextEncoding;

/// Index of a definition inside a [`FunctionCatalog`](crate::catalog::FunctionCatalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct FuncId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    /// Placeholder created by a lookup with `create` set; has no implementation yet.
    Blank,
    Scalar,
    Aggregate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    /// Declared argument count, `-1` for variadic.
    pub n_arg: i32,
    pub pref_enc: TextEncoding,
    pub kind: FuncKind,
    /// The implementation compares text and must receive a collating sequence.
    pub needs_coll_seq: bool,
}

impl FunctionDef {
    pub fn scalar(name: &str, n_arg: i32) -> Self {
        Self { name: name.to_string(), n_arg, pref_enc: TextEncoding::Utf8, kind: FuncKind::Scalar, needs_coll_seq: false }
    }

    pub fn aggregate(name: &str, n_arg: i32) -> Self {
        Self { kind: FuncKind::Aggregate, ..Self::scalar(name, n_arg) }
    }

    pub fn blank(name: &str, n_arg: i32, enc: TextEncoding) -> Self {
        Self { kind: FuncKind::Blank, pref_enc: enc, ..Self::scalar(name, n_arg) }
    }

    pub fn with_encoding(mut self, enc: TextEncoding) -> Self {
        self.pref_enc = enc;
        self
    }

    pub fn needing_coll_seq(mut self) -> Self {
        self.needs_coll_seq = true;
        self
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == FuncKind::Aggregate
    }

    pub fn is_defined(&self) -> bool {
        self.kind != FuncKind::Blank
    }

    /// How well this definition serves a call with `n_arg` arguments in `enc`.
    ///
    /// 0 means unusable. Variadic definitions score 1 to 3 and definitions
    /// taking exactly `n_arg` score 4 to 6; within each band a matching
    /// encoding adds 2 and a byte-swapped UTF-16 encoding adds 1.
    pub fn match_quality(&self, n_arg: i32, enc: TextEncoding) -> u8 {
        if self.n_arg != -1 && self.n_arg != n_arg && n_arg != -1 {
            return 0;
        }
        let base = if self.n_arg == n_arg || n_arg == -1 { 4 } else { 1 };
        if enc == self.pref_enc {
            base + 2
        } else if enc.is_byte_swap_of(self.pref_enc) {
            base + 1
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_scores_follow_arity_then_encoding() {
        let exact = FunctionDef::scalar("f", 2);
        assert_eq!(exact.match_quality(2, TextEncoding::Utf8), 6);
        assert_eq!(exact.match_quality(3, TextEncoding::Utf8), 0);
        assert_eq!(exact.match_quality(-1, TextEncoding::Utf8), 6);

        let le = FunctionDef::scalar("f", 2).with_encoding(TextEncoding::Utf16Le);
        assert_eq!(le.match_quality(2, TextEncoding::Utf16Be), 5);
        assert_eq!(le.match_quality(2, TextEncoding::Utf8), 4);

        let variadic = FunctionDef::scalar("f", -1);
        assert_eq!(variadic.match_quality(5, TextEncoding::Utf8), 3);
        assert_eq!(variadic.match_quality(5, TextEncoding::Utf16Le), 1);
        let variadic_le = FunctionDef::scalar("f", -1).with_encoding(TextEncoding::Utf16Le);
        assert_eq!(variadic_le.match_quality(5, TextEncoding::Utf16Be), 2);
    }

    #[test]
    fn kinds() {
        assert!(FunctionDef::aggregate("count", 0).is_aggregate());
        assert!(!FunctionDef::blank("f", 1, TextEncoding::Utf8).is_defined());
        assert!(FunctionDef::scalar("f", 1).is_defined());
    }
}
