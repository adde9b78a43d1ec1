//! Resolves the `codepage` configuration option (§9 open question 3 of the format notes) to an
//! actual decoder.
//!
//! The reference implementation labels its default codepage `"UTF8"`, even though the field it
//! feeds is MS-SHLLINK's ANSI codepage (typically CP-1252 on US/EU Windows installs). We keep
//! that permissive default but resolve any other label through [`encoding_rs`].

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// A resolved ANSI codepage, used to decode the non-Unicode string variants throughout
/// `link_info` and the extra-data bodies.
#[derive(Clone, Copy, Debug)]
pub struct Codepage(&'static Encoding);

impl Codepage {
    /// Resolves a codepage label as accepted by MS-SHLLINK tooling (`"UTF-8"`, `"1252"`,
    /// `"windows-1252"`, `"cp1252"`, `"932"`, ...) to a concrete decoder.
    ///
    /// Unrecognized labels fall back to UTF-8, matching the reference implementation's
    /// permissive default.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        let encoding = match normalized.as_str() {
            "utf8" | "utf-8" | "" => UTF_8,
            "1252" | "cp1252" | "windows-1252" => WINDOWS_1252,
            other => Encoding::for_label(other.as_bytes()).unwrap_or(UTF_8),
        };
        Self(encoding)
    }

    /// Decodes `bytes` with this codepage, replacing any malformed sequences.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.0.decode(bytes);
        text.into_owned()
    }
}

impl Default for Codepage {
    fn default() -> Self {
        Self::from_label("UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utf8() {
        let codepage = Codepage::default();
        assert_eq!(codepage.decode(b"hello"), "hello");
    }

    #[test]
    fn resolves_windows_1252() {
        let codepage = Codepage::from_label("1252");
        // 0xE9 in CP-1252 is "é"
        assert_eq!(codepage.decode(&[0xE9]), "é");
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let codepage = Codepage::from_label("not-a-real-codepage");
        assert_eq!(codepage.decode(b"abc"), "abc");
    }
}
