//! Byte escaping for literal interpolation into statements.
//!
//! Implements the classic MySQL quoting rules: NUL, single quote, double
//! quote, backslash, LF, CR and Ctrl-Z are backslash-escaped. The transform
//! is total and deterministic; it is one-directional (no unescape is
//! provided). Valid for ASCII-superset connection character sets such as
//! latin1 and the utf8 family negotiated by the underlying driver.

/// Escape a byte sequence for safe splicing into a quoted SQL literal.
///
/// Output length is at most twice the input length.
#[must_use]
pub(crate) fn escape_bytes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 8);
    for &byte in input {
        match byte {
            0x00 => out.extend_from_slice(b"\\0"),
            b'\'' => out.extend_from_slice(b"\\'"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            // Ctrl-Z, the Windows EOF marker, breaks mysql command files.
            0x1a => out.extend_from_slice(b"\\Z"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_bytes(b"hello world"), b"hello world");
        assert_eq!(escape_bytes(b""), b"");
    }

    #[test]
    fn test_quotes_escaped() {
        assert_eq!(escape_bytes(b"it's"), b"it\\'s");
        assert_eq!(escape_bytes(br#"say "hi""#), br#"say \"hi\""#);
    }

    #[test]
    fn test_backslash_and_control_bytes() {
        assert_eq!(escape_bytes(b"a\\b"), b"a\\\\b");
        assert_eq!(escape_bytes(b"line1\nline2\r"), b"line1\\nline2\\r");
        assert_eq!(escape_bytes(&[0x00, 0x1a]), b"\\0\\Z");
    }

    #[test]
    fn test_injection_attempt_neutralized() {
        let payload = b"'; DROP TABLE users; --";
        let escaped = escape_bytes(payload);
        assert_eq!(&escaped, b"\\'; DROP TABLE users; --");
    }

    #[test]
    fn test_non_ascii_bytes_pass_through() {
        // UTF-8 multi-byte sequences contain no bytes in the escape set.
        let input = "héllo — мир".as_bytes();
        assert_eq!(escape_bytes(input), input);
    }

    #[test]
    fn test_deterministic() {
        let input = b"mixed 'quotes' and \\slashes\\";
        assert_eq!(escape_bytes(input), escape_bytes(input));
    }
}
