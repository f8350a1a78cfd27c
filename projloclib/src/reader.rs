//! Per-file line reading.
//!
//! A file is read once into memory and decoded with the first encoding in
//! [`ENCODINGS`] that accepts it. Lines are counted with universal-newline
//! rules: `\n`, `\r\n` and a lone `\r` each end a line, and trailing text
//! after the last terminator counts as one more line.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

/// Text encodings tried when decoding a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
    Windows1252,
}

/// Encodings tried in order.
pub const ENCODINGS: [Encoding; 3] = [Encoding::Utf8, Encoding::Latin1, Encoding::Windows1252];

/// Windows-1252 code points for bytes 0x80..=0x9F. `None` marks bytes the
/// code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            Encoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
            Encoding::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect::<Option<String>>()
                .map(Cow::Owned),
        }
    }
}

/// Result of reading one file.
///
/// Every variant other than `Lines` counts as zero lines; the file is still
/// tallied as included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Lines(u64),
    DecodeFailed,
    PermissionDenied,
    Unreadable,
}

impl ReadOutcome {
    /// Line count, with every failure folded to zero.
    pub fn lines(&self) -> u64 {
        match self {
            ReadOutcome::Lines(n) => *n,
            _ => 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ReadOutcome::Lines(_))
    }
}

/// Read `path` and count its lines.
pub fn read_file(path: impl AsRef<Path>) -> ReadOutcome {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => {
            let outcome = count_bytes(&bytes);
            if outcome == ReadOutcome::DecodeFailed {
                debug!(path = %path.display(), "no encoding could decode file");
            }
            outcome
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "permission denied");
            ReadOutcome::PermissionDenied
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to read file");
            ReadOutcome::Unreadable
        }
    }
}

/// Count lines in raw bytes using the default encoding list.
pub fn count_bytes(bytes: &[u8]) -> ReadOutcome {
    count_bytes_with(bytes, &ENCODINGS)
}

/// Count lines in raw bytes, trying `encodings` in order.
pub fn count_bytes_with(bytes: &[u8], encodings: &[Encoding]) -> ReadOutcome {
    encodings
        .iter()
        .find_map(|enc| enc.decode(bytes))
        .map(|text| ReadOutcome::Lines(count_lines(&text)))
        .unwrap_or(ReadOutcome::DecodeFailed)
}

/// Count lines in decoded text.
pub fn count_lines(text: &str) -> u64 {
    let mut lines = 0;
    let mut open_line = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                lines += 1;
                open_line = false;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines += 1;
                open_line = false;
            }
            _ => open_line = true,
        }
    }

    if open_line {
        lines += 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_count_lines_terminators() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\n"), 1);
        assert_eq!(count_lines("one\ntwo"), 2);
        assert_eq!(count_lines("one\r\ntwo\r\n"), 2);
        assert_eq!(count_lines("one\rtwo\r"), 2);
        assert_eq!(count_lines("\n\n\n"), 3);
        assert_eq!(count_lines("a\r\n\r\nb"), 3);
    }

    #[test]
    fn test_decode_utf8_first() {
        let bytes = "caf\u{e9}\n".as_bytes();
        assert!(matches!(
            Encoding::Utf8.decode(bytes),
            Some(Cow::Borrowed(_))
        ));
        assert_eq!(count_bytes(bytes), ReadOutcome::Lines(1));
    }

    #[test]
    fn test_latin1_accepts_any_byte() {
        let bytes = [b'a', 0xFF, b'\n', 0x81, b'\n'];
        assert!(Encoding::Utf8.decode(&bytes).is_none());
        assert_eq!(Encoding::Latin1.decode(&bytes).unwrap(), "a\u{ff}\n\u{81}\n");
        assert_eq!(count_bytes(&bytes), ReadOutcome::Lines(2));
    }

    #[test]
    fn test_windows1252_mapping() {
        assert_eq!(
            Encoding::Windows1252.decode(&[0x80, 0x93, 0x94]).unwrap(),
            "\u{20AC}\u{201C}\u{201D}"
        );
        assert!(Encoding::Windows1252.decode(&[b'x', 0x81]).is_none());
    }

    #[test]
    fn test_decode_failed_when_no_encoding_fits() {
        let bytes = [0xC3, 0x28, b'\n'];
        assert_eq!(
            count_bytes_with(&bytes, &[Encoding::Utf8]),
            ReadOutcome::DecodeFailed
        );
        assert_eq!(
            count_bytes_with(&[0x8D], &[Encoding::Utf8, Encoding::Windows1252]),
            ReadOutcome::DecodeFailed
        );
    }

    #[test]
    fn test_outcome_folds_to_zero() {
        assert_eq!(ReadOutcome::Lines(7).lines(), 7);
        assert_eq!(ReadOutcome::DecodeFailed.lines(), 0);
        assert_eq!(ReadOutcome::PermissionDenied.lines(), 0);
        assert_eq!(ReadOutcome::Unreadable.lines(), 0);
        assert!(!ReadOutcome::Unreadable.is_ok());
    }

    #[test]
    fn test_read_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, "1\n2\n3\n").unwrap();

        assert_eq!(read_file(&path), ReadOutcome::Lines(3));
    }

    #[test]
    fn test_read_missing_or_directory_is_unreadable() {
        let temp = tempdir().unwrap();
        assert_eq!(read_file(temp.path().join("missing")), ReadOutcome::Unreadable);
        assert_eq!(read_file(temp.path()), ReadOutcome::Unreadable);
    }
}
