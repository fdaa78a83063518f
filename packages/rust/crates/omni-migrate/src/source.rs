//! Reading C# sources before they are rewritten.
//!
//! Files are rewritten in place, so anything that would not survive a
//! round trip through `String` (binary content, non-UTF-8 encodings) is
//! refused instead of decoded lossily.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use memchr::memchr;

use crate::error::MigrateError;

/// Leading bytes inspected by [`is_binary`].
const BINARY_SNIFF_LEN: usize = 8192;

/// Whether `bytes` looks binary: a NUL byte within the first 8KB.
#[must_use]
pub fn is_binary(bytes: &[u8]) -> bool {
    let head = bytes.get(..BINARY_SNIFF_LEN).unwrap_or(bytes);
    memchr(0, head).is_some()
}

/// Read `path` as UTF-8 source text, refusing more than `max_bytes` bytes.
///
/// The limit is enforced on the bytes actually read, not on an earlier
/// `stat`, so a file that grows between the two cannot slip past it.
///
/// # Errors
/// - `NotFound` when the file does not exist.
/// - `TooLarge` when the file holds more than `max_bytes` bytes.
/// - `BinaryFile` when a NUL byte appears in the first 8KB.
/// - `Encoding` when the content is not valid UTF-8.
/// - `Io` for any other read failure.
pub fn read_source<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, MigrateError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => MigrateError::NotFound(path.display().to_string()),
        _ => MigrateError::Io(err),
    })?;

    let mut bytes = Vec::new();
    let read = (&file)
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)?;
    let read = u64::try_from(read).unwrap_or(u64::MAX);
    if read > max_bytes {
        // Report the on-disk size when it is known; at least one byte too many was seen.
        let size = file.metadata().map_or(read, |meta| meta.len().max(read));
        return Err(MigrateError::TooLarge(size, max_bytes));
    }

    if is_binary(&bytes) {
        return Err(MigrateError::BinaryFile(path.display().to_string()));
    }
    String::from_utf8(bytes).map_err(|_| MigrateError::Encoding(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_source() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("Tests.cs");
        fs::write(&p, "ok.Should().BeTrue();").unwrap();
        assert_eq!(read_source(&p, 1024).unwrap(), "ok.Should().BeTrue();");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_source(dir.path().join("Gone.cs"), 1024);
        assert!(matches!(result, Err(MigrateError::NotFound(_))));
    }

    #[test]
    fn test_binary_rejected() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("blob.cs");
        fs::write(&p, b"\x00\x01\x02\x03").unwrap();
        assert!(matches!(read_source(&p, 1024), Err(MigrateError::BinaryFile(_))));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("latin1.cs");
        fs::write(&p, b"caf\xe9").unwrap();
        assert!(matches!(read_source(&p, 1024), Err(MigrateError::Encoding(_))));
    }

    #[test]
    fn test_file_too_large() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("large.cs");
        fs::write(&p, "12345678901234567890").unwrap();
        assert!(matches!(read_source(&p, 10), Err(MigrateError::TooLarge(20, 10))));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("exact.cs");
        fs::write(&p, "0123456789").unwrap();
        assert_eq!(read_source(&p, 10).unwrap(), "0123456789");
        assert!(matches!(read_source(&p, 9), Err(MigrateError::TooLarge(10, 9))));
    }

    #[test]
    fn test_zero_limit_accepts_only_empty_files() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("Empty.cs");
        let one = dir.path().join("One.cs");
        fs::write(&empty, "").unwrap();
        fs::write(&one, "x").unwrap();
        assert_eq!(read_source(&empty, 0).unwrap(), "");
        assert!(matches!(read_source(&one, 0), Err(MigrateError::TooLarge(1, 0))));
    }

    #[test]
    fn test_is_binary_window() {
        let mut bytes = vec![b'a'; BINARY_SNIFF_LEN];
        bytes.push(0);
        assert!(!is_binary(&bytes));
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b""));
    }
}
