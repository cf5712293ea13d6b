//! Text decoding with an ordered fallback list.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Latin1 => "latin-1",
        };
        f.write_str(name)
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(anyhow!("odd byte count for utf-16"));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|err| anyhow!("invalid utf-16: {err}"))
}

/// Decode `bytes` trying UTF-8, UTF-16 (with a BOM), then Latin-1.
///
/// Latin-1 maps every byte, so decoding never fails.
pub fn decode(bytes: &[u8]) -> (String, Encoding) {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        if let Ok(text) = std::str::from_utf8(rest) {
            return (text.to_string(), Encoding::Utf8);
        }
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), Encoding::Utf8);
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE")
        && let Ok(text) = decode_utf16(rest, u16::from_le_bytes)
    {
        return (text, Encoding::Utf16Le);
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF")
        && let Ok(text) = decode_utf16(rest, u16::from_be_bytes)
    {
        return (text, Encoding::Utf16Be);
    }
    (bytes.iter().map(|&b| char::from(b)).collect(), Encoding::Latin1)
}

pub fn read_with_fallback(path: &Path) -> Result<(String, Encoding)> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(decode(&bytes))
}

/// Read a UTF-8 text file. `None` when the file is not valid UTF-8.
pub fn read_utf8(path: &Path) -> Result<Option<String>> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8(bytes).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_with_and_without_bom() {
        assert_eq!(decode("née".as_bytes()), ("née".to_string(), Encoding::Utf8));
        assert_eq!(
            decode(b"\xEF\xBB\xBF<ul>"),
            ("<ul>".to_string(), Encoding::Utf8)
        );
    }

    #[test]
    fn utf16_needs_a_bom() {
        let mut le = vec![0xFF, 0xFE];
        le.extend("<ul>é".encode_utf16().flat_map(u16::to_le_bytes));
        assert_eq!(decode(&le), ("<ul>é".to_string(), Encoding::Utf16Le));

        let mut be = vec![0xFE, 0xFF];
        be.extend("<ul>".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(decode(&be), ("<ul>".to_string(), Encoding::Utf16Be));
    }

    #[test]
    fn anything_else_is_latin1() {
        assert_eq!(decode(b"caf\xE9"), ("café".to_string(), Encoding::Latin1));
    }

    #[test]
    fn read_utf8_rejects_binary() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0xC3, 0x28]).expect("write");
        assert_eq!(read_utf8(&path).expect("read"), None);
        fs::write(&path, "ok").expect("write");
        assert_eq!(read_utf8(&path).expect("read"), Some("ok".to_string()));
    }
}
