//! DNS wire-format names
//!
//! A name is a sequence of length-prefixed labels terminated by a zero-length
//! label: `raffy.teamnick.eth` is `05 raffy 08 teamnick 03 eth 00`. Labels are
//! kept most-specific first, and every suffix of a name is a tail slice of
//! its encoding.

use crate::{Error, Result};
use std::fmt;

/// Maximum length of a single label
pub const MAX_LABEL_LEN: usize = 63;

/// A validated DNS wire-format name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedName {
    bytes: Vec<u8>,
    /// Offset of each label's length byte
    offsets: Vec<usize>,
}

impl EncodedName {
    /// The root name (a single zero byte)
    pub fn root() -> Self {
        Self {
            bytes: vec![0],
            offsets: Vec::new(),
        }
    }

    /// Validate wire-format bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut offsets = Vec::new();
        let mut pos = 0usize;
        loop {
            let Some(&len) = bytes.get(pos) else {
                return Err(Error::MalformedEncoding(format!(
                    "missing terminator after {} bytes",
                    bytes.len()
                )));
            };
            let len = len as usize;
            if len == 0 {
                break;
            }
            if len > MAX_LABEL_LEN {
                return Err(Error::MalformedEncoding(format!(
                    "label length {} at offset {} exceeds {}",
                    len, pos, MAX_LABEL_LEN
                )));
            }
            let end = pos + 1 + len;
            if end > bytes.len() {
                return Err(Error::MalformedEncoding(format!(
                    "label at offset {} overruns buffer ({} > {})",
                    pos,
                    end,
                    bytes.len()
                )));
            }
            let label = std::str::from_utf8(&bytes[pos + 1..end]).map_err(|e| {
                Error::MalformedEncoding(format!("label at offset {} is not UTF-8: {}", pos, e))
            })?;
            if label.contains('.') {
                return Err(Error::MalformedEncoding(format!(
                    "label at offset {} contains '.'",
                    pos
                )));
            }
            offsets.push(pos);
            pos = end;
        }
        if pos + 1 != bytes.len() {
            return Err(Error::MalformedEncoding(format!(
                "{} trailing bytes after terminator",
                bytes.len() - pos - 1
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            offsets,
        })
    }

    /// Encode a dotted name; `""` is the root
    pub fn encode(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Ok(Self::root());
        }
        let mut bytes = Vec::with_capacity(name.len() + 2);
        let mut offsets = Vec::new();
        for label in name.split('.') {
            if label.is_empty() {
                return Err(Error::InvalidName(format!("empty label in {:?}", name)));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(Error::InvalidName(format!(
                    "label {:?} is {} bytes (max {})",
                    label,
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            offsets.push(bytes.len());
            bytes.push(label.len() as u8);
            bytes.extend_from_slice(label.as_bytes());
        }
        bytes.push(0);
        Ok(Self { bytes, offsets })
    }

    /// Parse hex wire bytes, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        let bytes = hex::decode(digits)
            .map_err(|e| Error::MalformedEncoding(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// `0x`-prefixed hex of the wire bytes
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }

    /// Wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of labels (zero for the root)
    pub fn label_count(&self) -> usize {
        self.offsets.len()
    }

    /// Check if this is the root name
    pub fn is_root(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Label at `index`, most-specific first
    pub fn label(&self, index: usize) -> Option<&str> {
        let &pos = self.offsets.get(index)?;
        let len = self.bytes[pos] as usize;
        // Validated at construction.
        std::str::from_utf8(&self.bytes[pos + 1..pos + 1 + len]).ok()
    }

    /// Labels, most-specific first
    pub fn labels(&self) -> Vec<&str> {
        (0..self.offsets.len())
            .filter_map(|i| self.label(i))
            .collect()
    }

    /// Dotted form; the root is `""`
    pub fn to_dotted(&self) -> String {
        self.labels().join(".")
    }

    /// Byte offset of every suffix, full name first, root (last byte) last
    pub fn suffix_offsets(&self) -> Vec<usize> {
        let mut out = self.offsets.clone();
        out.push(self.bytes.len() - 1);
        out
    }

    /// Dotted form of the suffix that drops the first `skip` labels
    pub fn suffix_dotted(&self, skip: usize) -> Option<String> {
        if skip > self.label_count() {
            return None;
        }
        Some(self.labels()[skip..].join("."))
    }
}

impl fmt::Display for EncodedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("[root]")
        } else {
            f.write_str(&self.to_dotted())
        }
    }
}

impl fmt::Debug for EncodedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedName({:?}, {})", self.to_dotted(), self.to_hex())
    }
}

impl AsRef<[u8]> for EncodedName {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Decode wire bytes into labels, most-specific first
pub fn decode(bytes: &[u8]) -> Result<Vec<String>> {
    let name = EncodedName::from_bytes(bytes)?;
    Ok(name.labels().into_iter().map(str::to_string).collect())
}
