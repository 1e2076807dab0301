//! Minimal Solidity ABI codec
//!
//! Covers the calls the registry client makes: `resolver(bytes32)` and
//! `verifierMetadata(bytes)`, and the `(address, string[])` tuple the latter
//! returns. All reads are bounds-checked against the return data.

use crate::{Error, Result};
use unruggable_core::{keccak256, Address};

const WORD: usize = 32;

/// Function selector of a canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn push_usize(out: &mut Vec<u8>, value: usize) {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    out.extend_from_slice(&word);
}

fn push_bytes_tail(out: &mut Vec<u8>, data: &[u8]) {
    push_usize(out, data.len());
    out.extend_from_slice(data);
    out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
}

/// Calldata for `f(bytes32)`
pub fn encode_bytes32_call(selector: [u8; 4], word: &[u8; 32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + WORD);
    out.extend_from_slice(&selector);
    out.extend_from_slice(word);
    out
}

/// Calldata for `f(bytes)`
pub fn encode_bytes_call(selector: [u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 2 * WORD + padded_len(data.len()));
    out.extend_from_slice(&selector);
    push_usize(&mut out, WORD);
    push_bytes_tail(&mut out, data);
    out
}

/// ABI encoding of an address word
pub fn encode_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Return data of `(address, string[])`
pub fn encode_address_and_strings<S: AsRef<str>>(address: &Address, strings: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&encode_address(address));
    push_usize(&mut out, 2 * WORD);

    push_usize(&mut out, strings.len());
    let mut offset = strings.len() * WORD;
    for s in strings {
        push_usize(&mut out, offset);
        offset += WORD + padded_len(s.as_ref().len());
    }
    for s in strings {
        push_bytes_tail(&mut out, s.as_ref().as_bytes());
    }
    out
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(WORD)
        .ok_or_else(|| Error::Abi(format!("offset {} overflows", offset)))?;
    data.get(offset..end).ok_or_else(|| {
        Error::Abi(format!(
            "word at {} out of bounds ({} bytes)",
            offset,
            data.len()
        ))
    })
}

fn usize_at(data: &[u8], offset: usize) -> Result<usize> {
    let word = word_at(data, offset)?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(Error::Abi(format!("value at {} does not fit in 64 bits", offset)));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(buf))
        .map_err(|_| Error::Abi(format!("value at {} does not fit in usize", offset)))
}

fn address_at(data: &[u8], offset: usize) -> Result<Address> {
    let word = word_at(data, offset)?;
    if word[..12].iter().any(|&b| b != 0) {
        return Err(Error::Abi(format!("dirty address word at {}", offset)));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::new(bytes))
}

fn string_at(data: &[u8], offset: usize) -> Result<String> {
    let len = usize_at(data, offset)?;
    let start = offset + WORD;
    let bytes = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| Error::Abi(format!("string at {} overruns return data", offset)))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Abi(format!("string at {} is not UTF-8: {}", offset, e)))
}

/// Decode a single `address` return value
pub fn decode_address(data: &[u8]) -> Result<Address> {
    address_at(data, 0)
}

/// Decode an `(address, string[])` return value
pub fn decode_address_and_strings(data: &[u8]) -> Result<(Address, Vec<String>)> {
    let address = address_at(data, 0)?;
    let array = usize_at(data, WORD)?;
    let count = usize_at(data, array)?;
    let base = array + WORD;
    if count > data.len().saturating_sub(base) / WORD {
        return Err(Error::Abi(format!("array length {} exceeds return data", count)));
    }
    let mut strings = Vec::with_capacity(count);
    for i in 0..count {
        let rel = usize_at(data, base + i * WORD)?;
        let offset = base
            .checked_add(rel)
            .ok_or_else(|| Error::Abi(format!("element {} offset overflows", i)))?;
        strings.push(string_at(data, offset)?);
    }
    Ok((address, strings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(hex::encode(selector("resolver(bytes32)")), "0178b8bf");
        assert_eq!(hex::encode(selector("supportsInterface(bytes4)")), "01ffc9a7");
    }

    #[test]
    fn test_encode_bytes32_call() {
        let data = encode_bytes32_call([1, 2, 3, 4], &[0xaa; 32]);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &[1, 2, 3, 4]);
        assert_eq!(&data[4..], &[0xaa; 32][..]);
    }

    #[test]
    fn test_encode_bytes_call_layout() {
        let payload = [3u8, b'e', b't', b'h', 0];
        let data = encode_bytes_call([0; 4], &payload);
        // selector + offset + length + one padded word
        assert_eq!(data.len(), 4 + 32 * 3);
        assert_eq!(data[4 + 31], 0x20);
        assert_eq!(data[4 + 63], 5);
        assert_eq!(&data[4 + 64..4 + 69], &payload);
        assert!(data[4 + 69..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_bytes_call_exact_word() {
        let data = encode_bytes_call([0; 4], &[7u8; 32]);
        assert_eq!(data.len(), 4 + 32 * 3);
    }

    #[test]
    fn test_decode_address() {
        let word = encode_address(&addr(0x11));
        assert_eq!(decode_address(&word).unwrap(), addr(0x11));

        let mut dirty = word;
        dirty[0] = 1;
        assert!(decode_address(&dirty).is_err());
        assert!(decode_address(&word[..31]).is_err());
    }

    #[test]
    fn test_decode_address_and_strings() {
        let gateways = ["https://lb.drpc.org/gateway/unruggable?network=base", "https://base.3668.io"];
        let data = encode_address_and_strings(&addr(0x42), &gateways);
        let (verifier, decoded) = decode_address_and_strings(&data).unwrap();
        assert_eq!(verifier, addr(0x42));
        assert_eq!(decoded, gateways);
    }

    #[test]
    fn test_decode_empty_array() {
        let data = encode_address_and_strings::<&str>(&addr(1), &[]);
        assert_eq!(data.len(), 96);
        let (_, decoded) = decode_address_and_strings(&data).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let data = encode_address_and_strings(&addr(1), &["https://a"]);
        for cut in [0, 40, 64, 96, data.len() - 1] {
            assert!(decode_address_and_strings(&data[..cut]).is_err(), "cut {}", cut);
        }
    }

    #[test]
    fn test_decode_rejects_huge_count() {
        let mut data = encode_address_and_strings::<&str>(&addr(1), &[]);
        data[95] = 0xff;
        let err = decode_address_and_strings(&data).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
