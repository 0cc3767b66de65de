//! Snapshot file format
//!
//! Binary format, little-endian:
//! [magic "FKVS"] [version(u8)] [kind(u8)] [count(u32)] [records...] [checksum(u64)]
//!
//! String records: [key_len(u32)] [key] [value_len(u32)] [value]
//! List records:   [key_len(u32)] [key] [item_count(u32)] ([item_len(u32)] [item])*
//!
//! The checksum is the xxhash64 of every byte before it.

use super::PersistenceError;
use bytes::Bytes;

/// File magic
pub const MAGIC: &[u8; 4] = b"FKVS";

/// Current format version
pub const FORMAT_VERSION: u8 = 1;

/// magic + version + kind + count
const HEADER_LEN: usize = 4 + 1 + 1 + 4;

/// Trailing checksum
const CHECKSUM_LEN: usize = 8;

/// Which namespace a snapshot file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SnapshotKind {
    /// String namespace
    Strings = 1,
    /// List namespace
    Lists = 2,
}

/// Encode the string namespace
pub fn encode_strings(entries: &[(Bytes, Bytes)]) -> Vec<u8> {
    let mut buf = header(SnapshotKind::Strings, entries.len());

    for (key, value) in entries {
        put_bytes(&mut buf, key);
        put_bytes(&mut buf, value);
    }

    finish(buf)
}

/// Encode the list namespace
pub fn encode_lists(entries: &[(Bytes, Vec<Bytes>)]) -> Vec<u8> {
    let mut buf = header(SnapshotKind::Lists, entries.len());

    for (key, items) in entries {
        put_bytes(&mut buf, key);
        buf.extend_from_slice(&(items.len() as u32).to_le_bytes());
        for item in items {
            put_bytes(&mut buf, item);
        }
    }

    finish(buf)
}

/// Decode a string namespace file
pub fn decode_strings(data: &[u8]) -> Result<Vec<(Bytes, Bytes)>, PersistenceError> {
    let (mut decoder, count) = open(data, SnapshotKind::Strings)?;

    let mut entries = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let key = decoder.read_bytes()?;
        let value = decoder.read_bytes()?;
        entries.push((key, value));
    }

    decoder.finish()?;
    Ok(entries)
}

/// Decode a list namespace file
pub fn decode_lists(data: &[u8]) -> Result<Vec<(Bytes, Vec<Bytes>)>, PersistenceError> {
    let (mut decoder, count) = open(data, SnapshotKind::Lists)?;

    let mut entries = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let key = decoder.read_bytes()?;
        let item_count = decoder.read_u32()? as usize;
        let mut items = Vec::with_capacity(item_count.min(1024));
        for _ in 0..item_count {
            items.push(decoder.read_bytes()?);
        }
        entries.push((key, items));
    }

    decoder.finish()?;
    Ok(entries)
}

fn header(kind: SnapshotKind, count: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + CHECKSUM_LEN);
    buf.extend_from_slice(MAGIC);
    buf.push(FORMAT_VERSION);
    buf.push(kind as u8);
    buf.extend_from_slice(&(count as u32).to_le_bytes());
    buf
}

fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn finish(mut buf: Vec<u8>) -> Vec<u8> {
    let checksum = xxhash_rust::xxh64::xxh64(&buf, 0);
    buf.extend_from_slice(&checksum.to_le_bytes());
    buf
}

/// Verify checksum and header, return a decoder positioned on the first record
fn open(data: &[u8], expected: SnapshotKind) -> Result<(Decoder<'_>, usize), PersistenceError> {
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(PersistenceError::Truncated);
    }

    if &data[..4] != MAGIC {
        return Err(PersistenceError::BadMagic);
    }

    let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    let stored = u64::from_le_bytes(checksum.try_into().map_err(|_| PersistenceError::Truncated)?);
    let calculated = xxhash_rust::xxh64::xxh64(body, 0);
    if stored != calculated {
        return Err(PersistenceError::ChecksumMismatch { stored, calculated });
    }

    let mut decoder = Decoder { data: body, pos: 4 };

    let version = decoder.read_u8()?;
    if version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(version));
    }

    let kind = decoder.read_u8()?;
    if kind != expected as u8 {
        return Err(PersistenceError::WrongKind { expected, found: kind });
    }

    let count = decoder.read_u32()? as usize;
    Ok((decoder, count))
}

/// Cursor over a checksummed body
struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], PersistenceError> {
        let end = self.pos.checked_add(len).ok_or(PersistenceError::Truncated)?;
        if end > self.data.len() {
            return Err(PersistenceError::Truncated);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, PersistenceError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, PersistenceError> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes(raw.try_into().map_err(|_| PersistenceError::Truncated)?))
    }

    fn read_bytes(&mut self) -> Result<Bytes, PersistenceError> {
        let len = self.read_u32()? as usize;
        Ok(Bytes::copy_from_slice(self.take(len)?))
    }

    fn finish(self) -> Result<(), PersistenceError> {
        if self.pos != self.data.len() {
            return Err(PersistenceError::TrailingBytes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lists() -> Vec<(Bytes, Vec<Bytes>)> {
        vec![
            (Bytes::from("empty"), vec![]),
            (
                Bytes::from("queue"),
                vec![Bytes::from("c"), Bytes::from("a"), Bytes::from("b"), Bytes::from("a")],
            ),
        ]
    }

    #[test]
    fn test_strings_roundtrip() {
        let entries = vec![
            (Bytes::from("k1"), Bytes::from("v1")),
            (Bytes::from("k2"), Bytes::from("")),
        ];

        let encoded = encode_strings(&entries);
        assert_eq!(&encoded[..4], MAGIC);
        assert_eq!(decode_strings(&encoded).unwrap(), entries);
    }

    #[test]
    fn test_lists_keep_order_and_empty_lists() {
        let entries = sample_lists();
        assert_eq!(decode_lists(&encode_lists(&entries)).unwrap(), entries);
    }

    #[test]
    fn test_empty_namespace() {
        let encoded = encode_strings(&[]);
        assert_eq!(encoded.len(), HEADER_LEN + CHECKSUM_LEN);
        assert!(decode_strings(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = encode_lists(&sample_lists());

        // Flip a bit inside a record
        bytes[HEADER_LEN + 2] ^= 0xFF;

        let result = decode_lists(&bytes);
        assert!(matches!(result, Err(PersistenceError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_wrong_kind() {
        let bytes = encode_lists(&sample_lists());

        let result = decode_strings(&bytes);
        assert!(matches!(
            result,
            Err(PersistenceError::WrongKind { expected: SnapshotKind::Strings, found: 2 })
        ));
    }

    #[test]
    fn test_truncated_and_garbage() {
        let bytes = encode_strings(&[(Bytes::from("k"), Bytes::from("v"))]);

        assert!(matches!(decode_strings(&bytes[..5]), Err(PersistenceError::Truncated)));
        assert!(matches!(
            decode_strings(b"not a snapshot file at all"),
            Err(PersistenceError::BadMagic)
        ));
    }
}
