//! The binary parser handles the parsing and generation of the persisted
//! phenotype index.
//! The format is versioned so that old index files remain readable as
//! input while only the newest format is generated.
use std::fmt::Display;

use tracing::warn;

use crate::index::IndexEntry;
use crate::term::{HpoTerm, TermSet};
use crate::{u16_from_bytes, u32_from_bytes, PhenomapError, PhenomapResult};

/// Magic bytes prefixing every persisted index file: `PHM`
pub(crate) const MAGIC: [u8; 3] = [0x50, 0x48, 0x4d];

/// Entry kind tag for a decoded term set
const KIND_TERMS: u8 = 0;
/// Entry kind tag for an entry persisted as corrupt
const KIND_CORRUPT: u8 = 1;

/// Smallest possible record: length, kind, empty symbol, zero term count
const MIN_RECORD_LEN: usize = 4 + 1 + 1 + 4;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum BinaryVersion {
    V1,
}

impl TryFrom<u8> for BinaryVersion {
    type Error = PhenomapError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1u8 => Ok(BinaryVersion::V1),
            _ => Err(PhenomapError::ParseBinaryError),
        }
    }
}

impl Display for BinaryVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinaryVersion::V1 => "1",
            }
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Bytes<'a> {
    data: &'a [u8],
    version: BinaryVersion,
}

impl<'a> Bytes<'a> {
    pub fn new(data: &'a [u8], version: BinaryVersion) -> Self {
        Self { data, version }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn version(&self) -> BinaryVersion {
        self.version
    }
}

impl<Idx> std::ops::Index<Idx> for Bytes<'_>
where
    Idx: std::slice::SliceIndex<[u8]>,
{
    type Output = Idx::Output;

    fn index(&self, idx: Idx) -> &Self::Output {
        &self.data[idx]
    }
}

/// Identifies the encoding version of the provided binary data
///
/// # Errors
///
/// [`PhenomapError::ParseBinaryError`]: too few bytes, unknown magic bytes
/// or an unsupported version
pub(crate) fn version(bytes: &[u8]) -> PhenomapResult<Bytes> {
    if bytes.len() < 4 {
        return Err(PhenomapError::ParseBinaryError);
    }

    if bytes[0..3] == MAGIC {
        let version = BinaryVersion::try_from(bytes[3])?;
        Ok(Bytes::new(&bytes[4..], version))
    } else {
        Err(PhenomapError::ParseBinaryError)
    }
}

/// The header prefixing the serialized records of an index file
pub(crate) fn header() -> Vec<u8> {
    vec![MAGIC[0], MAGIC[1], MAGIC[2], 1u8]
}

/// Serializes one `(symbol, entry)` pair of the index
///
/// The binary layout is defined as:
///
/// | Byte offset | Number of bytes | Description |
/// | --- | --- | --- |
/// | 0 | 4 | The total length of the record as big-endian `u32` |
/// | 4 | 1 | The entry kind, `0` for a term set, `1` for a corrupt entry |
/// | 5 | 1 | The length of the gene symbol as `u8` |
/// | 6 | n | The gene symbol as u8 vector. Symbols longer than 255 bytes are trimmed |
/// | 6 + n | 4 | The number of terms as big-endian `u32` (`0` for corrupt entries) |
/// | 10 + n | x | The terms, each as two length-prefixed strings (`u16` prefix): id, then name |
pub(crate) fn record_bytes(symbol: &str, entry: &IndexEntry) -> Vec<u8> {
    fn usize_to_u32(n: usize) -> u32 {
        n.try_into().expect("unable to convert {n} to u32")
    }
    fn usize_to_u16(n: usize) -> u16 {
        n.try_into().expect("unable to convert {n} to u16")
    }

    let symbol = symbol.as_bytes();
    let symbol_len = std::cmp::min(symbol.len(), 255);

    let mut body = Vec::new();

    match entry {
        IndexEntry::Terms(_) => body.push(KIND_TERMS),
        IndexEntry::Corrupt => body.push(KIND_CORRUPT),
    }

    // casting is safe, since symbol_len is < 256
    #[allow(clippy::cast_possible_truncation)]
    body.push(symbol_len as u8);
    body.extend_from_slice(&symbol[..symbol_len]);

    match entry {
        IndexEntry::Terms(terms) => {
            body.extend_from_slice(&usize_to_u32(terms.len()).to_be_bytes());
            for term in terms {
                for field in [term.id(), term.name()] {
                    body.extend_from_slice(&usize_to_u16(field.len()).to_be_bytes());
                    body.extend_from_slice(field.as_bytes());
                }
            }
        }
        IndexEntry::Corrupt => body.extend_from_slice(&0u32.to_be_bytes()),
    }

    let mut res = Vec::with_capacity(body.len() + 4);
    res.extend_from_slice(&usize_to_u32(body.len() + 4).to_be_bytes());
    res.append(&mut body);
    res
}

/// Iterator over the `(symbol, entry)` records of a serialized index
///
/// Record framing errors end the iteration with an `Err` item. An entry
/// whose body cannot be decoded, while its framing and symbol are intact,
/// is returned as [`IndexEntry::Corrupt`] instead so that one bad entry
/// does not lose the rest of the index.
pub(crate) struct BinaryRecordIterator<'a> {
    bytes: Bytes<'a>,
    offset: usize,
}

impl<'a> BinaryRecordIterator<'a> {
    pub fn new(bytes: Bytes<'a>) -> Self {
        Self { bytes, offset: 0 }
    }
}

impl Iterator for BinaryRecordIterator<'_> {
    type Item = PhenomapResult<(String, IndexEntry)>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let remaining = &self.bytes[self.offset..];
        if remaining.len() < 4 {
            self.offset = self.bytes.len();
            return Some(Err(PhenomapError::ParseBinaryError));
        }

        let record_len = u32_from_bytes(remaining) as usize;
        if record_len < MIN_RECORD_LEN || record_len > remaining.len() {
            self.offset = self.bytes.len();
            return Some(Err(PhenomapError::ParseBinaryError));
        }

        self.offset += record_len;
        Some(decode_record(&remaining[..record_len]))
    }
}

/// Decodes a single record as framed by [`BinaryRecordIterator`]
fn decode_record(record: &[u8]) -> PhenomapResult<(String, IndexEntry)> {
    let kind = record[4];
    let symbol_len = record[5] as usize;

    if record.len() < 6 + symbol_len {
        return Err(PhenomapError::ParseBinaryError);
    }
    let Ok(symbol) = String::from_utf8(record[6..6 + symbol_len].to_vec()) else {
        return Err(PhenomapError::ParseBinaryError);
    };

    if kind == KIND_CORRUPT {
        return Ok((symbol, IndexEntry::Corrupt));
    }
    if kind != KIND_TERMS {
        warn!("unknown entry kind {} for {}, loading as corrupt", kind, symbol);
        return Ok((symbol, IndexEntry::Corrupt));
    }

    match decode_terms(&record[6 + symbol_len..]) {
        Some(terms) => Ok((symbol, IndexEntry::Terms(terms))),
        None => {
            warn!("undecodable term data for {}, loading as corrupt", symbol);
            Ok((symbol, IndexEntry::Corrupt))
        }
    }
}

/// Decodes the term section of a record, `None` if the data is inconsistent
fn decode_terms(bytes: &[u8]) -> Option<TermSet> {
    if bytes.len() < 4 {
        return None;
    }
    let n_terms = u32_from_bytes(bytes) as usize;

    // the count is untrusted, capacity grows with the actual data
    let mut idx = 4;
    let mut terms = TermSet::new();
    for _ in 0..n_terms {
        let id = read_string(bytes, &mut idx)?;
        let name = read_string(bytes, &mut idx)?;
        terms.insert(HpoTerm::new(&id, &name));
    }

    if idx == bytes.len() {
        Some(terms)
    } else {
        None
    }
}

/// Reads one `u16` length-prefixed UTF-8 string, advancing `idx` past it
fn read_string(bytes: &[u8], idx: &mut usize) -> Option<String> {
    if bytes.len() < *idx + 2 {
        return None;
    }
    let len = u16_from_bytes(&bytes[*idx..]) as usize;
    *idx += 2;

    if bytes.len() < *idx + len {
        return None;
    }
    let s = String::from_utf8(bytes[*idx..*idx + len].to_vec()).ok()?;
    *idx += len;
    Some(s)
}
