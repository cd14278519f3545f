//! Row, key and catalog entry encoding.
//!
//! # Encoding Format
//!
//! ## Row Encoding
//! Stored rows use a tagged binary format:
//! - Number of columns (4 bytes, big-endian)
//! - For each column: type tag (1 byte) followed by the payload
//!   - `Int`: 8 bytes big-endian
//!   - `Char`: length (4 bytes) + UTF-8 bytes
//!   - `Date`: year, month, day (4 bytes each)
//!   - `Null`: no payload
//!
//! ## Key Encoding
//! Primary key tuples are encoded so that byte order matches value order:
//! - Type tag (1 byte)
//! - `Int`: sign bit flipped, big-endian
//! - `Char`: bytes with `0x00` escaped as `0x00 0xFF`, terminated by `0x00 0x01`
//! - `Date`: each component sign-flipped, big-endian
//!
//! Tables without a primary key use 8-byte big-endian sequence tokens.
//!
//! ## Catalog Entries
//! Catalog entries are serde types stored with `bincode`.

use reldb_common::types::{Key, Value as StorageValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{SqlError, SqlResult};
use crate::row::Row;
use crate::types::{Date, Value};

/// Type tags for row encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum TypeTag {
    Null = 0,
    Int = 1,
    Char = 2,
    Date = 3,
}

impl TypeTag {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(TypeTag::Null),
            1 => Some(TypeTag::Int),
            2 => Some(TypeTag::Char),
            3 => Some(TypeTag::Date),
            _ => None,
        }
    }
}

// =========================================================================
// Rows
// =========================================================================

/// Encodes a row to a storage value.
pub fn encode_row(row: &Row) -> SqlResult<StorageValue> {
    let mut buf = Vec::with_capacity(16 + row.num_columns() * 9);
    let count = u32::try_from(row.num_columns())
        .map_err(|_| SqlError::Codec("too many columns".to_string()))?;
    buf.extend_from_slice(&count.to_be_bytes());

    for value in row.values() {
        match value {
            Value::Null => buf.push(TypeTag::Null as u8),
            Value::Int(i) => {
                buf.push(TypeTag::Int as u8);
                buf.extend_from_slice(&i.to_be_bytes());
            }
            Value::Char(s) => {
                buf.push(TypeTag::Char as u8);
                let len = u32::try_from(s.len())
                    .map_err(|_| SqlError::Codec("string too long".to_string()))?;
                buf.extend_from_slice(&len.to_be_bytes());
                buf.extend_from_slice(s.as_bytes());
            }
            Value::Date(d) => {
                buf.push(TypeTag::Date as u8);
                buf.extend_from_slice(&d.year.to_be_bytes());
                buf.extend_from_slice(&d.month.to_be_bytes());
                buf.extend_from_slice(&d.day.to_be_bytes());
            }
        }
    }

    Ok(StorageValue::from_vec(buf))
}

/// Decodes a storage value produced by [`encode_row`].
pub fn decode_row(data: &[u8]) -> SqlResult<Row> {
    let mut reader = Reader::new(data);
    let count = reader.read_u32()? as usize;
    let mut values = Vec::with_capacity(count.min(1024));

    for _ in 0..count {
        let tag = reader.read_u8()?;
        let value = match TypeTag::from_u8(tag) {
            Some(TypeTag::Null) => Value::Null,
            Some(TypeTag::Int) => Value::Int(i64::from_be_bytes(reader.read_array()?)),
            Some(TypeTag::Char) => {
                let len = reader.read_u32()? as usize;
                let bytes = reader.read_bytes(len)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|e| SqlError::Codec(format!("invalid UTF-8: {}", e)))?;
                Value::Char(s.to_string())
            }
            Some(TypeTag::Date) => {
                let year = i32::from_be_bytes(reader.read_array()?);
                let month = i32::from_be_bytes(reader.read_array()?);
                let day = i32::from_be_bytes(reader.read_array()?);
                Value::Date(Date::new(year, month, day))
            }
            None => return Err(SqlError::Codec(format!("unknown type tag: {}", tag))),
        };
        values.push(value);
    }

    if !reader.is_exhausted() {
        return Err(SqlError::Codec("trailing bytes after row".to_string()));
    }
    Ok(Row::new(values))
}

// =========================================================================
// Keys
// =========================================================================

/// Encodes a primary key tuple to an order-preserving storage key.
pub fn encode_key(values: &[Value]) -> Key {
    let mut buf = Vec::with_capacity(values.len() * 9);
    for value in values {
        encode_key_value(value, &mut buf);
    }
    Key::from_vec(buf)
}

fn encode_key_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null => buf.push(TypeTag::Null as u8),
        Value::Int(i) => {
            buf.push(TypeTag::Int as u8);
            let v = (*i as u64) ^ 0x8000_0000_0000_0000;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        Value::Char(s) => {
            buf.push(TypeTag::Char as u8);
            for &b in s.as_bytes() {
                if b == 0x00 {
                    buf.extend_from_slice(&[0x00, 0xFF]);
                } else {
                    buf.push(b);
                }
            }
            buf.extend_from_slice(&[0x00, 0x01]);
        }
        Value::Date(d) => {
            buf.push(TypeTag::Date as u8);
            for component in [d.year, d.month, d.day] {
                let v = (component as u32) ^ 0x8000_0000;
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
    }
}

/// Encodes a sequence token as a storage key for tables without a primary key.
pub fn sequence_key(token: u64) -> Key {
    Key::from_vec(token.to_be_bytes().to_vec())
}

// =========================================================================
// Catalog entries
// =========================================================================

/// Serializes a catalog entry.
pub fn encode_entry<T: Serialize>(entry: &T) -> SqlResult<StorageValue> {
    Ok(StorageValue::from_vec(bincode::serialize(entry)?))
}

/// Deserializes a catalog entry.
pub fn decode_entry<T: DeserializeOwned>(data: &[u8]) -> SqlResult<T> {
    Ok(bincode::deserialize(data)?)
}

/// Encodes a column name list as a catalog key.
pub fn encode_name_list(names: &[String]) -> SqlResult<Key> {
    Ok(Key::from_vec(bincode::serialize(names)?))
}

// =========================================================================
// Reader
// =========================================================================

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_bytes(&mut self, len: usize) -> SqlResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| SqlError::Codec("unexpected end of row data".to_string()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> SqlResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> SqlResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u32(&mut self) -> SqlResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_row_roundtrip() {
        let row = Row::new(vec![
            Value::Int(-7),
            Value::char("héllo"),
            Value::Null,
            Value::date(2024, 2, 29),
            Value::char(""),
        ]);
        let encoded = encode_row(&row).unwrap();
        assert_eq!(decode_row(encoded.as_bytes()).unwrap(), row);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_row(&[0, 0]), Err(SqlError::Codec(_))));
        // One column with an unknown tag
        assert!(matches!(decode_row(&[0, 0, 0, 1, 9]), Err(SqlError::Codec(_))));
        // Char length past the end
        assert!(matches!(
            decode_row(&[0, 0, 0, 1, 2, 0, 0, 0, 5, b'a']),
            Err(SqlError::Codec(_))
        ));
        // Trailing garbage
        assert!(matches!(decode_row(&[0, 0, 0, 0, 1]), Err(SqlError::Codec(_))));
    }

    #[test]
    fn test_int_key_order() {
        let ints = [i64::MIN, -100, -1, 0, 1, 42, i64::MAX];
        let keys: Vec<Key> = ints.iter().map(|&i| encode_key(&[Value::Int(i)])).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_char_key_order_with_prefixes() {
        let words = ["", "a", "a\0", "a\0b", "ab", "b"];
        let keys: Vec<Key> = words.iter().map(|w| encode_key(&[Value::char(*w)])).collect();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_composite_key_order() {
        let a = encode_key(&[Value::char("a"), Value::Int(9)]);
        let b = encode_key(&[Value::char("ab"), Value::Int(1)]);
        assert!(a < b);

        let early = encode_key(&[Value::date(2023, 12, 31)]);
        let late = encode_key(&[Value::date(2024, -1, 1)]);
        assert!(early < late);
    }

    #[test]
    fn test_sequence_keys_increase() {
        assert!(sequence_key(1) < sequence_key(2));
        assert!(sequence_key(255) < sequence_key(256));
        assert_eq!(sequence_key(1).len(), 8);
    }

    #[test]
    fn test_entry_roundtrip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Entry {
            name: String,
            columns: Vec<String>,
            count: u32,
        }

        let entry = Entry {
            name: "t".into(),
            columns: vec!["a".into(), "b".into()],
            count: 3,
        };
        let bytes = encode_entry(&entry).unwrap();
        assert_eq!(decode_entry::<Entry>(bytes.as_bytes()).unwrap(), entry);
        assert!(decode_entry::<Entry>(&[1, 2]).is_err());
    }
}
