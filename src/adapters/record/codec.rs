//! Binary encoding of run records
//!
//! ```text
//! +------+---------+-------------+----------------------+
//! | KTRR | version | body length | bincode body         |
//! | 4 B  | u16 LE  | u32 LE      | `body length` bytes  |
//! +------+---------+-------------+----------------------+
//! ```
//!
//! Any header mismatch is reported as a [`CodecError`]; callers treat every
//! error as "no prior state".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::RunRecord;

/// File magic
pub const MAGIC: [u8; 4] = *b"KTRR";

/// Current body layout version
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2 + 4;

/// Errors decoding or encoding a record file
#[derive(Debug, Error)]
pub enum CodecError {
    /// Fewer bytes than a header
    #[error("record is truncated ({0} bytes)")]
    Truncated(usize),

    /// Not a record file
    #[error("bad magic {0:02x?}")]
    BadMagic([u8; 4]),

    /// Written by an incompatible version
    #[error("unsupported record version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u16),

    /// Declared body length disagrees with the file
    #[error("body length mismatch: header says {declared}, found {actual}")]
    LengthMismatch {
        /// Length from the header
        declared: usize,
        /// Bytes actually present
        actual: usize,
    },

    /// Body too large for the length field
    #[error("record body of {0} bytes is too large")]
    TooLarge(usize),

    /// Timestamp outside the representable range
    #[error("invalid timestamp {0}")]
    Timestamp(i64),

    /// Body could not be (de)serialized
    #[error("record body: {0}")]
    Body(#[from] bincode::Error),
}

#[derive(Serialize, Deserialize)]
struct Body {
    written_at: i64,
    record: RunRecord,
}

/// A decoded record with its write time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// The record itself
    pub record: RunRecord,
    /// When it was saved
    pub written_at: DateTime<Utc>,
}

/// Encode a record stamped with `written_at`
pub fn encode(record: &RunRecord, written_at: DateTime<Utc>) -> Result<Vec<u8>, CodecError> {
    let body = bincode::serialize(&Body {
        written_at: written_at.timestamp(),
        record: record.clone(),
    })?;
    let len = u32::try_from(body.len()).map_err(|_| CodecError::TooLarge(body.len()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a record file's bytes
pub fn decode(bytes: &[u8]) -> Result<StoredRecord, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated(bytes.len()));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);

    let magic = [header[0], header[1], header[2], header[3]];
    if magic != MAGIC {
        return Err(CodecError::BadMagic(magic));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let declared = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    if declared != body.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    let Body { written_at, record } = bincode::deserialize(body)?;
    let written_at =
        DateTime::from_timestamp(written_at, 0).ok_or(CodecError::Timestamp(written_at))?;
    Ok(StoredRecord { record, written_at })
}
