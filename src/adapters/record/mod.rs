//! Run record persistence

pub mod codec;
mod file;

pub use codec::{CodecError, StoredRecord};
pub use file::{FileRecordStore, RecordError};
