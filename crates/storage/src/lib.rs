#![forbid(unsafe_code)]

pub mod codec;
pub mod repository;
pub mod sqlite;

pub use codec::{CodecError, decode_progress, encode_progress};
pub use repository::{InMemoryProgressStore, PROGRESS_KEY, ProgressStore, Storage, StorageError};
