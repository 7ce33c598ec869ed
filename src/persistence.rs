//! Model persistence.
//!
//! Trained models are plain serde values; a [`ModelCodec`] turns them into
//! bytes and back. Two codecs are provided: a compact binary one (bincode)
//! and a human-readable one (JSON).

mod codec;
mod file;

pub use codec::{BINCODE_MAGIC, BincodeCodec, JsonCodec, ModelCodec, ModelFormat};
pub use file::{load_model, load_model_detect, save_model};
