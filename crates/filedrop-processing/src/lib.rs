//! Filedrop Processing Library
//!
//! Pure file-level building blocks for the upload pipeline: type/size/decode
//! validators, content hashing, storage-key generation, URL/filename helpers,
//! and quality-degrading image recompression for retry attempts.

pub mod checksum;
pub mod compress;
pub mod filename;
pub mod validate;

pub use checksum::{compute_sha256, generate_file_name};
pub use compress::compress_image;
pub use filename::{extract_filename_from_url, is_valid_url, public_file_url};
pub use validate::{validate_file_size, validate_file_type, validate_image_file};
