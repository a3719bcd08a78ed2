//! Content hashing and storage-key generation.

use bytes::Bytes;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// SHA-256 over the full file content, as a lowercase hex string.
///
/// The S3 path uses this to bind the pre-signed URL request to the exact
/// content being uploaded. Hashing runs on the blocking pool since files can
/// be several megabytes.
pub async fn compute_sha256(bytes: &Bytes) -> String {
    let owned = bytes.clone();
    match tokio::task::spawn_blocking(move || digest_hex(&owned)).await {
        Ok(digest) => digest,
        // Join errors only occur if the closure panicked; hash inline instead.
        Err(_) => digest_hex(bytes),
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Cryptographically random hex identifier of `byte_len` raw bytes.
///
/// Used as the storage key so object names are unguessable and collision-free
/// with overwhelming probability.
pub fn generate_file_name(byte_len: usize) -> String {
    let mut buf = vec![0u8; byte_len];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedrop_core::constants::STORAGE_KEY_BYTES;

    #[tokio::test]
    async fn test_sha256_known_vector() {
        let digest = compute_sha256(&Bytes::from_static(b"abc")).await;
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_sha256_empty_input() {
        let digest = compute_sha256(&Bytes::new()).await;
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_generate_file_name_length_and_charset() {
        let name = generate_file_name(STORAGE_KEY_BYTES);
        assert_eq!(name.len(), STORAGE_KEY_BYTES * 2);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_file_name_unique() {
        assert_ne!(generate_file_name(32), generate_file_name(32));
    }
}
