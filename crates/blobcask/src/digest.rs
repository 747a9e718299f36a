//! Incremental SHA-256 digests of blob content, hex encoded.
//!
//! Content is fed to the hasher in fixed-size chunks so arbitrarily large
//! blobs never need a second in-memory copy. The external form is always
//! lowercase hex; raw digest bytes are never treated as text.

use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

const CHUNK: usize = 64 * 1024;

/// Hex-encoded SHA-256 of everything readable from `reader`.
pub async fn sha256_hex<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA-256 of an in-memory slice.
pub fn sha256_hex_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            sha256_hex_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_output_is_lowercase_hex() {
        let digest = sha256_hex_bytes(b"anything");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_streamed_matches_direct() {
        let data = vec![0xabu8; 3 * CHUNK + 17];
        let streamed = sha256_hex(Cursor::new(data.clone())).await.unwrap();
        assert_eq!(streamed, sha256_hex_bytes(&data));
    }

    #[tokio::test]
    async fn test_large_zero_buffer() {
        let data = vec![0u8; 1024 * 1024];
        let streamed = sha256_hex(Cursor::new(data)).await.unwrap();
        assert_eq!(
            streamed,
            "30e14955ebf1352266dc2ff8067e68104607e750abb9d3b36582b8af909fcb58"
        );
    }
}
