//! Quality-degrading image recompression.
//!
//! Used by the retry loop: each retry re-encodes the original image at a
//! lower quality, trading fidelity for a higher chance that the remote host
//! accepts the upload.

use bytes::Bytes;
use filedrop_core::FileData;
use image::codecs::jpeg::JpegEncoder;

/// Re-encode an image at the given quality (0.0..=1.0).
///
/// The payload is re-encoded as JPEG, which honors the quality setting for
/// every input format. Any decode or encode failure falls back to the
/// original file unchanged, so a failed recompression never loses the upload.
pub async fn compress_image(file: &FileData, quality: f32) -> FileData {
    let bytes = file.bytes.clone();
    let encoded = tokio::task::spawn_blocking(move || reencode_jpeg(&bytes, quality))
        .await
        .ok()
        .flatten();

    match encoded {
        Some(out) => {
            tracing::debug!(
                original_bytes = file.size(),
                compressed_bytes = out.len(),
                quality,
                "recompressed image"
            );
            FileData::new(file.name.clone(), "image/jpeg", Bytes::from(out))
        }
        None => {
            tracing::debug!(quality, "recompression failed, keeping original file");
            file.clone()
        }
    }
}

fn reencode_jpeg(bytes: &[u8], quality: f32) -> Option<Vec<u8>> {
    let img = image::load_from_memory(bytes).ok()?;
    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let jpeg_quality = (quality.clamp(0.1, 1.0) * 100.0) as u8;

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality);
    encoder.encode_image(&rgb).ok()?;
    Some(out)
}
