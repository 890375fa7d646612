//! Minimal PNG encoder for 8-bit RGBA canvases.
//!
//! Output layout:
//! ```text
//! [signature: 8 bytes] [IHDR] [IDAT: zlib(scanlines)] [IEND]
//! ```
//!
//! Every chunk is `[length: 4 bytes BE] [tag: 4 bytes] [payload] [CRC32: 4 bytes BE]`,
//! with the CRC taken over tag and payload. Scanlines use filter type 0.

use anyhow::{ensure, Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};
use flate2::{write::ZlibEncoder, Compression};
use image::RgbaImage;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::debug;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const FILTER_NONE: u8 = 0;

/// CRC-32 of a chunk, covering the tag followed by the payload.
pub fn chunk_crc(tag: &[u8; 4], payload: &[u8]) -> u32 {
    let mut digest = CRC32.digest();
    digest.update(tag);
    digest.update(payload);
    digest.finalize()
}

fn write_chunk<W: Write>(w: &mut W, tag: &[u8; 4], payload: &[u8]) -> Result<()> {
    let length = u32::try_from(payload.len()).context("PNG chunk payload too large")?;
    w.write_all(&length.to_be_bytes())?;
    w.write_all(tag)?;
    w.write_all(payload)?;
    w.write_all(&chunk_crc(tag, payload).to_be_bytes())?;
    Ok(())
}

fn header_payload(width: u32, height: u32) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = COLOR_TYPE_RGBA;
    // compression, filter and interlace methods stay 0
    ihdr
}

/// Compress the canvas rows, each prefixed with the "no filter" marker.
fn compress_scanlines(image: &RgbaImage) -> Result<Vec<u8>> {
    let stride = image.width() as usize * 4;
    let mut raw = Vec::with_capacity((stride + 1) * image.height() as usize);
    for row in image.as_raw().chunks_exact(stride) {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish().context("Failed to compress scanlines")?;
    debug!(raw = raw.len(), compressed = compressed.len(), "compressed image data");
    Ok(compressed)
}

/// Encode the canvas as a PNG stream into `w`.
pub fn write_png<W: Write>(image: &RgbaImage, mut w: W) -> Result<()> {
    ensure!(
        image.width() > 0 && image.height() > 0,
        "PNG images must have non-zero dimensions, got {}x{}",
        image.width(),
        image.height()
    );

    let idat = compress_scanlines(image)?;

    w.write_all(&PNG_SIGNATURE)?;
    write_chunk(&mut w, b"IHDR", &header_payload(image.width(), image.height()))?;
    write_chunk(&mut w, b"IDAT", &idat)?;
    write_chunk(&mut w, b"IEND", &[])?;
    w.flush()?;
    Ok(())
}

/// Encode the canvas into an in-memory PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(image, &mut buf)?;
    Ok(buf)
}

/// Write the canvas to `path`, replacing any existing file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    write_png(image, BufWriter::new(file))
        .with_context(|| format!("Failed to write PNG {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use image::{ImageBuffer, Rgba};
    use std::io::Read;

    /// Split an encoded PNG into (tag, payload) pairs, checking lengths and CRCs on the way.
    fn parse_chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        let mut chunks = Vec::new();
        let mut rest = &png[8..];
        while !rest.is_empty() {
            let length = u32::from_be_bytes(rest[0..4].try_into().unwrap()) as usize;
            let tag: [u8; 4] = rest[4..8].try_into().unwrap();
            let payload = rest[8..8 + length].to_vec();
            let crc = u32::from_be_bytes(rest[8 + length..12 + length].try_into().unwrap());
            assert_eq!(crc, chunk_crc(&tag, &payload), "bad CRC on {:?}", tag);
            chunks.push((tag, payload));
            rest = &rest[12 + length..];
        }
        chunks
    }

    fn checkerboard(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 128, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_crc_known_value() {
        // Every PNG ends with this exact IEND chunk
        assert_eq!(chunk_crc(b"IEND", &[]), 0xAE42_6082);
    }

    #[test]
    fn test_chunk_layout() {
        let png = encode_png(&checkerboard(3, 2)).unwrap();
        let chunks = parse_chunks(&png);

        let tags: Vec<&[u8; 4]> = chunks.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![b"IHDR", b"IDAT", b"IEND"]);

        let ihdr = &chunks[0].1;
        assert_eq!(ihdr, &[0u8, 0, 0, 3, 0, 0, 0, 2, 8, 6, 0, 0, 0]);
        assert!(chunks[2].1.is_empty());
        assert_eq!(
            &png[png.len() - 12..],
            &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_idat_holds_unfiltered_scanlines() {
        let img = checkerboard(3, 2);
        let png = encode_png(&img).unwrap();
        let chunks = parse_chunks(&png);

        let mut raw = Vec::new();
        ZlibDecoder::new(&chunks[1].1[..])
            .read_to_end(&mut raw)
            .unwrap();

        assert_eq!(raw.len(), 2 * (1 + 3 * 4));
        assert_eq!(raw[0], 0);
        assert_eq!(&raw[1..13], &img.as_raw()[0..12]);
        assert_eq!(raw[13], 0);
        assert_eq!(&raw[14..], &img.as_raw()[12..]);
    }

    #[test]
    fn test_decodes_with_image_crate() {
        let img = checkerboard(7, 5);
        let png = encode_png(&img).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_rejects_empty_canvas() {
        assert!(encode_png(&RgbaImage::new(0, 4)).is_err());
    }

    #[test]
    fn test_save_png_overwrites_and_reports_missing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"stale").unwrap();

        let img = checkerboard(4, 4);
        save_png(&img, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), encode_png(&img).unwrap());

        let missing = dir.path().join("no_such_dir").join("out.png");
        let err = save_png(&img, &missing).unwrap_err();
        assert!(err.to_string().contains("no_such_dir"));
    }
}
