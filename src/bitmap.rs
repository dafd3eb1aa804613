//! Windows BMP encoding and decoding for indexed rasters.
//!
//! The encoder writes a `BITMAPINFOHEADER` file at the narrowest palette
//! depth that holds the image's colour table (1, 4 or 8 bits per pixel).
//! The decoder reads uncompressed 1, 4 and 8-bit palette files, bottom-up
//! or top-down, and rejects everything else with a typed error.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::error::{Result, SheetError};
use crate::render::GridImage;
use crate::types::{Colour, MAX_PALETTE_LEN};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const BI_RGB: u32 = 0;
/// 72 DPI expressed in pixels per metre.
const PIXELS_PER_METRE: i32 = 2835;

/// Errors raised while reading or writing BMP data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitmapError {
    #[error("not a BMP file (missing 'BM' signature)")]
    InvalidSignature,

    #[error("truncated BMP data: needed {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("unsupported BMP header size {0}")]
    UnsupportedHeader(u32),

    #[error("unsupported bit depth: {0}")]
    UnsupportedDepth(u16),

    #[error("unsupported compression: {0}")]
    UnsupportedCompression(u32),

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("palette index {index} out of range for {palette_len} colours")]
    IndexOutOfRange { index: u8, palette_len: usize },

    #[error("cannot write an indexed bitmap without a palette")]
    EmptyPalette,

    #[error("palette has {0} colours, at most 256 fit in a BMP colour table")]
    PaletteTooLarge(usize),
}

/// Narrowest supported depth for a colour table of `len` entries.
pub fn depth_for(len: usize) -> u16 {
    match len {
        0..=2 => 1,
        3..=16 => 4,
        _ => 8,
    }
}

/// Bytes per stored row, padded to a 4-byte boundary.
fn row_stride(width: u32, depth: u16) -> usize {
    let bits = width as usize * depth as usize;
    (bits.div_ceil(8) + 3) & !3
}

/// Encode an indexed image as BMP.
pub fn encode(image: &GridImage) -> std::result::Result<Vec<u8>, BitmapError> {
    let palette = image.palette();
    if palette.is_empty() {
        return Err(BitmapError::EmptyPalette);
    }
    if palette.len() > MAX_PALETTE_LEN {
        return Err(BitmapError::PaletteTooLarge(palette.len()));
    }
    if let Some(&index) = image.indices().iter().find(|&&i| i as usize >= palette.len()) {
        return Err(BitmapError::IndexOutOfRange {
            index,
            palette_len: palette.len(),
        });
    }

    let (width, height) = image.size();
    let depth = depth_for(palette.len());
    let stride = row_stride(width, depth);
    let data_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + palette.len() * 4;
    let image_size = stride * height as usize;
    let file_size = data_offset + image_size;

    let mut out = Vec::with_capacity(file_size);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(data_offset as u32).to_le_bytes());

    // BITMAPINFOHEADER, positive height: rows stored bottom-up
    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&depth.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&(image_size as u32).to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for c in palette {
        out.extend_from_slice(&[c.b, c.g, c.r, 0]);
    }

    let mut packed = vec![0u8; stride];
    for y in (0..height).rev() {
        packed.fill(0);
        for (x, &index) in image.row(y).iter().enumerate() {
            match depth {
                1 => packed[x / 8] |= (index & 1) << (7 - x % 8),
                4 => packed[x / 2] |= (index & 0x0F) << if x % 2 == 0 { 4 } else { 0 },
                _ => packed[x] = index,
            }
        }
        out.extend_from_slice(&packed);
    }

    Ok(out)
}

fn ensure_len(data: &[u8], expected: usize) -> std::result::Result<(), BitmapError> {
    if data.len() < expected {
        return Err(BitmapError::Truncated {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn le_i32(data: &[u8], at: usize) -> i32 {
    le_u32(data, at) as i32
}

/// Decode a 1, 4 or 8-bit uncompressed BMP into an indexed image.
///
/// Colour table entries are read as opaque colours.
pub fn decode(data: &[u8]) -> std::result::Result<GridImage, BitmapError> {
    ensure_len(data, 2)?;
    if &data[0..2] != b"BM" {
        return Err(BitmapError::InvalidSignature);
    }
    ensure_len(data, FILE_HEADER_LEN + 4)?;

    let data_offset = le_u32(data, 10) as usize;
    let header_len = le_u32(data, 14);
    if (header_len as usize) < INFO_HEADER_LEN {
        return Err(BitmapError::UnsupportedHeader(header_len));
    }
    ensure_len(data, FILE_HEADER_LEN + INFO_HEADER_LEN)?;

    let raw_width = le_i32(data, 18);
    let raw_height = le_i32(data, 22);
    let depth = le_u16(data, 28);
    let compression = le_u32(data, 30);
    let colours_used = le_u32(data, 46) as usize;

    if raw_width <= 0 || raw_height == 0 || raw_height == i32::MIN {
        return Err(BitmapError::InvalidDimensions {
            width: i64::from(raw_width),
            height: i64::from(raw_height),
        });
    }
    if !matches!(depth, 1 | 4 | 8) {
        return Err(BitmapError::UnsupportedDepth(depth));
    }
    if compression != BI_RGB {
        return Err(BitmapError::UnsupportedCompression(compression));
    }

    let width = raw_width as u32;
    let height = raw_height.unsigned_abs();
    let top_down = raw_height < 0;

    let palette_start = FILE_HEADER_LEN + header_len as usize;
    let max_colours = 1usize << depth;
    let table_room = data_offset.saturating_sub(palette_start) / 4;
    let colours = match colours_used {
        0 => max_colours,
        n => n.min(max_colours),
    }
    .min(table_room);

    ensure_len(data, palette_start + colours * 4)?;
    let palette: Vec<Colour> = (0..colours)
        .map(|i| {
            let at = palette_start + i * 4;
            Colour::rgb(data[at + 2], data[at + 1], data[at])
        })
        .collect();

    let stride = row_stride(width, depth);
    ensure_len(data, data_offset + stride * height as usize)?;

    let mut image = GridImage::new(width, height, palette);
    for row in 0..height {
        let y = if top_down { row } else { height - 1 - row };
        let start = data_offset + row as usize * stride;
        let bytes = &data[start..start + stride];

        for x in 0..width as usize {
            let index = match depth {
                1 => (bytes[x / 8] >> (7 - x % 8)) & 1,
                4 => {
                    if x % 2 == 0 {
                        bytes[x / 2] >> 4
                    } else {
                        bytes[x / 2] & 0x0F
                    }
                }
                _ => bytes[x],
            };
            if index as usize >= colours {
                return Err(BitmapError::IndexOutOfRange {
                    index,
                    palette_len: colours,
                });
            }
            image.set_index(x as u32, y, index);
        }
    }

    Ok(image)
}

/// Encode `image` and write it to `path`.
pub fn write_bmp(image: &GridImage, path: &Path) -> Result<()> {
    let bytes = encode(image)?;
    let file = File::create(path).map_err(|e| SheetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to create file: {}", e),
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write BMP: {}", e),
        })?;
    Ok(())
}

/// Read and decode a BMP file.
pub fn read_bmp(path: &Path) -> Result<GridImage> {
    let bytes = std::fs::read(path).map_err(|e| SheetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;
    Ok(decode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternSource;
    use crate::types::Palette;
    use tempfile::tempdir;

    /// A sheet-like raster touching every palette entry.
    fn sample(width: u32, height: u32, colours: usize) -> GridImage {
        let palette: Vec<Colour> = (0..colours)
            .map(|i| Colour::rgb(i as u8, (i * 3) as u8, 255 - i as u8))
            .collect();
        let mut image = GridImage::new(width, height, palette);
        for y in 0..height {
            for x in 0..width {
                let source = PatternSource::new(u64::from(x / 8 + y), &[]);
                let base = source.index_at(i64::from(x), i64::from(y)) as usize;
                let index = (base + (x as usize + y as usize * 7)) % colours;
                image.set_index(x, y, index as u8);
            }
        }
        image
    }

    #[test]
    fn test_depth_for() {
        assert_eq!(depth_for(1), 1);
        assert_eq!(depth_for(2), 1);
        assert_eq!(depth_for(3), 4);
        assert_eq!(depth_for(16), 4);
        assert_eq!(depth_for(17), 8);
        assert_eq!(depth_for(256), 8);
    }

    #[test]
    fn test_row_stride_padding() {
        assert_eq!(row_stride(1, 1), 4);
        assert_eq!(row_stride(33, 1), 8);
        assert_eq!(row_stride(9, 4), 8);
        assert_eq!(row_stride(5, 8), 8);
    }

    #[test]
    fn test_round_trip_all_depths() {
        // Odd widths exercise partial bytes and row padding.
        for (colours, depth) in [(2, 1), (16, 4), (200, 8)] {
            let image = sample(37, 13, colours);
            let bytes = encode(&image).unwrap();
            assert_eq!(le_u16(&bytes, 28), depth);

            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded, image, "depth {} round trip", depth);
        }
    }

    #[test]
    fn test_header_fields() {
        let image = sample(8, 4, 2);
        let bytes = encode(&image).unwrap();

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(le_u32(&bytes, 2) as usize, bytes.len());
        assert_eq!(le_u32(&bytes, 10), 14 + 40 + 8);
        assert_eq!(le_i32(&bytes, 18), 8);
        assert_eq!(le_i32(&bytes, 22), 4);
        assert_eq!(le_u32(&bytes, 46), 2);
        assert_eq!(bytes.len(), 62 + 4 * 4);
    }

    #[test]
    fn test_bottom_up_row_order() {
        let mut image = GridImage::new(1, 2, vec![Colour::WHITE, Colour::BLACK]);
        image.set_index(0, 0, 1);
        let bytes = encode(&image).unwrap();
        // First stored row is the bottom one.
        assert_eq!(bytes[62], 0x00);
        assert_eq!(bytes[66], 0x80);
    }

    #[test]
    fn test_decode_top_down() {
        let image = sample(10, 6, 16);
        let mut bytes = encode(&image).unwrap();

        // Flip to top-down storage by reversing the rows and negating height.
        let offset = le_u32(&bytes, 10) as usize;
        let stride = row_stride(10, 4);
        let rows: Vec<Vec<u8>> = bytes[offset..].chunks(stride).map(|r| r.to_vec()).collect();
        let flipped: Vec<u8> = rows.into_iter().rev().flatten().collect();
        bytes.truncate(offset);
        bytes.extend_from_slice(&flipped);
        bytes[22..26].copy_from_slice(&(-6i32).to_le_bytes());

        assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn test_decode_rejects_bad_signature() {
        assert_eq!(decode(b"PNG not a bmp at all"), Err(BitmapError::InvalidSignature));
        assert!(matches!(decode(b"B"), Err(BitmapError::Truncated { .. })));
    }

    #[test]
    fn test_decode_rejects_unsupported_depth() {
        let mut bytes = encode(&sample(4, 4, 2)).unwrap();
        bytes[28..30].copy_from_slice(&24u16.to_le_bytes());
        assert_eq!(decode(&bytes), Err(BitmapError::UnsupportedDepth(24)));
    }

    #[test]
    fn test_decode_rejects_compression() {
        let mut bytes = encode(&sample(4, 4, 16)).unwrap();
        bytes[30..34].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(decode(&bytes), Err(BitmapError::UnsupportedCompression(2)));
    }

    #[test]
    fn test_decode_rejects_truncated_pixels() {
        let bytes = encode(&sample(16, 16, 2)).unwrap();
        let cut = &bytes[..bytes.len() - 3];
        assert!(matches!(decode(cut), Err(BitmapError::Truncated { .. })));
    }

    #[test]
    fn test_decode_rejects_zero_size() {
        let mut bytes = encode(&sample(4, 4, 2)).unwrap();
        bytes[18..22].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(BitmapError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_index_past_palette() {
        let image = sample(4, 1, 3);
        let mut bytes = encode(&image).unwrap();
        let offset = le_u32(&bytes, 10) as usize;
        bytes[offset] = 0xF0;
        assert_eq!(
            decode(&bytes),
            Err(BitmapError::IndexOutOfRange {
                index: 15,
                palette_len: 3
            })
        );
    }

    #[test]
    fn test_encode_errors() {
        let empty = GridImage::new(2, 2, vec![]);
        assert_eq!(encode(&empty), Err(BitmapError::EmptyPalette));

        let mut image = GridImage::new(2, 1, vec![Colour::WHITE, Colour::BLACK]);
        image.set_index(1, 0, 5);
        assert_eq!(
            encode(&image),
            Err(BitmapError::IndexOutOfRange {
                index: 5,
                palette_len: 2
            })
        );
    }

    #[test]
    fn test_write_and_read_file() {
        let palette = Palette::preset("cga").unwrap();
        let image = GridImage::new(20, 20, palette.colours().to_vec());

        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.bmp");
        write_bmp(&image, &path).unwrap();

        assert_eq!(read_bmp(&path).unwrap(), image);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_bmp(&dir.path().join("nope.bmp"));
        assert!(matches!(result, Err(SheetError::Io { .. })));
    }
}
