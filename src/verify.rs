//! Checking a reference sheet against regenerated patterns.
//!
//! A reference sheet is split into blobs: 4-connected regions of non-white
//! pixels larger than [`MIN_BLOB_SIZE`] in both directions, which drops
//! labels and stray marks. Blobs are read in rows, left to right, and paired
//! with a list of modes in that order. Each blob is then compared pixel by
//! pixel (RGB only) against the pattern for its mode.

use std::collections::VecDeque;
use std::path::Path;

use crate::bitmap::read_bmp;
use crate::error::{Result, SheetError};
use crate::layout::Rect;
use crate::pattern::PatternSource;
use crate::render::GridImage;
use crate::types::Palette;

/// Blobs must be wider and taller than this to count as patterns.
pub const MIN_BLOB_SIZE: u32 = 20;

/// Height of the bands blobs are grouped into when reading rows.
pub const ROW_BIN: u32 = 32;

/// Where the regenerated pattern's origin sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Pattern origin at the blob's top-left corner. Scanned reference
    /// sheets are compared this way.
    #[default]
    Blob,
    /// Pattern origin at the sheet origin, as this tool draws them.
    Sheet,
}

/// Comparison result for one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeReport {
    pub mode: u64,
    pub rect: Rect,
    pub differing: u64,
    pub total: u64,
}

impl ModeReport {
    pub fn matches(&self) -> bool {
        self.differing == 0
    }

    /// Share of differing pixels, in percent.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.differing as f64 * 100.0 / self.total as f64
        }
    }
}

/// Outcome of verifying a whole sheet.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub results: Vec<ModeReport>,
    /// Blobs found beyond the end of the mode list.
    pub extra_blobs: usize,
    /// Modes left without a blob.
    pub missing_modes: Vec<u64>,
}

impl VerifyReport {
    pub fn failures(&self) -> impl Iterator<Item = &ModeReport> {
        self.results.iter().filter(|r| !r.matches())
    }

    pub fn is_match(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Turn a report with mismatches into a `Verify` error.
    pub fn into_result(self) -> Result<Self> {
        let failed: Vec<String> = self.failures().map(|r| r.mode.to_string()).collect();
        if failed.is_empty() {
            return Ok(self);
        }
        Err(SheetError::Verify {
            message: format!(
                "{} of {} patterns differ (modes {})",
                failed.len(),
                self.results.len(),
                failed.join(", ")
            ),
            help: Some("Check the mode order and the palette used for the sheet".to_string()),
        })
    }
}

/// Find pattern-sized regions of non-white pixels, in scan order.
pub fn find_pattern_blobs(image: &GridImage) -> Vec<Rect> {
    let (width, height) = image.size();
    let mut visited = vec![false; width as usize * height as usize];
    let mut blobs = Vec::new();

    let inked = |x: u32, y: u32| image.colour_at(x, y).is_some_and(|c| !c.is_white());

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if visited[idx] || !inked(x, y) {
                continue;
            }

            visited[idx] = true;
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
            let mut queue = VecDeque::from([(x, y)]);

            while let Some((px, py)) = queue.pop_front() {
                min_x = min_x.min(px);
                min_y = min_y.min(py);
                max_x = max_x.max(px);
                max_y = max_y.max(py);

                let neighbours = [
                    (px.checked_sub(1), Some(py)),
                    (px.checked_add(1).filter(|&n| n < width), Some(py)),
                    (Some(px), py.checked_sub(1)),
                    (Some(px), py.checked_add(1).filter(|&n| n < height)),
                ];
                for (nx, ny) in neighbours {
                    let (Some(nx), Some(ny)) = (nx, ny) else {
                        continue;
                    };
                    let n_idx = (ny * width + nx) as usize;
                    if !visited[n_idx] && inked(nx, ny) {
                        visited[n_idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }

            let rect = Rect::new(min_x, min_y, max_x + 1, max_y + 1);
            if rect.width() > MIN_BLOB_SIZE && rect.height() > MIN_BLOB_SIZE {
                blobs.push(rect);
            } else {
                tracing::trace!(?rect, "Skipping small blob");
            }
        }
    }

    blobs
}

/// Order blobs by row band, then left to right.
pub fn sort_blobs_spatial(blobs: &mut [Rect]) {
    blobs.sort_by_key(|r| (r.min_y / ROW_BIN, r.min_x));
}

/// Count pixels in `rect` whose RGB differs from the pattern for `mode`.
pub fn count_differences(
    image: &GridImage,
    rect: Rect,
    mode: u64,
    palette: &Palette,
    anchor: Anchor,
) -> u64 {
    let source = PatternSource::new(mode, palette.colours());
    let (ox, oy) = match anchor {
        Anchor::Blob => (i64::from(rect.min_x), i64::from(rect.min_y)),
        Anchor::Sheet => (0, 0),
    };

    rect.points()
        .filter(|&(x, y)| {
            let expected = source.at(i64::from(x) - ox, i64::from(y) - oy);
            !image
                .colour_at(x, y)
                .is_some_and(|actual| actual.same_rgb(expected))
        })
        .count() as u64
}

/// Pair blobs with `modes` and compare each against its pattern.
pub fn verify_image(
    image: &GridImage,
    modes: &[u64],
    palette: &Palette,
    anchor: Anchor,
) -> Result<VerifyReport> {
    let mut blobs = find_pattern_blobs(image);
    if blobs.is_empty() {
        return Err(SheetError::Verify {
            message: "no patterns found in reference sheet".to_string(),
            help: Some(format!(
                "Patterns must be larger than {0}x{0} pixels on a white background",
                MIN_BLOB_SIZE
            )),
        });
    }
    sort_blobs_spatial(&mut blobs);
    tracing::info!(blobs = blobs.len(), modes = modes.len(), "Found pattern blobs");

    let results: Vec<ModeReport> = blobs
        .iter()
        .zip(modes)
        .map(|(&rect, &mode)| {
            let report = ModeReport {
                mode,
                rect,
                differing: count_differences(image, rect, mode, palette, anchor),
                total: u64::from(rect.width()) * u64::from(rect.height()),
            };
            tracing::debug!(mode, differing = report.differing, "Compared pattern");
            report
        })
        .collect();

    let extra_blobs = blobs.len().saturating_sub(modes.len());
    let missing_modes = modes.iter().skip(blobs.len()).copied().collect::<Vec<_>>();
    if extra_blobs > 0 {
        tracing::warn!(extra_blobs, "More blobs than modes; extras ignored");
    }
    if !missing_modes.is_empty() {
        tracing::warn!(missing = missing_modes.len(), "Fewer blobs than modes");
    }

    Ok(VerifyReport {
        results,
        extra_blobs,
        missing_modes,
    })
}

/// Read a BMP reference sheet and verify it.
pub fn verify_sheet(
    path: &Path,
    modes: &[u64],
    palette: &Palette,
    anchor: Anchor,
) -> Result<VerifyReport> {
    let image = read_bmp(path)?;
    verify_image(&image, modes, palette, anchor)
}

/// Parse a mode list such as `0-255` or `114,110,106`.
pub fn parse_modes(s: &str) -> Result<Vec<u64>> {
    let bad = |part: &str| SheetError::Parse {
        message: format!("Invalid mode list entry: '{}'", part),
        help: Some("Use numbers and inclusive ranges, e.g. 0-15,32,40-47".to_string()),
    };

    let mut modes = Vec::new();
    for part in s.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(bad(part));
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u64 = start.trim().parse().map_err(|_| bad(part))?;
                let end: u64 = end.trim().parse().map_err(|_| bad(part))?;
                if start > end {
                    return Err(bad(part));
                }
                modes.extend(start..=end);
            }
            None => modes.push(part.parse().map_err(|_| bad(part))?),
        }
    }
    Ok(modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::write_bmp;
    use crate::types::Colour;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const CELL: u32 = 24;

    /// White canvas with `modes` drawn blob-anchored in a grid of 24px cells
    /// at a 32px pitch, plus a small mark standing in for a label.
    fn reference(modes: &[u64], columns: u32, palette: &Palette) -> GridImage {
        let rows = (modes.len() as u32).div_ceil(columns);
        let mut image = GridImage::new(
            8 + columns * 40,
            8 + rows * 40,
            vec![Colour::WHITE, Colour::BLACK],
        );

        for (i, &mode) in modes.iter().enumerate() {
            let (col, row) = (i as u32 % columns, i as u32 / columns);
            let (left, top) = (8 + col * 40, 8 + row * 40);
            let source = PatternSource::new(mode, palette.colours());
            for y in 0..CELL {
                for x in 0..CELL {
                    let colour = source.at(i64::from(x), i64::from(y));
                    let index = if colour.is_white() { 0 } else { 1 };
                    image.set_index(left + x, top + y, index);
                }
            }
            // Label-sized mark below the cell.
            image.fill_rect(Rect::new(left, top + CELL + 4, left + 6, top + CELL + 8), 1);
        }
        image
    }

    #[test]
    fn test_find_blobs_skips_small_marks() {
        let palette = Palette::preset("bwgr").unwrap();
        let image = reference(&[0, 1, 2], 3, &palette);

        let blobs = find_pattern_blobs(&image);
        assert_eq!(
            blobs,
            vec![
                Rect::new(8, 8, 32, 32),
                Rect::new(48, 8, 72, 32),
                Rect::new(88, 8, 112, 32),
            ]
        );
    }

    #[test]
    fn test_sort_blobs_spatial() {
        let mut blobs = vec![
            Rect::new(50, 40, 80, 70),
            Rect::new(90, 3, 120, 30),
            Rect::new(10, 40, 40, 70),
            Rect::new(10, 0, 40, 30),
        ];
        sort_blobs_spatial(&mut blobs);
        let origins: Vec<_> = blobs.iter().map(|r| (r.min_x, r.min_y)).collect();
        assert_eq!(origins, vec![(10, 0), (90, 3), (10, 40), (50, 40)]);
    }

    #[test]
    fn test_verify_matching_sheet() {
        let palette = Palette::preset("bwgr").unwrap();
        let modes = [0, 1, 2, 3, 4, 5, 6];
        let image = reference(&modes, 4, &palette);

        let report = verify_image(&image, &modes, &palette, Anchor::Blob).unwrap();
        assert_eq!(report.results.len(), 7);
        assert!(report.is_match());
        assert_eq!(report.extra_blobs, 0);
        assert!(report.missing_modes.is_empty());
        assert_eq!(report.results[4].rect, Rect::new(8, 48, 32, 72));
    }

    #[test]
    fn test_verify_reports_wrong_mode() {
        let palette = Palette::preset("bwgr").unwrap();
        let image = reference(&[0, 1, 2, 3], 4, &palette);

        let report = verify_image(&image, &[0, 1, 5, 3], &palette, Anchor::Blob).unwrap();
        let failed: Vec<u64> = report.failures().map(|r| r.mode).collect();
        assert_eq!(failed, vec![5]);
        assert!(report.results[2].percent() > 0.0);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, SheetError::Verify { .. }));
    }

    #[test]
    fn test_verify_counts_leftovers() {
        let palette = Palette::preset("bwgr").unwrap();
        let image = reference(&[0, 1, 2], 3, &palette);

        let report = verify_image(&image, &[0, 1], &palette, Anchor::Blob).unwrap();
        assert_eq!(report.extra_blobs, 1);

        let report = verify_image(&image, &[0, 1, 2, 3, 4], &palette, Anchor::Blob).unwrap();
        assert_eq!(report.missing_modes, vec![3, 4]);
        assert!(report.is_match());
    }

    #[test]
    fn test_verify_blank_sheet_fails() {
        let image = GridImage::new(64, 64, vec![Colour::WHITE]);
        let result = verify_image(&image, &[0], &Palette::default(), Anchor::Blob);
        assert!(matches!(result, Err(SheetError::Verify { .. })));
    }

    #[test]
    fn test_sheet_anchor_uses_absolute_coordinates() {
        let palette = Palette::preset("bwgr").unwrap();
        let mut image = GridImage::new(64, 64, vec![Colour::WHITE, Colour::BLACK]);
        let rect = Rect::new(13, 13, 45, 45);
        let source = PatternSource::new(2, palette.colours());
        for (x, y) in rect.points() {
            let white = source.at(i64::from(x), i64::from(y)).is_white();
            image.set_index(x, y, if white { 0 } else { 1 });
        }

        assert_eq!(count_differences(&image, rect, 2, &palette, Anchor::Sheet), 0);
        assert!(count_differences(&image, rect, 2, &palette, Anchor::Blob) > 0);
    }

    #[test]
    fn test_verify_sheet_from_file() {
        let palette = Palette::preset("bwgr").unwrap();
        let modes = [6, 5, 4];
        let dir = tempdir().unwrap();
        let path = dir.path().join("ref.bmp");
        write_bmp(&reference(&modes, 3, &palette), &path).unwrap();

        let report = verify_sheet(&path, &modes, &palette, Anchor::Blob).unwrap();
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(parse_modes("3").unwrap(), vec![3]);
        assert_eq!(parse_modes("0-3").unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(
            parse_modes("114, 110,106,5-6").unwrap(),
            vec![114, 110, 106, 5, 6]
        );
        assert_eq!(parse_modes("0-255").unwrap().len(), 256);
    }

    #[test]
    fn test_parse_modes_rejects_garbage() {
        for input in ["", "1,,2", "a", "5-2", "-3", "1-x"] {
            assert!(
                matches!(parse_modes(input), Err(SheetError::Parse { .. })),
                "accepted {:?}",
                input
            );
        }
    }
}
