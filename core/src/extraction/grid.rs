use crate::error::{EcgError, Result};
use crate::types::{SignalMatrix, WaveformSignal, LEAD_COUNT};
use image::{imageops, RgbImage};
use log::{debug, info};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;

use super::waveform::WaveformExtractor;

/// Rows in the printed lead grid
pub const GRID_ROWS: u32 = 6;

/// Columns in the printed lead grid
pub const GRID_COLS: u32 = 2;

/// Grid scan index -> canonical lead index
///
/// Grid cells are scanned row-major. The left column holds the limb leads
/// (I, II, III, aVR, aVL, aVF) top to bottom and the right column holds
/// V1-V6, so even scan indices are limb leads and odd ones precordial.
pub const GRID_TO_CANONICAL: [usize; LEAD_COUNT] = [0, 6, 1, 7, 2, 8, 3, 9, 4, 10, 5, 11];

/// Canonical lead index -> grid scan index (inverse of [`GRID_TO_CANONICAL`])
pub const CANONICAL_TO_GRID: [usize; LEAD_COUNT] = [0, 2, 4, 6, 8, 10, 1, 3, 5, 7, 9, 11];

/// Geometry of the 6x2 grid for one image
///
/// Cell sizes use floor division; the bottom `height % 6` rows and the
/// rightmost `width % 2` column are not part of any cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub lead_width: u32,
    pub lead_height: u32,
    pub discarded_rows: u32,
    pub discarded_cols: u32,
}

impl GridLayout {
    /// Computes the layout for an image of the given size
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let lead_width = width / GRID_COLS;
        let lead_height = height / GRID_ROWS;
        Self {
            lead_width,
            lead_height,
            discarded_rows: height - lead_height * GRID_ROWS,
            discarded_cols: width - lead_width * GRID_COLS,
        }
    }

    /// Top-left corner of the cell at a grid scan index
    pub fn cell_origin(&self, scan_index: usize) -> (u32, u32) {
        let row = scan_index as u32 / GRID_COLS;
        let col = scan_index as u32 % GRID_COLS;
        (col * self.lead_width, row * self.lead_height)
    }

    /// Whether every cell has a non-zero area
    pub fn is_usable(&self) -> bool {
        self.lead_width > 0 && self.lead_height > 0
    }
}

/// Splits a 6x2 ECG printout into 12 lead traces in canonical order
#[derive(Debug, Clone, Copy, Default)]
pub struct GridDigitizer {
    extractor: WaveformExtractor,
}

impl GridDigitizer {
    /// Creates a digitizer around a configured extractor
    pub fn new(extractor: WaveformExtractor) -> Self {
        Self { extractor }
    }

    /// Reads an image file and digitizes it
    ///
    /// # Errors
    ///
    /// - `InputNotFound` if the path does not exist
    /// - `ImageReadError` if the file cannot be decoded or is too small
    pub fn digitize_path(&self, path: &Path) -> Result<SignalMatrix> {
        let image = load_image(path)?;
        self.digitize(&image)
    }

    /// Digitizes an in-memory image
    ///
    /// # Errors
    ///
    /// Returns `ImageReadError` if the image is empty or smaller than the grid.
    pub fn digitize(&self, image: &RgbImage) -> Result<SignalMatrix> {
        let (width, height) = image.dimensions();
        let layout = GridLayout::for_dimensions(width, height);
        if !layout.is_usable() {
            return Err(EcgError::ImageReadError(format!(
                "image is {}x{}, too small for a {}x{} lead grid",
                width, height, GRID_ROWS, GRID_COLS
            )));
        }

        debug!(
            "Grid cells are {}x{} px; discarding {} bottom rows and {} right columns",
            layout.lead_width, layout.lead_height, layout.discarded_rows, layout.discarded_cols
        );

        // Each canonical lead reads its own grid cell, so no slot is left unfilled
        let leads: Vec<WaveformSignal> = (0..LEAD_COUNT)
            .into_par_iter()
            .map(|lead| {
                let (x, y) = layout.cell_origin(CANONICAL_TO_GRID[lead]);
                let cell = imageops::crop_imm(image, x, y, layout.lead_width, layout.lead_height)
                    .to_image();
                self.extractor.extract(&cell)
            })
            .collect::<Result<_>>()?;

        let leads: [WaveformSignal; LEAD_COUNT] = leads.try_into().map_err(|v: Vec<_>| {
            EcgError::ImageReadError(format!(
                "digitized {} leads, expected {}",
                v.len(),
                LEAD_COUNT
            ))
        })?;
        Ok(SignalMatrix::new(leads))
    }
}

/// Opens and decodes an image file into 8-bit RGB
pub fn load_image(path: &Path) -> Result<RgbImage> {
    if !path.exists() {
        return Err(EcgError::InputNotFound(path.to_path_buf()));
    }

    // The path exists, so any open or decode failure is an unreadable image
    let image = image::ImageReader::open(path)
        .map_err(|e| read_error(path, e))?
        .with_guessed_format()
        .map_err(|e| read_error(path, e))?
        .decode()
        .map_err(|e| read_error(path, e))?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(EcgError::ImageReadError(format!(
            "{}: image is empty",
            path.display()
        )));
    }

    info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

fn read_error(path: &Path, e: impl fmt::Display) -> EcgError {
    EcgError::ImageReadError(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lead, SAMPLES_PER_LEAD};
    use image::Rgb;
    use std::collections::HashSet;
    use tempfile::TempDir;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// Draws a square wave in each cell whose period encodes the scan index
    fn synthetic_grid(cell_width: u32, cell_height: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(cell_width * GRID_COLS, cell_height * GRID_ROWS, WHITE);
        for scan_index in 0..LEAD_COUNT as u32 {
            let x0 = (scan_index % GRID_COLS) * cell_width;
            let y0 = (scan_index / GRID_COLS) * cell_height;
            let half_period = scan_index + 1;
            for dx in 0..cell_width {
                let high = (dx / half_period) % 2 == 0;
                let dy = if high { cell_height / 4 } else { 3 * cell_height / 4 };
                img.put_pixel(x0 + dx, y0 + dy, BLACK);
            }
        }
        img
    }

    #[test]
    fn test_grid_to_canonical_is_bijection() {
        let targets: HashSet<usize> = GRID_TO_CANONICAL.iter().copied().collect();
        assert_eq!(targets.len(), LEAD_COUNT);
        assert!(targets.iter().all(|&t| t < LEAD_COUNT));
    }

    #[test]
    fn test_canonical_to_grid_is_inverse() {
        for (scan_index, &lead) in GRID_TO_CANONICAL.iter().enumerate() {
            assert_eq!(CANONICAL_TO_GRID[lead], scan_index);
        }
    }

    #[test]
    fn test_grid_to_canonical_layout() {
        // Left column: limb leads
        for (row, lead) in [Lead::I, Lead::II, Lead::III, Lead::AVr, Lead::AVl, Lead::AVf]
            .iter()
            .enumerate()
        {
            assert_eq!(GRID_TO_CANONICAL[row * 2], lead.index());
        }
        // Right column: precordial leads
        for (row, lead) in [Lead::V1, Lead::V2, Lead::V3, Lead::V4, Lead::V5, Lead::V6]
            .iter()
            .enumerate()
        {
            assert_eq!(GRID_TO_CANONICAL[row * 2 + 1], lead.index());
        }
    }

    #[test]
    fn test_layout_floor_division() {
        let layout = GridLayout::for_dimensions(1001, 605);
        assert_eq!(layout.lead_width, 500);
        assert_eq!(layout.lead_height, 100);
        assert_eq!(layout.discarded_cols, 1);
        assert_eq!(layout.discarded_rows, 5);
        assert_eq!(layout.cell_origin(0), (0, 0));
        assert_eq!(layout.cell_origin(1), (500, 0));
        assert_eq!(layout.cell_origin(2), (0, 100));
        assert_eq!(layout.cell_origin(11), (500, 500));
    }

    #[test]
    fn test_digitize_produces_twelve_leads() {
        let image = synthetic_grid(200, 40);
        let matrix = GridDigitizer::default().digitize(&image).unwrap();
        for signal in matrix.leads() {
            assert_eq!(signal.len(), SAMPLES_PER_LEAD);
        }
    }

    #[test]
    fn test_digitize_remaps_scan_order() {
        let cell_width = 1000;
        let image = synthetic_grid(cell_width, 40);
        let matrix = GridDigitizer::default().digitize(&image).unwrap();

        // Resampling is the identity at 1000 px, so each lead keeps its exact
        // square wave and can be compared against a direct cell extraction
        let layout = GridLayout::for_dimensions(image.width(), image.height());
        let extractor = WaveformExtractor::default();
        for scan_index in 0..LEAD_COUNT {
            let (x, y) = layout.cell_origin(scan_index);
            let cell = imageops::crop_imm(&image, x, y, layout.lead_width, layout.lead_height)
                .to_image();
            let expected = extractor.extract(&cell).unwrap();
            let lead = Lead::from_index(GRID_TO_CANONICAL[scan_index]).unwrap();
            assert_eq!(matrix.lead(lead), &expected, "lead {} mismatch", lead);
        }
    }

    #[test]
    fn test_leftover_region_is_ignored() {
        let mut image = synthetic_grid(300, 30);
        let clean = GridDigitizer::default().digitize(&image).unwrap();

        // Grow by one column and five rows filled with ink
        let mut padded = RgbImage::from_pixel(image.width() + 1, image.height() + 5, BLACK);
        imageops::replace(&mut padded, &image, 0, 0);
        image = padded;

        let noisy = GridDigitizer::default().digitize(&image).unwrap();
        assert_eq!(clean, noisy);
    }

    #[test]
    fn test_digitize_too_small() {
        let image = RgbImage::from_pixel(1, 5, WHITE);
        let result = GridDigitizer::default().digitize(&image);
        assert!(matches!(result, Err(EcgError::ImageReadError(_))));
    }

    #[test]
    fn test_digitize_path_not_found() {
        let result = GridDigitizer::default().digitize_path(Path::new("/nonexistent/ecg.png"));
        match result {
            Err(e @ EcgError::InputNotFound(_)) => assert!(e.to_string().contains("not found")),
            other => panic!("expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_digitize_path_undecodable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = GridDigitizer::default().digitize_path(&path);
        assert!(matches!(result, Err(EcgError::ImageReadError(_))));
    }

    #[test]
    fn test_digitize_path_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = GridDigitizer::default().digitize_path(temp_dir.path());
        match result {
            Err(e @ EcgError::ImageReadError(_)) => {
                assert!(e.to_string().contains("Could not read image"))
            }
            other => panic!("expected ImageReadError, got {:?}", other),
        }
    }

    #[test]
    fn test_digitize_path_round_trip_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ecg.png");
        let image = synthetic_grid(250, 50);
        image.save(&path).unwrap();

        let from_disk = GridDigitizer::default().digitize_path(&path).unwrap();
        let in_memory = GridDigitizer::default().digitize(&image).unwrap();
        assert_eq!(from_disk, in_memory);
    }
}
