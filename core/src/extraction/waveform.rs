use crate::error::{EcgError, Result};
use crate::types::{WaveformSignal, SAMPLES_PER_LEAD};
use image::{GenericImageView, Rgb};
use log::trace;

use super::resample::resample;

/// Intensity at or below which a pixel counts as trace ink
pub const FOREGROUND_THRESHOLD: u8 = 120;

/// Added to the peak before scaling so a flat trace divides cleanly
pub const AMPLITUDE_EPSILON: f64 = 1e-8;

/// Peak absolute amplitude of a normalized trace
pub const PEAK_AMPLITUDE: f64 = 1.5;

/// Calibration parameters for trace extraction
///
/// The defaults are hand-tuned for rendered 6x2 ECG printouts and may need
/// re-tuning for other scanners or paper colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// Pixels with intensity `<=` this value are foreground
    pub foreground_threshold: u8,

    /// Epsilon added to the peak before amplitude scaling
    pub amplitude_epsilon: f64,

    /// Target peak absolute amplitude
    pub peak_amplitude: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            foreground_threshold: FOREGROUND_THRESHOLD,
            amplitude_epsilon: AMPLITUDE_EPSILON,
            peak_amplitude: PEAK_AMPLITUDE,
        }
    }
}

/// Recovers a 1-D lead trace from a single grid cell
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformExtractor {
    config: ExtractorConfig,
}

impl WaveformExtractor {
    /// Creates an extractor with custom calibration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts a normalized [`SAMPLES_PER_LEAD`]-sample trace from a cell
    ///
    /// # Algorithm
    ///
    /// 1. Threshold the grayscale cell; dark pixels are trace ink
    /// 2. Per column, take the mean row of the ink pixels
    /// 3. Columns without ink repeat the previous column's value
    ///    (the vertical midpoint before any ink has been seen)
    /// 4. Flip vertically so larger values mean higher voltage
    /// 5. Center on zero and scale to the configured peak amplitude
    /// 6. Fourier-resample to [`SAMPLES_PER_LEAD`] samples
    ///
    /// # Errors
    ///
    /// Returns `ImageReadError` for a cell with zero width or height.
    pub fn extract<I>(&self, cell: &I) -> Result<WaveformSignal>
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        let (width, height) = cell.dimensions();
        if width == 0 || height == 0 {
            return Err(EcgError::ImageReadError(format!(
                "lead cell is empty ({}x{})",
                width, height
            )));
        }

        let mut trace = self.column_trace(cell);
        let h = height as f64;
        for value in trace.iter_mut() {
            *value = h - *value;
        }
        normalize_amplitude(
            &mut trace,
            self.config.peak_amplitude,
            self.config.amplitude_epsilon,
        );

        let samples = resample(&trace, SAMPLES_PER_LEAD)
            .into_iter()
            .map(|v| v as f32)
            .collect();
        WaveformSignal::new(samples)
    }

    /// Mean ink row per column, forward-filled across columns without ink
    fn column_trace<I>(&self, cell: &I) -> Vec<f64>
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        let (width, height) = cell.dimensions();
        let mut trace = Vec::with_capacity(width as usize);
        let mut last_value = height as f64 / 2.0;
        let mut empty_columns = 0usize;

        for x in 0..width {
            let mut row_sum = 0u64;
            let mut row_count = 0u64;
            for y in 0..height {
                if is_foreground(cell.get_pixel(x, y), self.config.foreground_threshold) {
                    row_sum += y as u64;
                    row_count += 1;
                }
            }

            if row_count > 0 {
                last_value = row_sum as f64 / row_count as f64;
            } else {
                empty_columns += 1;
            }
            trace.push(last_value);
        }

        trace!(
            "Extracted {} columns ({} without trace ink)",
            width,
            empty_columns
        );
        trace
    }
}

/// Grayscale intensity with BT.601 weights in 14-bit fixed point
pub fn luma(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let y = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
    y.min(255) as u8
}

fn is_foreground(pixel: Rgb<u8>, threshold: u8) -> bool {
    luma(pixel) <= threshold
}

/// Centers `values` on zero and scales them so the peak magnitude is `peak`
///
/// A constant input becomes all zeros.
pub fn normalize_amplitude(values: &mut [f64], peak: f64, epsilon: f64) {
    if values.is_empty() {
        return;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    for v in values.iter_mut() {
        *v -= mean;
    }

    let max_abs = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let scale = peak / (max_abs + epsilon);
    for v in values.iter_mut() {
        *v *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rstest::rstest;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// A white cell with one black pixel per column at `row_of(x)`
    fn trace_cell(width: u32, height: u32, row_of: impl Fn(u32) -> u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, WHITE);
        for x in 0..width {
            img.put_pixel(x, row_of(x).min(height - 1), BLACK);
        }
        img
    }

    #[test]
    fn test_luma_bt601() {
        assert_eq!(luma(WHITE), 255);
        assert_eq!(luma(BLACK), 0);
        assert_eq!(luma(Rgb([255, 0, 0])), 76);
        assert_eq!(luma(Rgb([0, 255, 0])), 150);
        assert_eq!(luma(Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_foreground(Rgb([120, 120, 120]), FOREGROUND_THRESHOLD));
        assert!(!is_foreground(Rgb([121, 121, 121]), FOREGROUND_THRESHOLD));
    }

    #[test]
    fn test_normalize_amplitude_peak() {
        let mut values = vec![1.0, 3.0, 2.0, 10.0, 4.0];
        normalize_amplitude(&mut values, 1.5, 1e-8);

        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        let peak = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert!(mean.abs() < 1e-12);
        assert!((peak - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_amplitude_flat() {
        let mut values = vec![7.0; 20];
        normalize_amplitude(&mut values, 1.5, 1e-8);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_column_trace_forward_fill() {
        // Ink only in columns 2 and 5
        let mut img = RgbImage::from_pixel(8, 10, WHITE);
        img.put_pixel(2, 3, BLACK);
        img.put_pixel(2, 5, BLACK);
        img.put_pixel(5, 8, BLACK);

        let trace = WaveformExtractor::default().column_trace(&img);
        assert_eq!(trace, vec![5.0, 5.0, 4.0, 4.0, 4.0, 8.0, 8.0, 8.0]);
    }

    #[rstest]
    #[case(50)]
    #[case(500)]
    #[case(5000)]
    fn test_output_length_independent_of_width(#[case] width: u32) {
        let cell = trace_cell(width, 40, |x| 10 + (x % 20));
        let signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert_eq!(signal.len(), SAMPLES_PER_LEAD);
    }

    #[test]
    fn test_peak_amplitude_without_resampling() {
        let cell = trace_cell(SAMPLES_PER_LEAD as u32, 60, |x| 20 + (x * 7) % 31);
        let signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert!((signal.peak_amplitude() - 1.5).abs() < 1e-5);
    }

    /// Three periods of a sine wave spanning most of a 400 px tall cell
    fn sine_cell(width: u32) -> RgbImage {
        trace_cell(width, 400, |x| {
            let phase = 2.0 * std::f64::consts::PI * 3.0 * x as f64 / width as f64;
            (200.0 - 150.0 * phase.sin()).round() as u32
        })
    }

    // Resampling moves the peak between samples, and row quantization adds a
    // little high-frequency noise; 5% covers both at these widths
    const RESAMPLED_PEAK_TOLERANCE: f32 = 0.075;

    #[rstest]
    #[case(50)]
    #[case(500)]
    #[case(5000)]
    fn test_resampled_trace_is_centered_near_peak(#[case] width: u32) {
        let signal = WaveformExtractor::default()
            .extract(&sine_cell(width))
            .unwrap();

        let mean = signal.samples().iter().map(|&v| v as f64).sum::<f64>() / signal.len() as f64;
        assert!(mean.abs() < 1e-4, "mean {} at width {}", mean, width);

        let peak = signal.peak_amplitude();
        assert!(
            (peak - 1.5).abs() < RESAMPLED_PEAK_TOLERANCE,
            "peak {} at width {}",
            peak,
            width
        );
    }

    #[test]
    fn test_blank_cell_is_flat() {
        let cell = RgbImage::from_pixel(300, 50, WHITE);
        let signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert_eq!(signal.len(), SAMPLES_PER_LEAD);
        assert!(signal.samples().iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_straight_line_is_flat() {
        let cell = trace_cell(640, 50, |_| 25);
        let signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert!(signal.samples().iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_higher_ink_means_higher_voltage() {
        // Step from row 40 (low) to row 10 (high) half way across
        let cell = trace_cell(SAMPLES_PER_LEAD as u32, 50, |x| if x < 500 { 40 } else { 10 });
        let signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert!(signal.samples()[100] < 0.0);
        assert!(signal.samples()[900] > 0.0);
    }

    #[test]
    fn test_empty_cell_is_error() {
        let cell = RgbImage::new(0, 10);
        assert!(WaveformExtractor::default().extract(&cell).is_err());
    }

    #[test]
    fn test_custom_threshold() {
        let mut cell = RgbImage::from_pixel(SAMPLES_PER_LEAD as u32, 20, WHITE);
        for x in 0..SAMPLES_PER_LEAD as u32 {
            // Gray ink (150) is background at the default threshold
            cell.put_pixel(x, if x % 2 == 0 { 5 } else { 15 }, Rgb([150, 150, 150]));
        }

        let default_signal = WaveformExtractor::default().extract(&cell).unwrap();
        assert!(default_signal.samples().iter().all(|v| v.abs() < 1e-6));

        let config = ExtractorConfig {
            foreground_threshold: 160,
            ..ExtractorConfig::default()
        };
        let tuned_signal = WaveformExtractor::new(config).extract(&cell).unwrap();
        assert!((tuned_signal.peak_amplitude() - 1.5).abs() < 1e-5);
    }
}
