pub mod grid;
pub mod resample;
pub mod waveform;

pub use grid::{load_image, GridDigitizer, GridLayout, CANONICAL_TO_GRID, GRID_TO_CANONICAL};
pub use resample::resample;
pub use waveform::{ExtractorConfig, WaveformExtractor};
