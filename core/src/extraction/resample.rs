use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Resamples a real sequence to `num` samples in the Fourier domain
///
/// The signal is treated as one period of a band-limited waveform: the
/// non-negative frequency bins shared by both lengths are kept, the spectrum
/// is zero-padded or truncated to `num` bins, and the inverse transform is
/// rescaled by `1 / input.len()` so amplitudes are preserved.
///
/// # Algorithm
///
/// 1. Forward FFT of the `n` input samples
/// 2. Copy bins `0..=min(n, num) / 2`
/// 3. If that shared length is even, the bin at its half is doubled when
///    downsampling and halved when upsampling (Nyquist split/join)
/// 4. Mirror into a Hermitian spectrum of length `num`
/// 5. Inverse FFT, take the real part, divide by `n`
///
/// An empty input yields `num` zeros.
pub fn resample(input: &[f64], num: usize) -> Vec<f64> {
    let n = input.len();
    if num == 0 {
        return Vec::new();
    }
    if n == 0 {
        return vec![0.0; num];
    }
    if n == num {
        return input.to_vec();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut spectrum);

    // Non-negative half of the output spectrum (indices 0..=num/2)
    let mut half = vec![Complex::new(0.0, 0.0); num / 2 + 1];
    let shared = n.min(num);
    let nyquist = shared / 2 + 1;
    half[..nyquist].copy_from_slice(&spectrum[..nyquist]);

    if shared % 2 == 0 {
        if num < n {
            half[shared / 2] *= 2.0;
        } else {
            half[shared / 2] *= 0.5;
        }
    }

    let mut output = vec![Complex::new(0.0, 0.0); num];
    output[0] = Complex::new(half[0].re, 0.0);
    for k in 1..half.len() {
        let mirror = num - k;
        if mirror == k {
            // Output Nyquist bin of an even-length real signal is real
            output[k] = Complex::new(half[k].re, 0.0);
        } else {
            output[k] = half[k];
            output[mirror] = half[k].conj();
        }
    }

    planner.plan_fft_inverse(num).process(&mut output);

    let scale = 1.0 / n as f64;
    output.iter().map(|c| c.re * scale).collect()
}
