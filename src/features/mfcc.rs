use std::{f32::consts::PI, sync::Arc};

use rustfft::{num_complex::Complex32, Fft, FftPlanner};

/// Mel frequency cepstral coefficients over a whole signal.
///
/// Immutable once built, the fft plan and filter bank are shared between calls.
pub(crate) struct MfccExtractor {
    num_coefficients: usize,
    pre_emphasis_coefficient: f32,
    samples_per_frame: usize,
    samples_per_shift: usize,
    magnitude_spectrum_size: usize,
    filter_bank: Vec<Vec<f32>>,
    hamming_window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl MfccExtractor {
    pub fn new(
        sample_rate: usize,
        samples_per_frame: usize,
        samples_per_shift: usize,
        num_coefficients: usize,
        pre_emphasis_coefficient: f32,
    ) -> MfccExtractor {
        let magnitude_spectrum_size = samples_per_frame / 2;
        MfccExtractor {
            samples_per_shift,
            samples_per_frame,
            pre_emphasis_coefficient,
            num_coefficients,
            magnitude_spectrum_size,
            filter_bank: new_mel_filter_bank(
                sample_rate,
                magnitude_spectrum_size,
                num_coefficients,
                0,
                sample_rate / 2,
            ),
            hamming_window: new_hamming_window(samples_per_frame),
            fft: FftPlanner::new().plan_fft_forward(samples_per_frame),
        }
    }
    /// Values per frame, coefficient 0 is dropped.
    pub fn frame_size(&self) -> usize {
        self.num_coefficients - 1
    }
    /// Computes one coefficient vector per frame.
    /// Signals shorter than a frame are zero padded to one frame.
    pub fn compute(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        let mut samples = self.pre_emphasis(signal);
        if samples.len() < self.samples_per_frame {
            samples.resize(self.samples_per_frame, 0.);
        }
        let num_frames = 1 + (samples.len() - self.samples_per_frame) / self.samples_per_shift;
        (0..num_frames)
            .map(|i| {
                let start = i * self.samples_per_shift;
                self.extract_frame(&samples[start..start + self.samples_per_frame])
            })
            .collect()
    }
    fn extract_frame(&self, samples: &[f32]) -> Vec<f32> {
        let magnitude_spectrum = self.calculate_magnitude_spectrum(samples);
        let mut features = self.calculate_mel_frequency_cepstral_coefficients(&magnitude_spectrum);
        features.drain(0..1);
        features
    }
    fn pre_emphasis(&self, signal: &[f32]) -> Vec<f32> {
        let mut previous = 0.;
        signal
            .iter()
            .map(|current| {
                let emphasized = current - self.pre_emphasis_coefficient * previous;
                previous = *current;
                emphasized
            })
            .collect()
    }
    fn calculate_magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer = frame
            .iter()
            .zip(self.hamming_window.iter())
            .map(|(sample, weight)| Complex32 {
                re: sample * weight,
                im: 0.,
            })
            .collect::<Vec<_>>();
        self.fft.process(&mut buffer);
        buffer[0..self.magnitude_spectrum_size]
            .iter()
            .map(|bin| bin.norm())
            .collect()
    }
    fn calculate_mel_frequency_cepstral_coefficients(
        &self,
        magnitude_spectrum: &[f32],
    ) -> Vec<f32> {
        let log_mel_spectrum: Vec<f32> = self
            .filter_bank
            .iter()
            .map(|filter| {
                magnitude_spectrum
                    .iter()
                    .zip(filter.iter())
                    .map(|(ms, weight)| ms * ms * weight)
                    .sum::<f32>()
            })
            .map(|energy| (energy + f32::MIN_POSITIVE).ln())
            .collect();
        discrete_cosine_transform(&log_mel_spectrum)
    }
}

fn discrete_cosine_transform(signal: &[f32]) -> Vec<f32> {
    let num_samples = signal.len();
    let pi_over_n = PI / num_samples as f32;
    (0..num_samples)
        .map(|k| {
            2. * signal
                .iter()
                .enumerate()
                .map(|(n, value)| value * (pi_over_n * (n as f32 + 0.5) * k as f32).cos())
                .sum::<f32>()
        })
        .collect()
}

fn new_hamming_window(samples_per_frame: usize) -> Vec<f32> {
    let ns_minus_1 = samples_per_frame - 1;
    (0..samples_per_frame)
        .map(|s| 0.54 - (0.46 * (2. * PI * (s as f32 / ns_minus_1 as f32)).cos()))
        .collect()
}

fn frequency_to_mel(frequency: usize) -> f32 {
    1127. * (1. + (frequency as f32 / 700.0)).ln()
}

fn new_mel_filter_bank(
    sample_rate: usize,
    magnitude_spectrum_size: usize,
    num_filters: usize,
    min_frequency: usize,
    max_frequency: usize,
) -> Vec<Vec<f32>> {
    let max_mel = frequency_to_mel(max_frequency).floor();
    let min_mel = frequency_to_mel(min_frequency).floor();
    let mut filter_bank = vec![vec![0.; magnitude_spectrum_size]; num_filters];
    let centre_indices: Vec<usize> = (0..num_filters + 2)
        .map(|i| {
            let mel = i as f32 * (max_mel - min_mel) / (num_filters + 1) as f32 + min_mel;
            let frequency = 700. * ((mel / 1127.).exp() - 1.);
            let bin = (0.5 + magnitude_spectrum_size as f32 * frequency / (sample_rate as f32 / 2.))
                .floor() as usize;
            bin.min(magnitude_spectrum_size)
        })
        .collect();
    for (i, filter) in filter_bank.iter_mut().enumerate() {
        let begin = centre_indices[i];
        let centre = centre_indices[i + 1];
        let end = centre_indices[i + 2];
        // upward slope
        for (k, weight) in filter.iter_mut().enumerate().take(centre).skip(begin) {
            *weight = (k - begin) as f32 / (centre - begin) as f32;
        }
        // downwards slope
        for (k, weight) in filter.iter_mut().enumerate().take(end).skip(centre) {
            *weight = (end - k) as f32 / (end - centre) as f32;
        }
    }
    filter_bank
}
