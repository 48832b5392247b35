use rubato::{FftFixedInOut, Resampler};

use crate::DetectionError;

const RESAMPLER_CHUNK_SIZE: usize = 1024;

/// Converts interleaved samples to another sample rate.
pub(crate) fn resample(
    samples: &[f32],
    channels: u16,
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, DetectionError> {
    let unsupported = || DetectionError::UnsupportedSampleRate {
        found: source_rate,
        expected: target_rate,
    };
    let channels = channels as usize;
    let mut resampler = FftFixedInOut::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        RESAMPLER_CHUNK_SIZE,
        channels,
    )
    .map_err(|_| unsupported())?;
    let frames = samples.len() / channels;
    if frames == 0 {
        return Ok(Vec::new());
    }
    let out_frames = ((frames as u64 * target_rate as u64 + source_rate as u64 - 1)
        / source_rate as u64) as usize;
    // output starts with `delay` frames of filter latency
    let delay = resampler.output_delay();
    let chunk_frames = resampler.input_frames_next();
    let chunk_len = chunk_frames * channels;
    let mut planar_out: Vec<Vec<f32>> = vec![Vec::with_capacity(delay + out_frames); channels];
    let mut offset = 0;
    while planar_out[0].len() < delay + out_frames {
        // input past the end of the clip is zero padded until the delayed tail is flushed
        let mut planar_in = vec![vec![0.; chunk_frames]; channels];
        let end = (offset + chunk_len).min(samples.len());
        if offset < end {
            for (frame_index, frame) in samples[offset..end].chunks_exact(channels).enumerate() {
                for (channel, sample) in frame.iter().enumerate() {
                    planar_in[channel][frame_index] = *sample;
                }
            }
        }
        offset += chunk_len;
        let waves_out = resampler
            .process(&planar_in, None)
            .map_err(|_| unsupported())?;
        for (channel, wave) in waves_out.into_iter().enumerate() {
            planar_out[channel].extend(wave);
        }
    }
    let planar_out = &planar_out;
    Ok((delay..delay + out_frames)
        .flat_map(move |frame| planar_out.iter().map(move |wave| wave[frame]))
        .map(|sample| sample.clamp(-1., 1.))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_doubles_the_frame_count_when_upsampling_by_two() {
        let samples = vec![0.25; 8000];
        let resampled = resample(&samples, 1, 8000, 16000).unwrap();
        assert_eq!(resampled.len(), 16000);
    }

    #[test]
    fn it_keeps_channels_interleaved() {
        let samples = vec![0.; 4410 * 2];
        let resampled = resample(&samples, 2, 44100, 16000).unwrap();
        assert_eq!(resampled.len() % 2, 0);
        assert_eq!(resampled.len(), 1600 * 2);
    }

    #[test]
    fn it_keeps_the_clip_aligned_after_resampling() {
        // a burst covering the last 200 input frames
        let mut samples = vec![0.; 8000];
        samples[7800..].iter_mut().for_each(|sample| *sample = 0.5);
        let resampled = resample(&samples, 1, 8000, 16000).unwrap();
        assert_eq!(resampled.len(), 16000);
        let mean = |range: std::ops::Range<usize>| {
            resampled[range.clone()].iter().sum::<f32>() / range.len() as f32
        };
        assert!(mean(0..15000).abs() < 0.01);
        let tail = mean(15650..15950);
        assert!((tail - 0.5).abs() < 0.05, "tail mean {}", tail);
    }

    #[test]
    fn it_returns_nothing_for_empty_input() {
        assert!(resample(&[], 1, 8000, 16000).unwrap().is_empty());
    }
}
