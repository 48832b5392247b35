use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::{audio::AudioBuffer, audio::Container, DetectionError};

/// Decodes uploaded audio files into normalized pcm buffers.
pub struct AudioDecoder {
    target_sample_rate: u32,
}

impl AudioDecoder {
    /// Creates a decoder producing buffers at the provided sample rate.
    pub fn new(target_sample_rate: u32) -> Self {
        AudioDecoder { target_sample_rate }
    }
    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }
    /// Decodes the byte buffer, the file name is only used as a container hint.
    pub fn decode(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
    ) -> Result<AudioBuffer, DetectionError> {
        let hint = filename.and_then(Container::from_filename);
        let container = match Container::sniff(bytes) {
            Some(container) => container,
            None => {
                let reason = match hint {
                    Some(hint) => {
                        format!("unrecognized header, file name suggests {}", hint.as_str())
                    }
                    None => "unrecognized header".to_string(),
                };
                return Err(DetectionError::UnsupportedFormat(reason));
            }
        };
        if !container.is_supported() {
            return Err(DetectionError::UnsupportedFormat(format!(
                "{} audio is not supported",
                container.as_str()
            )));
        }
        if hint.is_some_and(|hint| hint != container) {
            debug!(
                "file name suggests {:?} but the header is {}",
                hint,
                container.as_str()
            );
        }
        let buffer = decode_wav(bytes)?;
        self.conform_sample_rate(buffer)
    }

    #[cfg(feature = "resample")]
    fn conform_sample_rate(&self, buffer: AudioBuffer) -> Result<AudioBuffer, DetectionError> {
        if buffer.sample_rate() == self.target_sample_rate {
            return Ok(buffer);
        }
        debug!(
            "resampling from {}hz to {}hz",
            buffer.sample_rate(),
            self.target_sample_rate
        );
        let samples = crate::audio::resampler::resample(
            buffer.samples(),
            buffer.channels(),
            buffer.sample_rate(),
            self.target_sample_rate,
        )?;
        AudioBuffer::new(samples, self.target_sample_rate, buffer.channels())
    }

    #[cfg(not(feature = "resample"))]
    fn conform_sample_rate(&self, buffer: AudioBuffer) -> Result<AudioBuffer, DetectionError> {
        if buffer.sample_rate() == self.target_sample_rate {
            Ok(buffer)
        } else {
            Err(DetectionError::UnsupportedSampleRate {
                found: buffer.sample_rate(),
                expected: self.target_sample_rate,
            })
        }
    }
}

fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, DetectionError> {
    let wav_reader = WavReader::new(Cursor::new(bytes)).map_err(wav_error)?;
    let spec = wav_reader.spec();
    if spec.sample_rate == 0 {
        return Err(DetectionError::CorruptInput(
            "wav declares a zero sample rate".to_string(),
        ));
    }
    debug!(
        "decoding wav: {}hz, {} channels, {} bits {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );
    let samples = match spec.sample_format {
        SampleFormat::Int => {
            let scale = int_sample_scale(spec.bits_per_sample)?;
            wav_reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()
                .map_err(wav_error)?
        }
        SampleFormat::Float => {
            let samples = wav_reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .map_err(wav_error)?;
            if samples.iter().any(|sample| !sample.is_finite()) {
                return Err(DetectionError::CorruptInput(
                    "wav contains non finite samples".to_string(),
                ));
            }
            samples
        }
    };
    AudioBuffer::new(samples, spec.sample_rate, spec.channels)
}

/// Codecs hound can not read are unsupported, anything else means a damaged payload.
fn wav_error(err: hound::Error) -> DetectionError {
    match err {
        hound::Error::Unsupported => DetectionError::UnsupportedFormat(format!("wav {}", err)),
        _ => DetectionError::CorruptInput(err.to_string()),
    }
}

fn int_sample_scale(bits_per_sample: u16) -> Result<f32, DetectionError> {
    match bits_per_sample {
        8 | 16 | 24 | 32 => Ok((1_u64 << (bits_per_sample - 1)) as f32),
        _ => Err(DetectionError::UnsupportedFormat(format!(
            "unsupported bit depth {}",
            bits_per_sample
        ))),
    }
}
