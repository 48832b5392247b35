mod audio_buffer;
mod container;
mod decoder;
#[cfg(feature = "resample")]
mod resampler;
pub use audio_buffer::AudioBuffer;
pub use container::Container;
pub use decoder::AudioDecoder;
