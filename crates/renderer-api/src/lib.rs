// Audio renderer abstraction layer

use halout_core::{AudioBufferList, AudioError, OutputListener, OutputState, Result, SampleFormat, StreamDescription, VolumeCurve};
use std::sync::Arc;

/// Timing for one render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderInfo {
    /// Frames requested this cycle
    pub frames: usize,
    /// Frames rendered since the stream was opened
    pub sample_time: u64,
    /// Output bus; always 0 for the default output
    pub bus: u32,
}

/// Pull callback that fills the buffer list for one cycle.
///
/// Returns the number of frames actually produced. The renderer plays
/// silence for the rest.
pub type RenderCallback = Box<dyn FnMut(&RenderInfo, &mut AudioBufferList) -> usize + Send + 'static>;

/// Device buffer size request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferSize {
    #[default]
    Default,
    /// Frames per callback
    Fixed(u32),
}

/// Stream configuration for [`AudioRenderer::open`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputConfig {
    pub format: SampleFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_size: BufferSize,
    pub volume_curve: VolumeCurve,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: SampleFormat::Float,
            sample_rate: 44100,
            channels: 2,
            buffer_size: BufferSize::Default,
            volume_curve: VolumeCurve::default(),
        }
    }
}

impl OutputConfig {
    pub fn new(format: SampleFormat, sample_rate: u32, channels: u16) -> Self {
        Self {
            format,
            sample_rate,
            channels,
            ..Self::default()
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: BufferSize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_volume_curve(mut self, volume_curve: VolumeCurve) -> Self {
        self.volume_curve = volume_curve;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(AudioError::StreamFormatError("Sample rate must be non-zero".to_string()));
        }
        if self.channels == 0 {
            return Err(AudioError::StreamFormatError("Channel count must be non-zero".to_string()));
        }
        if self.buffer_size == BufferSize::Fixed(0) {
            return Err(AudioError::StreamFormatError("Buffer size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Audio renderer trait
/// Platform implementations acquire the default output in their constructor
pub trait AudioRenderer {
    /// Set up a stream for playback and start pulling from `callback`
    fn open(&mut self, config: OutputConfig, callback: RenderCallback) -> Result<()>;

    /// Stop the stream and detach the callback
    fn close(&mut self) -> Result<()>;

    /// Stop (`true`) or restart (`false`) the stream
    fn pause(&mut self, paused: bool) -> Result<()>;

    /// Set the output volume, 0..=100
    fn set_volume(&mut self, value: u8) -> Result<()>;

    /// Current volume value
    fn volume(&self) -> u8;

    fn state(&self) -> OutputState;

    /// Description of the open stream, if any
    fn stream_description(&self) -> Option<StreamDescription>;

    fn set_listener(&mut self, listener: Option<Arc<dyn OutputListener>>);

    /// Shut down the output unit
    fn release(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutputConfig::default();
        assert_eq!(config.format, SampleFormat::Float);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channels, 2);
        assert_eq!(config.buffer_size, BufferSize::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = OutputConfig::new(SampleFormat::S16Be, 48000, 1)
            .with_buffer_size(BufferSize::Fixed(512))
            .with_volume_curve(VolumeCurve::Linear);
        assert_eq!(config.format, SampleFormat::S16Be);
        assert_eq!(config.buffer_size, BufferSize::Fixed(512));
        assert_eq!(config.volume_curve, VolumeCurve::Linear);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(OutputConfig::new(SampleFormat::Float, 0, 2).validate().is_err());
        assert!(OutputConfig::new(SampleFormat::Float, 44100, 0).validate().is_err());
        assert!(OutputConfig::default()
            .with_buffer_size(BufferSize::Fixed(0))
            .validate()
            .is_err());
    }
}
