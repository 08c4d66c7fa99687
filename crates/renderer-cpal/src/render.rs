// Device-independent render cycle

use halout_core::{to_interleaved_f32, AudioBufferList, AudioError, Result, SampleFormat, VolumeControl};
use halout_renderer_api::{RenderCallback, RenderInfo};
use std::sync::Arc;

/// Drives the user callback for each device cycle and converts its output
/// to the device's interleaved f32 layout.
pub struct RenderEngine {
    callback: RenderCallback,
    buffers: AudioBufferList,
    volume: Arc<VolumeControl>,
    sample_time: u64,
}

impl RenderEngine {
    pub fn new(
        format: SampleFormat,
        channels: u16,
        volume: Arc<VolumeControl>,
        callback: RenderCallback,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(AudioError::StreamFormatError("Channel count must be non-zero".to_string()));
        }
        let buffers = AudioBufferList::new(format, channels).ok_or_else(|| {
            AudioError::UnsupportedFormat(format!(
                "The requested audio format {} is unsupported.",
                format.code()
            ))
        })?;

        Ok(Self {
            callback,
            buffers,
            volume,
            sample_time: 0,
        })
    }

    /// Fill `data` for one cycle and return the frames the callback produced
    pub fn render(&mut self, data: &mut [f32]) -> usize {
        let channels = self.buffers.channels() as usize;
        let frames = data.len() / channels;

        self.buffers.prepare(frames);
        let info = RenderInfo {
            frames,
            sample_time: self.sample_time,
            bus: 0,
        };
        let produced = (self.callback)(&info, &mut self.buffers).min(frames);

        // Zero-fills everything past `produced`
        to_interleaved_f32(&self.buffers, produced, data);

        let factor = self.volume.factor();
        if (factor - 1.0).abs() > 0.001 {
            for sample in data[..produced * channels].iter_mut() {
                *sample *= factor;
            }
        }

        self.sample_time += frames as u64;
        produced
    }

    /// Frames rendered since the engine was created
    pub fn sample_time(&self) -> u64 {
        self.sample_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halout_core::VolumeCurve;
    use parking_lot::Mutex;

    fn constant(value: f32) -> RenderCallback {
        Box::new(move |info: &RenderInfo, list: &mut AudioBufferList| {
            for frame in 0..info.frames {
                for channel in 0..list.channels() {
                    list.write_sample(frame, channel, value);
                }
            }
            info.frames
        })
    }

    #[test]
    fn test_renders_full_cycle() {
        let volume = Arc::new(VolumeControl::new());
        let mut engine = RenderEngine::new(SampleFormat::Float, 2, volume, constant(0.5)).unwrap();

        let mut data = [0.0f32; 8];
        assert_eq!(engine.render(&mut data), 4);
        assert_eq!(data, [0.5; 8]);
        assert_eq!(engine.sample_time(), 4);
    }

    #[test]
    fn test_short_callback_is_padded_with_silence() {
        let volume = Arc::new(VolumeControl::new());
        let callback: RenderCallback = Box::new(|_: &RenderInfo, list: &mut AudioBufferList| {
            list.write_sample(0, 0, 0.25);
            // claims more than requested; clamped below
            if list.frames() > 4 {
                100
            } else {
                1
            }
        });
        let mut engine = RenderEngine::new(SampleFormat::Float, 1, volume, callback).unwrap();

        let mut data = [1.0f32; 4];
        assert_eq!(engine.render(&mut data), 1);
        assert_eq!(data, [0.25, 0.0, 0.0, 0.0]);

        let mut data = [1.0f32; 8];
        assert_eq!(engine.render(&mut data), 8);
        assert_eq!(data[0], 0.25);
        assert!(data[1..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_integer_formats_convert() {
        let volume = Arc::new(VolumeControl::new());
        let mut engine = RenderEngine::new(SampleFormat::S16Be, 2, volume, constant(-0.5)).unwrap();

        let mut data = [0.0f32; 4];
        engine.render(&mut data);
        for sample in data {
            assert!((sample + 0.5).abs() < 1e-3);
        }
    }

    #[test]
    fn test_volume_applied() {
        let volume = Arc::new(VolumeControl::new());
        volume.set(50, VolumeCurve::default());
        let mut engine = RenderEngine::new(SampleFormat::Float, 1, volume.clone(), constant(1.0)).unwrap();

        let mut data = [0.0f32; 2];
        engine.render(&mut data);
        for sample in data {
            assert!((sample - 0.1).abs() < 1e-6);
        }

        volume.set(0, VolumeCurve::default());
        engine.render(&mut data);
        assert_eq!(data, [0.0, 0.0]);
    }

    #[test]
    fn test_render_info_tracks_time() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let callback: RenderCallback = Box::new(move |info: &RenderInfo, _: &mut AudioBufferList| {
            seen_clone.lock().push(*info);
            info.frames
        });
        let mut engine = RenderEngine::new(SampleFormat::S32Le, 2, Arc::new(VolumeControl::new()), callback).unwrap();

        engine.render(&mut [0.0f32; 6]);
        engine.render(&mut [0.0f32; 10]);

        let seen = seen.lock();
        assert_eq!(seen[0], RenderInfo { frames: 3, sample_time: 0, bus: 0 });
        assert_eq!(seen[1], RenderInfo { frames: 5, sample_time: 3, bus: 0 });
    }

    #[test]
    fn test_callback_can_copy_raw_bytes() {
        // Interleaved S16Le stereo frames: (+half, -half)
        let frame = [0x00u8, 0x40, 0x00, 0xc0];
        let callback: RenderCallback = Box::new(move |info: &RenderInfo, list: &mut AudioBufferList| {
            let data = list.buffers_mut()[0].data_mut();
            for chunk in data.chunks_mut(frame.len()) {
                chunk.copy_from_slice(&frame);
            }
            info.frames
        });
        let mut engine = RenderEngine::new(SampleFormat::S16Le, 2, Arc::new(VolumeControl::new()), callback).unwrap();

        let mut data = [0.0f32; 6];
        assert_eq!(engine.render(&mut data), 3);
        assert_eq!(data, [0.5, -0.5, 0.5, -0.5, 0.5, -0.5]);
    }
}
