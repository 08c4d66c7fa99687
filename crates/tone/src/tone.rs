// Sine tone generator used as the render callback

use halout_core::AudioBufferList;
use halout_renderer_api::RenderInfo;
use std::f64::consts::PI;

pub const DEFAULT_FREQUENCY: f64 = 440.0;
/// Fixed amplitude is good enough for a test tone
pub const DEFAULT_AMPLITUDE: f64 = 0.25;

pub struct Tone {
    frequency: f64,
    sample_rate: f64,
    amplitude: f64,
    theta: f64,
}

impl Tone {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            frequency,
            sample_rate: sample_rate as f64,
            amplitude: DEFAULT_AMPLITUDE,
            theta: 0.0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Current phase in radians.
    ///
    /// Each frame wraps by a single 2π, so the phase only stays within
    /// 0..=2π while `frequency <= sample_rate`.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Write one cycle of the tone, same sample on every channel
    pub fn render(&mut self, info: &RenderInfo, list: &mut AudioBufferList) -> usize {
        let increment = 2.0 * PI * self.frequency / self.sample_rate;
        let frames = info.frames.min(list.frames());

        for frame in 0..frames {
            let value = (self.theta.sin() * self.amplitude) as f32;
            for channel in 0..list.channels() {
                list.write_sample(frame, channel, value);
            }

            self.theta += increment;
            if self.theta > 2.0 * PI {
                self.theta -= 2.0 * PI;
            }
        }

        log::trace!("theta {:.6}", self.theta);
        frames
    }
}
