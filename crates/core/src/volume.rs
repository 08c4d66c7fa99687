// Output gain on a logarithmic scale

use std::sync::atomic::{AtomicU32, Ordering};

/// Span of the decibel taper, in dB. Value 1 sits just above -40 dB.
pub const VOLUME_RANGE_DB: f32 = 40.0;

/// Maximum user-facing volume value
pub const MAX_VOLUME: u8 = 100;

/// Gain factor for `value` in 0..=100 on the default decibel curve.
///
/// 0 is silence, 100 is unity gain. Values above 100 are treated as 100.
pub fn volume_factor(value: u8) -> f32 {
    VolumeCurve::default().factor(value)
}

/// How a 0..=100 volume value maps to a gain factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeCurve {
    /// Tapers like a stereo amplifier: `10^(range_db * (value - 100) / 100 / 20)`
    Decibel { range_db: f32 },
    /// `value / 100`
    Linear,
}

impl Default for VolumeCurve {
    fn default() -> Self {
        VolumeCurve::Decibel {
            range_db: VOLUME_RANGE_DB,
        }
    }
}

impl VolumeCurve {
    pub fn factor(&self, value: u8) -> f32 {
        let value = value.min(MAX_VOLUME);
        if value == 0 {
            return 0.0;
        }

        match *self {
            VolumeCurve::Decibel { range_db } => {
                let db = range_db * (value as f32 - 100.0) / 100.0;
                10f32.powf(db / 20.0)
            }
            VolumeCurve::Linear => value as f32 / 100.0,
        }
    }
}

/// Gain shared between the control thread and the render thread
#[derive(Debug)]
pub struct VolumeControl {
    factor: AtomicU32,
    value: AtomicU32,
}

impl VolumeControl {
    pub fn new() -> Self {
        Self {
            factor: AtomicU32::new(1.0f32.to_bits()),
            value: AtomicU32::new(MAX_VOLUME as u32),
        }
    }

    /// Store the factor for `value` and return it
    pub fn set(&self, value: u8, curve: VolumeCurve) -> f32 {
        let value = value.min(MAX_VOLUME);
        let factor = curve.factor(value);
        self.factor.store(factor.to_bits(), Ordering::Relaxed);
        self.value.store(value as u32, Ordering::Relaxed);
        factor
    }

    pub fn factor(&self) -> f32 {
        f32::from_bits(self.factor.load(Ordering::Relaxed))
    }

    /// Last value passed to [`VolumeControl::set`]
    pub fn value(&self) -> u8 {
        self.value.load(Ordering::Relaxed) as u8
    }
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_decibel_curve() {
        assert_eq!(volume_factor(0), 0.0);
        assert!(close(volume_factor(100), 1.0));
        assert!(close(volume_factor(50), 0.1));
        // -39.6 dB
        assert!(close(volume_factor(1), 10f32.powf(-1.98)));
    }

    #[test]
    fn test_decibel_curve_is_monotonic() {
        let mut last = 0.0;
        for value in 1..=100 {
            let factor = volume_factor(value);
            assert!(factor > last, "value {}", value);
            last = factor;
        }
    }

    #[test]
    fn test_values_above_range_clamp() {
        assert!(close(volume_factor(200), 1.0));
        assert!(close(VolumeCurve::Linear.factor(150), 1.0));
    }

    #[test]
    fn test_linear_curve() {
        assert_eq!(VolumeCurve::Linear.factor(0), 0.0);
        assert!(close(VolumeCurve::Linear.factor(25), 0.25));
    }

    #[test]
    fn test_custom_range() {
        let curve = VolumeCurve::Decibel { range_db: 60.0 };
        assert!(close(curve.factor(50), 10f32.powf(-1.5)));
    }

    #[test]
    fn test_control() {
        let control = VolumeControl::new();
        assert_eq!(control.factor(), 1.0);
        assert_eq!(control.value(), 100);

        let factor = control.set(50, VolumeCurve::default());
        assert!(close(factor, 0.1));
        assert!(close(control.factor(), 0.1));
        assert_eq!(control.value(), 50);

        control.set(0, VolumeCurve::default());
        assert_eq!(control.factor(), 0.0);
    }
}
