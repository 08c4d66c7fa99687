// Conversion from the caller's sample format to interleaved f32

use crate::buffer::AudioBufferList;

/// Decode the first `frames` frames of `list` into interleaved f32 `out`.
///
/// `out` holds whole frames of `list.channels()` samples. Anything past the
/// decoded frames is filled with silence so stale data never reaches the
/// device.
pub fn to_interleaved_f32(list: &AudioBufferList, frames: usize, out: &mut [f32]) {
    let channels = list.channels() as usize;
    if channels == 0 {
        out.fill(0.0);
        return;
    }

    let frames = frames.min(list.frames()).min(out.len() / channels);
    for (frame, chunk) in out.chunks_mut(channels).take(frames).enumerate() {
        for (channel, sample) in chunk.iter_mut().enumerate() {
            *sample = list.read_sample(frame, channel as u16);
        }
    }

    out[frames * channels..].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SampleFormat;

    #[test]
    fn test_float_planes_are_interleaved() {
        let mut list = AudioBufferList::new(SampleFormat::Float, 2).unwrap();
        list.prepare(3);
        for frame in 0..3 {
            list.write_sample(frame, 0, frame as f32 * 0.1);
            list.write_sample(frame, 1, -(frame as f32) * 0.1);
        }

        let mut out = [9.0f32; 6];
        to_interleaved_f32(&list, 3, &mut out);
        assert_eq!(out, [0.0, -0.0, 0.1, -0.1, 0.2, -0.2]);
    }

    #[test]
    fn test_short_render_is_zero_filled() {
        let mut list = AudioBufferList::new(SampleFormat::S16Be, 1).unwrap();
        list.prepare(4);
        list.write_sample(0, 0, 0.5);
        list.write_sample(1, 0, 0.5);
        list.write_sample(2, 0, 0.5);

        let mut out = [1.0f32; 4];
        to_interleaved_f32(&list, 2, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-4);
        assert!((out[1] - 0.5).abs() < 1e-4);
        assert_eq!(&out[2..], &[0.0f32, 0.0][..]);
    }

    #[test]
    fn test_frames_clamped_to_output() {
        let mut list = AudioBufferList::new(SampleFormat::S32Le, 2).unwrap();
        list.prepare(8);
        let mut out = [1.0f32; 4];
        to_interleaved_f32(&list, 100, &mut out);
        assert_eq!(out, [0.0; 4]);
    }
}
