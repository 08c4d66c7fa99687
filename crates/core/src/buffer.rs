// Buffer list the render callback fills

use crate::format::{lookup, FormatDescription, SampleFormat};

/// One contiguous block of sample bytes
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    /// Channels interleaved in this buffer
    pub number_channels: u16,
    data: Vec<u8>,
}

impl AudioBuffer {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes requested for this render cycle
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}

/// Set of buffers for one render cycle.
///
/// Interleaved formats use a single buffer holding every channel. The
/// non-interleaved float format uses one buffer per channel.
#[derive(Debug, Clone)]
pub struct AudioBufferList {
    desc: &'static FormatDescription,
    channels: u16,
    frames: usize,
    buffers: Vec<AudioBuffer>,
}

impl AudioBufferList {
    /// Returns `None` only if `format` has no table entry.
    pub fn new(format: SampleFormat, channels: u16) -> Option<Self> {
        let desc = lookup(format)?;
        let buffers = if desc.is_non_interleaved() {
            (0..channels)
                .map(|_| AudioBuffer {
                    number_channels: 1,
                    data: Vec::new(),
                })
                .collect()
        } else {
            vec![AudioBuffer {
                number_channels: channels,
                data: Vec::new(),
            }]
        };

        Some(Self {
            desc,
            channels,
            frames: 0,
            buffers,
        })
    }

    /// Size every buffer for `frames` frames and zero it.
    pub fn prepare(&mut self, frames: usize) {
        let bytes = self.desc.bytes_per_sample as usize;
        for buffer in &mut self.buffers {
            let size = frames * buffer.number_channels as usize * bytes;
            buffer.data.clear();
            buffer.data.resize(size, 0);
        }
        self.frames = frames;
    }

    pub fn format(&self) -> SampleFormat {
        self.desc.format
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Frames requested for this render cycle
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn buffers(&self) -> &[AudioBuffer] {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut [AudioBuffer] {
        &mut self.buffers
    }

    /// Encode `value` (nominally -1.0..=1.0) at `frame`/`channel`.
    ///
    /// Out of range positions are ignored.
    pub fn write_sample(&mut self, frame: usize, channel: u16, value: f32) {
        let desc = self.desc;
        if let Some((buffer, offset)) = self.locate(frame, channel) {
            let slot = &mut self.buffers[buffer].data[offset..offset + desc.bytes_per_sample as usize];
            encode(desc, value, slot);
        }
    }

    /// Decode the sample at `frame`/`channel`; silence when out of range.
    pub fn read_sample(&self, frame: usize, channel: u16) -> f32 {
        match self.locate(frame, channel) {
            Some((buffer, offset)) => {
                let slot = &self.buffers[buffer].data[offset..offset + self.desc.bytes_per_sample as usize];
                decode(self.desc, slot)
            }
            None => 0.0,
        }
    }

    fn locate(&self, frame: usize, channel: u16) -> Option<(usize, usize)> {
        if frame >= self.frames || channel >= self.channels {
            return None;
        }
        let bytes = self.desc.bytes_per_sample as usize;
        if self.desc.is_non_interleaved() {
            Some((channel as usize, frame * bytes))
        } else {
            let index = frame * self.channels as usize + channel as usize;
            Some((0, index * bytes))
        }
    }
}

fn encode(desc: &FormatDescription, value: f32, out: &mut [u8]) {
    let big = desc.is_big_endian();
    if desc.is_float() {
        let bytes = if big { value.to_be_bytes() } else { value.to_le_bytes() };
        out.copy_from_slice(&bytes);
        return;
    }

    let value = value.clamp(-1.0, 1.0);
    match desc.bytes_per_sample {
        2 => {
            let sample = (value * i16::MAX as f32) as i16;
            let bytes = if big { sample.to_be_bytes() } else { sample.to_le_bytes() };
            out.copy_from_slice(&bytes);
        }
        _ => {
            let sample = (value as f64 * i32::MAX as f64) as i32;
            let bytes = if big { sample.to_be_bytes() } else { sample.to_le_bytes() };
            out.copy_from_slice(&bytes);
        }
    }
}

pub(crate) fn decode(desc: &FormatDescription, slot: &[u8]) -> f32 {
    let big = desc.is_big_endian();
    if desc.is_float() {
        let bytes = [slot[0], slot[1], slot[2], slot[3]];
        return if big { f32::from_be_bytes(bytes) } else { f32::from_le_bytes(bytes) };
    }

    match desc.bytes_per_sample {
        2 => {
            let bytes = [slot[0], slot[1]];
            let sample = if big { i16::from_be_bytes(bytes) } else { i16::from_le_bytes(bytes) };
            sample as f32 / 32768.0
        }
        _ => {
            let bytes = [slot[0], slot[1], slot[2], slot[3]];
            let sample = if big { i32::from_be_bytes(bytes) } else { i32::from_le_bytes(bytes) };
            (sample as f64 / 2_147_483_648.0) as f32
        }
    }
}
