// Sample format table and stream description

use crate::error::{AudioError, Result};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// PCM sample formats accepted from playback code.
///
/// `S16Le` means signed 16-bit PCM, little-endian. The discriminants are the
/// stable numeric codes used by [`SampleFormat::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    S16Le = 0,
    S16Be = 1,
    S32Le = 2,
    S32Be = 3,
    Float = 4,
}

impl SampleFormat {
    pub const ALL: [SampleFormat; 5] = [
        SampleFormat::S16Le,
        SampleFormat::S16Be,
        SampleFormat::S32Le,
        SampleFormat::S32Be,
        SampleFormat::Float,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.code() == code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for SampleFormat {
    type Error = AudioError;

    fn try_from(code: i32) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| {
            AudioError::UnsupportedFormat(format!("The requested audio format {} is unsupported.", code))
        })
    }
}

impl FromStr for SampleFormat {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .trim_start_matches("fmt_")
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();

        match normalized.as_str() {
            "s16le" => Ok(SampleFormat::S16Le),
            "s16be" => Ok(SampleFormat::S16Be),
            "s32le" => Ok(SampleFormat::S32Le),
            "s32be" => Ok(SampleFormat::S32Be),
            "float" | "f32" => Ok(SampleFormat::Float),
            _ => Err(AudioError::UnsupportedFormat(format!(
                "The requested audio format {} is unsupported.",
                s
            ))),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SampleFormat::S16Le => "s16le",
            SampleFormat::S16Be => "s16be",
            SampleFormat::S32Le => "s32le",
            SampleFormat::S32Be => "s32be",
            SampleFormat::Float => "float",
        };
        f.write_str(name)
    }
}

/// Linear PCM format flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatFlags(u32);

impl FormatFlags {
    pub const IS_FLOAT: FormatFlags = FormatFlags(1 << 0);
    pub const IS_BIG_ENDIAN: FormatFlags = FormatFlags(1 << 1);
    /// Without this flag integer samples are unsigned
    pub const IS_SIGNED_INTEGER: FormatFlags = FormatFlags(1 << 2);
    pub const IS_PACKED: FormatFlags = FormatFlags(1 << 3);
    pub const IS_NON_INTERLEAVED: FormatFlags = FormatFlags(1 << 5);

    #[cfg(target_endian = "big")]
    pub const NATIVE_FLOAT_PACKED: FormatFlags =
        FormatFlags(Self::IS_FLOAT.0 | Self::IS_PACKED.0 | Self::IS_BIG_ENDIAN.0);
    #[cfg(target_endian = "little")]
    pub const NATIVE_FLOAT_PACKED: FormatFlags = FormatFlags(Self::IS_FLOAT.0 | Self::IS_PACKED.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FormatFlags) -> bool {
        self.0 & other.0 == other.0
    }

    const fn union(self, other: FormatFlags) -> Self {
        FormatFlags(self.0 | other.0)
    }
}

impl BitOr for FormatFlags {
    type Output = FormatFlags;

    fn bitor(self, rhs: FormatFlags) -> FormatFlags {
        self.union(rhs)
    }
}

/// One row of the format table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescription {
    pub format: SampleFormat,
    /// Significant bits per sample, taken from the low bits of the container
    pub bits_per_sample: u32,
    /// Size of the container holding each sample
    pub bytes_per_sample: u32,
    pub flags: FormatFlags,
}

impl FormatDescription {
    pub fn is_float(&self) -> bool {
        self.flags.contains(FormatFlags::IS_FLOAT)
    }

    pub fn is_big_endian(&self) -> bool {
        self.flags.contains(FormatFlags::IS_BIG_ENDIAN)
    }

    pub fn is_non_interleaved(&self) -> bool {
        self.flags.contains(FormatFlags::IS_NON_INTERLEAVED)
    }
}

pub static FORMAT_TABLE: [FormatDescription; 5] = [
    FormatDescription {
        format: SampleFormat::S16Le,
        bits_per_sample: 16,
        bytes_per_sample: std::mem::size_of::<i16>() as u32,
        flags: FormatFlags::IS_SIGNED_INTEGER,
    },
    FormatDescription {
        format: SampleFormat::S16Be,
        bits_per_sample: 16,
        bytes_per_sample: std::mem::size_of::<i16>() as u32,
        flags: FormatFlags::IS_SIGNED_INTEGER.union(FormatFlags::IS_BIG_ENDIAN),
    },
    FormatDescription {
        format: SampleFormat::S32Le,
        bits_per_sample: 32,
        bytes_per_sample: std::mem::size_of::<i32>() as u32,
        flags: FormatFlags::IS_SIGNED_INTEGER,
    },
    FormatDescription {
        format: SampleFormat::S32Be,
        bits_per_sample: 32,
        bytes_per_sample: std::mem::size_of::<i32>() as u32,
        flags: FormatFlags::IS_SIGNED_INTEGER.union(FormatFlags::IS_BIG_ENDIAN),
    },
    FormatDescription {
        format: SampleFormat::Float,
        bits_per_sample: 32,
        bytes_per_sample: std::mem::size_of::<f32>() as u32,
        flags: FormatFlags::NATIVE_FLOAT_PACKED.union(FormatFlags::IS_NON_INTERLEAVED),
    },
];

/// Find the table entry for `format`
pub fn lookup(format: SampleFormat) -> Option<&'static FormatDescription> {
    FORMAT_TABLE.iter().find(|entry| entry.format == format)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatId {
    LinearPcm,
}

/// Basic description of the stream handed to the output device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamDescription {
    pub sample_rate: f64,
    pub format_id: FormatId,
    pub flags: FormatFlags,
    pub frames_per_packet: u32,
    pub channels_per_frame: u32,
    pub bits_per_channel: u32,
    pub bytes_per_packet: u32,
    pub bytes_per_frame: u32,
}

impl StreamDescription {
    pub fn new(desc: &FormatDescription, sample_rate: u32, channels: u16) -> Self {
        let channels = channels as u32;
        Self {
            sample_rate: sample_rate as f64,
            format_id: FormatId::LinearPcm,
            flags: desc.flags,
            frames_per_packet: 1,
            channels_per_frame: channels,
            bits_per_channel: desc.bits_per_sample,
            bytes_per_packet: channels * desc.bytes_per_sample,
            bytes_per_frame: channels * desc.bytes_per_sample,
        }
    }

    pub fn log_summary(&self) {
        log::info!("Stream format:");
        log::info!(" Channels: {}", self.channels_per_frame);
        log::info!(" Sample rate: {:.6}", self.sample_rate);
        log::info!(" Bits per channel: {}", self.bits_per_channel);
        log::info!(" Bytes per frame: {}", self.bytes_per_frame);
    }
}
