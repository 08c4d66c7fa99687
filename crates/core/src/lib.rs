// Core types for halout: formats, buffers, volume and output state

pub mod buffer;
pub mod convert;
pub mod error;
pub mod event;
pub mod format;
pub mod state;
pub mod volume;

// Re-export commonly used types
pub use buffer::{AudioBuffer, AudioBufferList};
pub use convert::to_interleaved_f32;
pub use error::{AudioError, Result};
pub use event::{EventDispatcher, OutputEvent, OutputListener};
pub use format::{lookup, FormatDescription, FormatFlags, FormatId, SampleFormat, StreamDescription, FORMAT_TABLE};
pub use state::{OutputState, OutputStateContainer};
pub use volume::{volume_factor, VolumeControl, VolumeCurve, VOLUME_RANGE_DB};
