// Default output unit built on cpal

mod output_unit;
mod render;

pub use output_unit::CpalOutputUnit;
pub use render::RenderEngine;
