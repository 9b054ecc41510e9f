pub mod bits;
pub mod blocks;
pub mod channel;
pub mod config;
pub mod dct;
mod frame;
pub mod imaging;
pub mod pipeline;
pub mod select;
pub mod watermark;

pub use channel::Channel;
pub use config::{Coefficient, Framing, WatermarkConfig};
pub use frame::FrameError;
pub use pipeline::embed::{embed_file, EmbedReport};
pub use pipeline::extract::{capacity_of, extract_file};
pub use pipeline::hook::{NoopHook, PipelineHook};
pub use pipeline::{roundtrip, RoundtripResult};
pub use watermark::{Extraction, WatermarkError, Watermarker};
