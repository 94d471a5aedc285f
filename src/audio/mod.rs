pub mod output;
pub mod pipeline;
pub mod tap;
pub mod track;

pub use output::{AudioOutput, RodioOutput};
pub use pipeline::{AudioPipeline, PlaybackState};
pub use track::DecodedTrack;
