pub mod analyzer;
pub mod mapper;

pub use analyzer::{FFT_SIZE, FrequencyAnalyser};
pub use mapper::{MapperConfig, map_to_grid};
