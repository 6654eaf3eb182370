pub mod combine;
pub mod normalize;
pub mod pipeline;

pub use combine::{CityData, combine};
pub use normalize::CityNameNormalizer;
pub use pipeline::{Capabilities, CityPipeline};
