pub mod accumulator;
pub mod analysis;
pub mod decode;
pub mod downsample;
pub mod features;
pub mod normalize;
pub mod source;
pub mod spectrum;
