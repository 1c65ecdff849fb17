pub mod biquad;

pub use biquad::LowShelf;
