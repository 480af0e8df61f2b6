mod helpers;

pub use helpers::{format_frequency, format_time};
