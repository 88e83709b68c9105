// Adapters layer: concrete implementations of the domain ports.

pub mod audio;
pub mod clock;
pub mod smtp;
pub mod stats;
