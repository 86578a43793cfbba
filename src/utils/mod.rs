pub mod compression;
pub mod display;
pub mod fs;
pub mod progress;
