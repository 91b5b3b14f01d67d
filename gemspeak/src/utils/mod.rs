pub mod debug;
pub mod fileio;
pub mod wav;
