//! Architectural register state: special registers and the windowed
//! integer register file.

/// Special registers and their named bit fields.
pub mod special;
/// The windowed register file.
pub mod windows;

pub use special::{fsr, psr, tbr, Field, SpecialRegister};
pub use windows::{WindowedRegisters, DEFAULT_WINDOW_COUNT, GLOBAL_COUNT, WINDOW_CELLS};
