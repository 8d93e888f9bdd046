//! The windowed integer register file.
//!
//! Physical storage holds 8 globals plus 16 cells (8 outputs, 8 locals)
//! per window; the inputs of window `N` are aliases for the outputs of
//! window `(N + 1) mod W`. `save` rotates the current window pointer down
//! so that the caller's outputs become the callee's inputs; `restore`
//! rotates back up. Register 0 reads as zero and ignores writes.

use log::warn;

use super::special::SpecialRegister;

/// Number of shared global registers.
pub const GLOBAL_COUNT: usize = 8;
/// Per-window cell count (8 outputs + 8 locals; inputs are aliased).
pub const WINDOW_CELLS: usize = 16;
/// Default window count used by [`WindowedRegisters::default`].
pub const DEFAULT_WINDOW_COUNT: u32 = 4;

/// The windowed register file with its current window pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowedRegisters {
    cells: Vec<u32>,
    window_count: u32,
    cwp: u32,
}

impl WindowedRegisters {
    /// Creates a zeroed register file with `window_count` windows.
    ///
    /// # Panics
    ///
    /// Panics if `window_count` is less than 2: a single window cannot
    /// alias its own inputs onto its own outputs.
    #[must_use]
    pub fn new(window_count: u32) -> Self {
        assert!(window_count >= 2, "need at least two register windows");
        Self {
            cells: vec![0; GLOBAL_COUNT + window_count as usize * WINDOW_CELLS],
            window_count,
            cwp: 0,
        }
    }

    /// Number of windows.
    #[must_use]
    pub const fn window_count(&self) -> u32 {
        self.window_count
    }

    /// Current window pointer.
    #[must_use]
    pub const fn cwp(&self) -> u32 {
        self.cwp
    }

    /// Forces the current window pointer, reduced modulo the window count.
    /// Used when `WRPSR` overwrites the CWP field.
    pub const fn set_cwp(&mut self, cwp: u32) {
        self.cwp = cwp % self.window_count;
    }

    /// Maps a logical register number (0..32) of the current window to its
    /// physical cell index.
    fn physical_index(&self, number: u32) -> usize {
        let number = number as usize;
        debug_assert!(number < 32);
        let base = |window: u32| GLOBAL_COUNT + window as usize * WINDOW_CELLS;
        match number {
            0..GLOBAL_COUNT => number,
            // Outputs and locals live in the current window's cells.
            GLOBAL_COUNT..24 => base(self.cwp) + (number - GLOBAL_COUNT),
            // Inputs are the next window's outputs, wrapping at the ring.
            _ => base((self.cwp + 1) % self.window_count) + (number - 24),
        }
    }

    /// Reads logical register `number` of the current window.
    #[must_use]
    pub fn read(&self, number: u32) -> u32 {
        if number == 0 {
            return 0;
        }
        self.cells[self.physical_index(number)]
    }

    /// Writes logical register `number` of the current window. Writes to
    /// register 0 are discarded.
    pub fn write(&mut self, number: u32, value: u32) {
        if number == 0 {
            return;
        }
        let index = self.physical_index(number);
        self.cells[index] = value;
    }

    /// Rotates to the next window (CWP − 1 modulo W). Wrapping marks the
    /// destination window in `wim`; returns `true` when the destination
    /// window was already marked invalid (window overflow).
    pub fn save(&mut self, wim: &mut SpecialRegister) -> bool {
        let wrapped = self.cwp == 0;
        self.cwp = (self.cwp + self.window_count - 1) % self.window_count;
        if wrapped {
            wim.set_flag((self.cwp, 1), true);
        }
        let invalid = wim.flag((self.cwp, 1));
        if invalid {
            warn!("window overflow: save into invalid window {}", self.cwp);
        }
        invalid
    }

    /// Rotates back to the previous window (CWP + 1 modulo W). Wrapping
    /// marks the destination window in `wim`; returns `true` when the
    /// destination window was already marked invalid (window underflow).
    pub fn restore(&mut self, wim: &mut SpecialRegister) -> bool {
        let wrapped = self.cwp == self.window_count - 1;
        self.cwp = (self.cwp + 1) % self.window_count;
        if wrapped {
            wim.set_flag((self.cwp, 1), true);
        }
        let invalid = wim.flag((self.cwp, 1));
        if invalid {
            warn!("window underflow: restore into invalid window {}", self.cwp);
        }
        invalid
    }
}

impl Default for WindowedRegisters {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_COUNT)
    }
}
