//! Edge detection between consecutive matrix scans.
//!
//! The tracker remembers which codes the host currently sees as held and
//! turns every change into exactly one `press` or `release` on the
//! [`HidTransmitter`]. There is no debounce state: the scan period is the
//! only filter.

use keyberon::key_code::KeyCode;

use crate::hid::HidTransmitter;
use crate::keymap::Keymap;
use crate::matrix::MatrixState;

/// Capacity of the pressed set. Must be at least the number of distinct
/// codes in the keymap.
pub const MAX_PRESSED: usize = 32;

/// Key codes currently held, in no particular order and without duplicates.
pub type PressedSet = heapless::Vec<KeyCode, MAX_PRESSED>;

/// Pressed-set owner for one keymap.
pub struct Tracker<'a, const C: usize, const R: usize> {
    keymap: &'a Keymap<C, R>,
    pressed: PressedSet,
}

impl<'a, const C: usize, const R: usize> Tracker<'a, C, R> {
    pub fn new(keymap: &'a Keymap<C, R>) -> Self {
        Tracker {
            keymap,
            pressed: PressedSet::new(),
        }
    }

    /// Codes the host currently sees as held.
    pub fn pressed(&self) -> &[KeyCode] {
        &self.pressed
    }

    /// Moves `code` to the `active` state, notifying `hid` only on a change.
    ///
    /// Returns whether anything was sent.
    pub fn set_pressed<H: HidTransmitter>(
        &mut self,
        code: KeyCode,
        active: bool,
        hid: &mut H,
    ) -> bool {
        let held = self.pressed.iter().position(|&k| k == code);
        match (active, held) {
            (true, None) => {
                if self.pressed.push(code).is_err() {
                    // Full. Drop the press rather than desync the host.
                    return false;
                }
                hid.press(code);
                true
            }
            (false, Some(index)) => {
                self.pressed.swap_remove(index);
                hid.release(code);
                true
            }
            _ => false,
        }
    }

    /// Applies one full matrix scan and returns the number of transitions
    /// sent.
    ///
    /// Positions sharing a code are merged first, so such a code is held
    /// while any of its positions is closed. Transitions go out in row-major
    /// order of the first position carrying each code.
    pub fn update<H: HidTransmitter>(&mut self, state: &MatrixState<C, R>, hid: &mut H) -> usize {
        let mut active = PressedSet::new();
        for (row, cols) in state.iter().enumerate() {
            for (col, &closed) in cols.iter().enumerate() {
                let code = self.keymap.lookup(row, col);
                if closed && !active.contains(&code) {
                    // Past capacity the code stays inactive and its press is dropped.
                    active.push(code).ok();
                }
            }
        }

        let mut sent = 0;
        for row in 0..R {
            for col in 0..C {
                let code = self.keymap.lookup(row, col);
                if self.set_pressed(code, active.contains(&code), hid) {
                    sent += 1;
                }
            }
        }
        sent
    }
}

#[cfg(test)]
pub(crate) mod recorder {
    use keyberon::key_code::KeyCode;

    use crate::hid::HidTransmitter;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Call {
        Press(KeyCode),
        Release(KeyCode),
    }

    /// Transmitter that only remembers what it was asked to do.
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Vec<Call>,
    }

    impl Recorder {
        pub fn take(&mut self) -> Vec<Call> {
            core::mem::take(&mut self.calls)
        }
    }

    impl HidTransmitter for Recorder {
        fn press(&mut self, code: KeyCode) {
            self.calls.push(Call::Press(code));
        }

        fn release(&mut self, code: KeyCode) {
            self.calls.push(Call::Release(code));
        }
    }
}
