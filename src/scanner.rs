use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use fugit::MillisDurationU32;

use crate::hid::HidTransmitter;
use crate::keymap::Keymap;
use crate::matrix::Matrix;
use crate::tracker::Tracker;

/// Pause after every full pass over the matrix. Bounds the scan rate and is
/// the only debounce there is.
pub const SCAN_PERIOD: MillisDurationU32 = MillisDurationU32::millis(10);

/// Stop request for [`Scanner::run`], checked once per cycle.
pub struct Shutdown(AtomicBool);

impl Shutdown {
    pub const fn new() -> Self {
        Shutdown(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Scanner<'a, Cp, Rp, const C: usize, const R: usize>
where
    Cp: InputPin,
    Rp: OutputPin,
{
    matrix: Matrix<Cp, Rp, C, R>,
    tracker: Tracker<'a, C, R>,
}

impl<'a, Cp, Rp, E, const C: usize, const R: usize> Scanner<'a, Cp, Rp, C, R>
where
    Cp: InputPin<Error = E>,
    Rp: OutputPin<Error = E>,
{
    pub fn new(matrix: Matrix<Cp, Rp, C, R>, keymap: &'a Keymap<C, R>) -> Self {
        Scanner {
            matrix,
            tracker: Tracker::new(keymap),
        }
    }

    /// One full pass: sample every position, then send whatever changed.
    pub fn scan<H: HidTransmitter>(&mut self, hid: &mut H) -> Result<usize, E> {
        let state = self.matrix.get()?;
        Ok(self.tracker.update(&state, hid))
    }

    /// Scans every [`SCAN_PERIOD`] until `shutdown` is requested.
    pub fn run<H, D>(&mut self, hid: &mut H, delay: &mut D, shutdown: &Shutdown) -> Result<(), E>
    where
        H: HidTransmitter,
        D: DelayMs<u32>,
    {
        while !shutdown.is_requested() {
            self.scan(hid)?;
            delay.delay_ms(SCAN_PERIOD.to_millis());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use keyberon::key_code::KeyCode::*;

    use super::*;
    use crate::keymap::{COLS, KEYMAP, ROWS};
    use crate::matrix::sim::Panel;
    use crate::tracker::recorder::{Call::*, Recorder};

    /// Plays back one panel state per cycle, using the scan delay as the
    /// clock tick, and stops once the script runs out.
    struct Script<'a> {
        panel: &'a Panel<COLS, ROWS>,
        steps: Vec<[[bool; COLS]; ROWS]>,
        shutdown: &'a Shutdown,
        delays: Vec<u32>,
    }

    impl DelayMs<u32> for Script<'_> {
        fn delay_ms(&mut self, ms: u32) {
            self.delays.push(ms);
            if self.steps.is_empty() {
                self.shutdown.request();
            } else {
                self.panel.set(self.steps.remove(0));
            }
        }
    }

    fn at(row: usize, col: usize) -> [[bool; COLS]; ROWS] {
        let mut state = [[false; COLS]; ROWS];
        state[row][col] = true;
        state
    }

    #[test]
    fn scan_sends_edges() {
        let panel = Panel::new();
        let matrix = Matrix::new(panel.cols(), panel.rows()).unwrap();
        let mut scanner = Scanner::new(matrix, &KEYMAP);
        let mut hid = Recorder::default();

        assert_eq!(scanner.scan(&mut hid).unwrap(), 0);
        panel.hold(0, 0, true);
        assert_eq!(scanner.scan(&mut hid).unwrap(), 1);
        assert_eq!(scanner.scan(&mut hid).unwrap(), 0);
        panel.release_all();
        assert_eq!(scanner.scan(&mut hid).unwrap(), 1);
        assert_eq!(hid.calls, vec![Press(A), Release(A)]);
    }

    #[test]
    fn run_plays_until_shutdown() {
        let panel = Panel::new();
        let shutdown = Shutdown::new();
        let matrix = Matrix::new(panel.cols(), panel.rows()).unwrap();
        let mut scanner = Scanner::new(matrix, &KEYMAP);
        let mut hid = Recorder::default();
        let mut script = Script {
            panel: &panel,
            steps: vec![at(1, 4), [[false; COLS]; ROWS], at(1, 4)],
            shutdown: &shutdown,
            delays: Vec::new(),
        };

        scanner.run(&mut hid, &mut script, &shutdown).unwrap();

        // One pause per completed cycle, the last one noticing the stop.
        assert_eq!(script.delays, vec![10; 4]);
        assert_eq!(hid.calls, vec![Press(LShift), Release(LShift), Press(LShift)]);
    }

    #[test]
    fn run_does_nothing_once_stopped() {
        let panel = Panel::new();
        let shutdown = Shutdown::new();
        shutdown.request();
        let matrix = Matrix::new(panel.cols(), panel.rows()).unwrap();
        let mut scanner = Scanner::new(matrix, &KEYMAP);
        let mut hid = Recorder::default();
        let mut script = Script {
            panel: &panel,
            steps: Vec::new(),
            shutdown: &shutdown,
            delays: Vec::new(),
        };

        scanner.run(&mut hid, &mut script, &shutdown).unwrap();
        assert!(script.delays.is_empty());
        assert_eq!(panel.row_writes.get(), ROWS);
    }
}
