use keyberon::key_code::{KbHidReport, KeyCode};

use crate::tracker::PressedSet;

/// Receiver of key transitions, one call per edge.
pub trait HidTransmitter {
    fn press(&mut self, code: KeyCode);
    fn release(&mut self, code: KeyCode);
}

/// Somewhere to push a complete keyboard report, usually the USB endpoint.
pub trait ReportSink {
    fn send_report(&mut self, report: &KbHidReport);
}

/// Keeps the outgoing keyboard report and hands it to the sink after every
/// press or release.
pub struct HidKeyboard<S> {
    held: PressedSet,
    sink: S,
}

impl<S: ReportSink> HidKeyboard<S> {
    pub fn new(sink: S) -> Self {
        HidKeyboard {
            held: PressedSet::new(),
            sink,
        }
    }

    /// Report for the codes currently held. Modifiers land in the modifier
    /// byte, everything else in the six key slots.
    pub fn report(&self) -> KbHidReport {
        self.held.iter().copied().collect()
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    fn send(&mut self) {
        let report = self.report();
        self.sink.send_report(&report);
    }
}

impl<S: ReportSink> HidTransmitter for HidKeyboard<S> {
    fn press(&mut self, code: KeyCode) {
        if !self.held.contains(&code) && self.held.push(code).is_ok() {
            self.send();
        }
    }

    fn release(&mut self, code: KeyCode) {
        if let Some(index) = self.held.iter().position(|&k| k == code) {
            self.held.swap_remove(index);
            self.send();
        }
    }
}
