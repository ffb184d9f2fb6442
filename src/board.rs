use mahjong_panel::keymap::{COLS, ROWS};
use mahjong_panel::matrix::Matrix;
use mahjong_panel::scanner::Scanner;
use rp2040_hal::gpio::{DynPinId, FunctionSioInput, FunctionSioOutput, Pin, PinState, PullDown, PullUp};
use rp_pico::Pins;

// Raspberry Pi Pico wiring of the panel connector:
// KEY lines on GP0..GP5, COM lines on GP6..GP10.

pub type KeyPin = Pin<DynPinId, FunctionSioInput, PullUp>;
pub type ComPin = Pin<DynPinId, FunctionSioOutput, PullDown>;

pub type PanelMatrix = Matrix<KeyPin, ComPin, COLS, ROWS>;
pub type PanelScanner = Scanner<'static, KeyPin, ComPin, COLS, ROWS>;

pub fn init_matrix(pins: Pins) -> PanelMatrix {
    // KEY lines float high through the pull-ups; a pressed button ties
    // them to whichever COM line is low.
    Matrix::new(
        [
            pins.gpio0.into_pull_up_input().into_dyn_pin(),
            pins.gpio1.into_pull_up_input().into_dyn_pin(),
            pins.gpio2.into_pull_up_input().into_dyn_pin(),
            pins.gpio3.into_pull_up_input().into_dyn_pin(),
            pins.gpio4.into_pull_up_input().into_dyn_pin(),
            pins.gpio5.into_pull_up_input().into_dyn_pin(),
        ],
        [
            pins.gpio6.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            pins.gpio7.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            pins.gpio8.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            pins.gpio9.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            pins.gpio10.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
        ],
    )
    .unwrap()
}
