use keyberon::key_code::KeyCode;

/// Number of KEY lines (matrix columns).
pub const COLS: usize = 6;
/// Number of COM lines (matrix rows).
pub const ROWS: usize = 5;

/// Code sent for matrix positions that have no button wired.
// Reuses a printable key, so a stray connection on one of these positions
// shows up on the host as a '.'.
pub const UNUSED: KeyCode = KeyCode::Dot;

/// Fixed mapping from a matrix position to the code reported to the host.
pub struct Keymap<const C: usize, const R: usize>([[KeyCode; C]; R]);

impl<const C: usize, const R: usize> Keymap<C, R> {
    pub const fn new(keys: [[KeyCode; C]; R]) -> Self {
        Keymap(keys)
    }

    /// Code for the switch at `row`, `col`.
    ///
    /// Panics if the position is outside the `R` x `C` matrix.
    pub fn lookup(&self, row: usize, col: usize) -> KeyCode {
        self.0[row][col]
    }

    /// How many positions report `code`.
    pub fn positions_of(&self, code: KeyCode) -> usize {
        self.0.iter().flatten().filter(|&&k| k == code).count()
    }
}

#[rustfmt::skip]
pub static KEYMAP: Keymap<COLS, ROWS> = {
    use KeyCode::*;
    Keymap::new([
        // First four COM lines are used by every Mahjong game.
        // A      E      I       M      KAN     START
        [  A,     E,     I,      M,     LCtrl,  Kb1],
        // B      F      J       N      REACH   BET
        [  B,     F,     J,      N,     LShift, Kb3],
        // C      G      K       CHI    PON     -
        [  C,     G,     K,      Space, Z,      UNUSED],
        // D      H      L       PON    -       -
        [  D,     H,     L,      LAlt,  UNUSED, UNUSED],
        // COM 4 is only used by betting style games.
        // LAST   TAKE   W-UP    F.F.   BIG     SMALL
        [  RAlt,  RCtrl, RShift, Y,     Enter,  BSpace],
    ])
};
