// COM lines are outputs pulled low one at a time, KEY lines are pull-up
// inputs: exactly the wiring keyberon's matrix scanner expects.
pub use keyberon::matrix::Matrix;

/// One scan of the matrix, `state[row][col]`, `true` = switch closed.
pub type MatrixState<const C: usize, const R: usize> = [[bool; C]; R];
