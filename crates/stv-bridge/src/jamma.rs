//! Pad-to-JAMMA signal translation.
//!
//! Each port drives seven output lines, active low: a 0 bit means the
//! corresponding control line is asserted. With nothing held the output
//! byte is `$7F`.
//!
//! | Line | Button |
//! |------|--------|
//! | 0    | Up     |
//! | 1    | Down   |
//! | 2    | Left   |
//! | 3    | Right  |
//! | 4    | A      |
//! | 5    | B      |
//! | 6    | C      |

use saturn_pad::button;

/// Output byte with no lines asserted.
pub const IDLE: u8 = 0x7F;

/// Button-to-line assignment, in line order.
const LINES: [u16; 7] = [
    button::UP,
    button::DOWN,
    button::LEFT,
    button::RIGHT,
    button::A,
    button::B,
    button::C,
];

/// Build the active-low output byte for one port's held mask.
#[must_use]
pub fn translate(held: u16) -> u8 {
    let mut out = IDLE;
    for (line, &mask) in LINES.iter().enumerate() {
        if held & mask != 0 {
            out &= !(1 << line);
        }
    }
    out
}
