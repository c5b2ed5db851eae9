//! Maps the left hand side of a QWERTY keyboard onto the hex keypad.
use chip::definitions::keyboard;

/// The keys of the host keyboard in the same positions as the keypad
/// layout.
const QWERTY: [[char; 4]; 4] = [
    ['1', '2', '3', '4'],
    ['q', 'w', 'e', 'r'],
    ['a', 's', 'd', 'f'],
    ['z', 'x', 'c', 'v'],
];

/// Returns the hex key for the given character, upper case letters are
/// accepted as well.
pub fn hex_key(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    QWERTY.iter().enumerate().find_map(|(row, keys)| {
        keys.iter()
            .position(|&key| key == c)
            .map(|column| keyboard::LAYOUT[row][column])
    })
}
