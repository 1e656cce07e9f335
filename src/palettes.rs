//! Process-wide palette data.

use lazy_static::lazy_static;
use rgb::RGB8;

/// Color of impassable territories when the map does not configure one.
pub const DEFAULT_IMPASSABLE: RGB8 = RGB8 { r: 0xDE, g: 0xB8, b: 0x87 };

lazy_static! {
    /// Brewer "Accent" qualitative scheme for 8 classes, yellow
    /// (`#ffff99`) removed as it is hard to see outside the map.
    pub static ref FACTION: Vec<RGB8> = [
        (0x7f, 0xc9, 0x7f),
        (0xbe, 0xae, 0xd4),
        (0xfd, 0xc0, 0x86),
        (0x38, 0x6c, 0xb0),
        (0xf0, 0x02, 0x7f),
        (0xbf, 0x5b, 0x17),
        (0x66, 0x66, 0x66),
    ].iter().map(|&(r, g, b)| RGB8 { r, g, b }).collect();
}
