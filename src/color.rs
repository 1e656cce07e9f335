//! Color parsing and construction helpers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rgb::RGB8;
use twox_hash::XxHash64;

use crate::error::{Error, Result};

/// Brightness of colors derived from an entity name.
pub const SEEDED_BRIGHTNESS: f64 = 0.5;

/// Parse a color written as exactly 6 hexadecimal digits (without a
/// leading `#`), e.g. `DEB887` or `deb887`.
///
/// # Example
///
/// ```
/// use rgb::RGB8;
/// use faction_colors::parse_hex;
/// assert_eq!(parse_hex("DEB887").unwrap(), RGB8::new(0xde, 0xb8, 0x87));
/// assert!(parse_hex("#DEB887").is_err());
/// ```
pub fn parse_hex(s: &str) -> Result<RGB8> {
    let invalid = |position, reason| Error::InvalidColor {
        value: s.to_owned(), position, reason };
    if let Some(position) = s.chars().position(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(position, "not a hexadecimal digit"));
    }
    if s.len() != 6 {
        return Err(invalid(s.len().min(6), "expected exactly 6 digits"));
    }
    let x = u32::from_str_radix(s, 16)
        .map_err(|_| invalid(0, "not a hexadecimal number"))?;
    Ok(RGB8 { r: (x >> 16) as u8, g: (x >> 8) as u8, b: x as u8 })
}

/// Format a color as 6 uppercase hex digits, the form accepted by
/// [`parse_hex`].
pub fn to_hex(c: RGB8) -> String {
    format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

/// Convert hue, saturation and brightness (all in \[0, 1\]) to RGB.
/// Only the fractional part of `hue` is used.
pub fn hsb(hue: f64, saturation: f64, brightness: f64) -> RGB8 {
    let channel = |x: f64| (x * 255. + 0.5) as u8;
    if saturation == 0. {
        let v = channel(brightness);
        return RGB8 { r: v, g: v, b: v };
    }
    let h = (hue - hue.floor()) * 6.;
    let f = h - h.floor();
    let p = brightness * (1. - saturation);
    let q = brightness * (1. - saturation * f);
    let t = brightness * (1. - saturation * (1. - f));
    let (r, g, b) = match h as u8 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    RGB8 { r: channel(r), g: channel(g), b: channel(b) }
}

/// Color derived from `name` alone: xxHash64 of the name seeds a
/// ChaCha20 generator drawing hue and saturation uniformly in \[0, 1),
/// brightness is [`SEEDED_BRIGHTNESS`].  Stable across processes.
pub fn seeded_color(name: &str) -> RGB8 {
    let seed = XxHash64::oneshot(0, name.as_bytes());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let hue: f64 = rng.gen();
    let saturation: f64 = rng.gen();
    hsb(hue, saturation, SEEDED_BRIGHTNESS)
}
