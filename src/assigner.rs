//! Stable colors for players and alliances.

use std::collections::HashMap;
use log::debug;
use rgb::RGB8;

use crate::color::{parse_hex, seeded_color, to_hex};
use crate::config::{color_key, ColorSource};
use crate::error::{Error, Result};
use crate::palettes::DEFAULT_IMPASSABLE;
use crate::Palette;

/// Name of the pseudo-player owning impassable territories.
pub const IMPASSABLE: &str = "Impassable";
/// Legacy spelling of [`IMPASSABLE`], still found in older maps.
pub const IMPASSABLE_LEGACY: &str = "Impassible";

/// Returns `true` if `name` is reserved for impassable territories.
pub fn is_reserved(name: &str) -> bool {
    name == IMPASSABLE || name == IMPASSABLE_LEGACY
}

/// Assigns each entity a color, once and for all.
///
/// A color is, in order of preference: the one configured under
/// `color.<name>`, the next unused palette entry, or a color derived
/// from the name ([`seeded_color`]).  Palette entries are handed out
/// in first-query order, so the colors of entities without configured
/// overrides depend on the order in which they are first requested.
pub struct ColorAssigner<'a, S> {
    palette: Palette<'a>,
    next: usize, // first unused palette entry
    source: S,
    assigned: HashMap<String, RGB8>,
}

impl<S: ColorSource> ColorAssigner<'static, S> {
    /// Assigner drawing from the [`Palette::faction`] colors.
    pub fn new(source: S) -> Self { Self::with_palette(Palette::faction(), source) }
}

impl<'a, S: ColorSource> ColorAssigner<'a, S> {
    pub fn with_palette(palette: Palette<'a>, source: S) -> Self {
        Self { palette, next: 0, source, assigned: HashMap::new() }
    }

    /// Return the color of the player or alliance `name`.
    ///
    /// Fails with [`Error::ReservedName`] for the impassable names
    /// (use [`Self::impassable_color`]) and with
    /// [`Error::InvalidColor`] if the configured color is malformed.
    /// Nothing is recorded when an error is returned.
    pub fn color_for(&mut self, name: &str) -> Result<RGB8> {
        if is_reserved(name) {
            return Err(Error::ReservedName { name: name.to_owned() });
        }
        if let Some(&c) = self.assigned.get(name) {
            return Ok(c);
        }
        let c = match self.source.lookup(&color_key(name)) {
            Some(hex) => parse_hex(&hex)?,
            None => self.next_color(name),
        };
        debug!("assigned color #{} to {name:?}", to_hex(c));
        self.assigned.insert(name.to_owned(), c);
        Ok(c)
    }

    fn next_color(&mut self, name: &str) -> RGB8 {
        match self.palette.get(self.next) {
            Some(c) => {
                self.next += 1;
                c
            }
            None => {
                debug!("palette exhausted, deriving color of {name:?} from its name");
                seeded_color(name)
            }
        }
    }

    /// Return the color of impassable territories: the one configured
    /// for [`IMPASSABLE`], else for [`IMPASSABLE_LEGACY`], else
    /// [`DEFAULT_IMPASSABLE`].  Never touches the palette nor the
    /// recorded assignments.
    pub fn impassable_color(&self) -> Result<RGB8> {
        self.source.lookup(&color_key(IMPASSABLE))
            .or_else(|| self.source.lookup(&color_key(IMPASSABLE_LEGACY)))
            .map_or(Ok(DEFAULT_IMPASSABLE), |hex| parse_hex(&hex))
    }

    /// Color already assigned to `name`, without assigning one.
    pub fn assigned(&self, name: &str) -> Option<RGB8> {
        self.assigned.get(name).copied()
    }

    /// Number of palette entries not yet handed out.
    pub fn palette_remaining(&self) -> usize { self.palette.len() - self.next }
}
