//! Colors and statistics charts of players and alliances.
//!
//! - [`ColorAssigner`] gives every player or alliance a stable color,
//!   taken from the map configuration, the [`Palette::faction`] colors
//!   or, when those run out, derived from the name.
//! - [`StatisticsView`] caches the statistics aggregated from the game
//!   history and projects them according to a [`ViewMode`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use faction_colors::{ColorAssigner, Properties, StatisticKind,
//!                      Statistics, StatisticsView, TimeSeriesTable, ViewMode};
//!
//! let props = Properties::parse("color.Germans=555555").unwrap();
//! let mut colors = ColorAssigner::new(props);
//! let alliances: HashSet<String> = ["Axis".to_string()].into_iter().collect();
//! let mut view = StatisticsView::new(alliances);
//!
//! let production = StatisticKind::new("Production", "PUs");
//! let table: TimeSeriesTable = [("Germans", 1, 40.), ("Axis", 1, 70.)]
//!     .into_iter().collect();
//! let stats: Statistics = [(production.clone(), table)].into_iter().collect();
//! view.on_aggregation_complete(stats).unwrap();
//!
//! view.set_view_mode(ViewMode::PlayersAndAlliances);
//! let projection = view.projected_series(&production, &mut colors).unwrap();
//! assert_eq!(projection.series.len(), 2);
//! assert_eq!(projection.series[1].axis.index(), 1);
//! ```

use rgb::RGB8;

mod assigner;
mod color;
mod config;
mod error;
mod palettes;
pub mod statistics;

pub use assigner::{is_reserved, ColorAssigner, IMPASSABLE, IMPASSABLE_LEGACY};
pub use color::{hsb, parse_hex, seeded_color, to_hex, SEEDED_BRIGHTNESS};
pub use config::{color_key, ColorSource, Properties, COLOR_PREFIX};
pub use error::{Error, Result};
pub use palettes::DEFAULT_IMPASSABLE;
pub use statistics::{AllianceMembership, AxisGroup, Projection, ProjectedSeries,
                     ProjectionWarning, StatisticKind, Statistics,
                     StatisticsView, TimeSeriesTable, ViewMode};

/// An ordered list of colors, handed out front to back.
#[derive(Clone, Copy, Debug)]
pub struct Palette<'a> {
    rgb: &'a [RGB8],
}

impl<'a> Palette<'a> {
    pub fn new(rgb: &'a [RGB8]) -> Self { Self { rgb } }

    /// The 7 default colors of players and alliances: Brewer "Accent"
    /// qualitative scheme without its yellow, see
    /// <https://colorbrewer2.org/?type=qualitative&scheme=Accent&n=8>.
    #[inline]
    pub fn faction() -> Palette<'static> { Palette::new(&palettes::FACTION) }

    /// Returns the number of colors in the palette.
    pub fn len(&self) -> usize { self.rgb.len() }

    pub fn is_empty(&self) -> bool { self.rgb.is_empty() }

    /// Returns the `i`th color, if any.
    pub fn get(&self, i: usize) -> Option<RGB8> { self.rgb.get(i).copied() }

    /// Returns the RGB colors of the palette.
    pub fn colors(&self) -> Vec<RGB8> { self.rgb.to_vec() }
}
