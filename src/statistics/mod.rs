//! Statistics over time, as charted per player and per alliance.
//!
//! The aggregation of the game history is computed once, off the
//! display thread, and handed to a [`StatisticsView`].  The view only
//! filters the cached tables according to its [`ViewMode`].

use std::collections::{BTreeSet, HashSet};
use std::convert::Infallible;
use std::fmt;

mod table;
mod view;

pub use table::{Row, TimeSeriesTable};
pub use view::{spawn_aggregation, AggregationSink, Projection, ProjectedSeries,
               ProjectionWarning, StatisticsView, ViewState,
               AGGREGATION_THREAD, LOADING_MESSAGE};

/// A statistic charted over time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatisticKind {
    /// Chart title, e.g. "Production".
    pub title: String,
    /// Label of the value axis, e.g. "PUs".
    pub axis_label: String,
}

impl StatisticKind {
    pub fn new(title: impl Into<String>, axis_label: impl Into<String>) -> Self {
        Self { title: title.into(), axis_label: axis_label.into() }
    }
}

/// Result of an aggregation: one table per statistic, in chart order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    over_time: Vec<(StatisticKind, TimeSeriesTable)>,
}

impl Statistics {
    pub fn new() -> Self { Self::default() }

    /// Add the table of `kind`, replacing (in place) a previous one.
    pub fn insert(&mut self, kind: StatisticKind, table: TimeSeriesTable) {
        match self.over_time.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, t)) => *t = table,
            None => self.over_time.push((kind, table)),
        }
    }

    pub fn get(&self, kind: &StatisticKind) -> Option<&TimeSeriesTable> {
        self.over_time.iter().find(|(k, _)| k == kind).map(|(_, t)| t)
    }

    /// Statistics in the order they were inserted.
    pub fn kinds(&self) -> impl Iterator<Item = &StatisticKind> {
        self.over_time.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize { self.over_time.len() }

    pub fn is_empty(&self) -> bool { self.over_time.is_empty() }
}

impl FromIterator<(StatisticKind, TimeSeriesTable)> for Statistics {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (StatisticKind, TimeSeriesTable)> {
        let mut s = Statistics::new();
        for (kind, table) in iter { s.insert(kind, table) }
        s
    }
}

/// Which rows of the statistics are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Players,
    Alliances,
    /// Players and alliances, each on their own value axis.
    PlayersAndAlliances,
}

impl ViewMode {
    /// All modes, in the order they are offered to the user.
    pub const ALL: [ViewMode; 3] =
        [ViewMode::Players, ViewMode::Alliances, ViewMode::PlayersAndAlliances];

    /// Whether a row is visible in this mode.
    pub fn shows(self, is_alliance: bool) -> bool {
        match self {
            ViewMode::Players => !is_alliance,
            ViewMode::Alliances => is_alliance,
            ViewMode::PlayersAndAlliances => true,
        }
    }

    /// Value axis of a row.  Only [`ViewMode::PlayersAndAlliances`]
    /// has a second axis.
    pub fn axis_group(self, is_alliance: bool) -> AxisGroup {
        if self == ViewMode::PlayersAndAlliances && is_alliance {
            AxisGroup::Alliances
        } else {
            AxisGroup::Primary
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Players => "Players",
            ViewMode::Alliances => "Alliances",
            ViewMode::PlayersAndAlliances => "Players And Alliances",
        })
    }
}

/// Value axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisGroup {
    /// Axis 0: players, or every series outside the combined mode.
    Primary,
    /// Axis 1: alliances in the combined mode.
    Alliances,
}

impl AxisGroup {
    pub fn index(self) -> usize {
        match self { AxisGroup::Primary => 0, AxisGroup::Alliances => 1 }
    }
}

/// Tells alliances apart from players.
pub trait AllianceMembership {
    type Error: fmt::Display;

    /// Returns `true` if `name` denotes an alliance rather than a player.
    fn is_alliance_group(&self, name: &str) -> Result<bool, Self::Error>;
}

impl<M: AllianceMembership + ?Sized> AllianceMembership for &M {
    type Error = M::Error;

    fn is_alliance_group(&self, name: &str) -> Result<bool, Self::Error> {
        (**self).is_alliance_group(name)
    }
}

/// The set of alliance names.
impl AllianceMembership for HashSet<String> {
    type Error = Infallible;

    fn is_alliance_group(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.contains(name))
    }
}

impl AllianceMembership for BTreeSet<String> {
    type Error = Infallible;

    fn is_alliance_group(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.contains(name))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_filter_and_axis() {
        use ViewMode::*;
        assert!(Players.shows(false) && !Players.shows(true));
        assert!(!Alliances.shows(false) && Alliances.shows(true));
        assert!(PlayersAndAlliances.shows(false) && PlayersAndAlliances.shows(true));
        assert_eq!(PlayersAndAlliances.axis_group(true).index(), 1);
        assert_eq!(PlayersAndAlliances.axis_group(false).index(), 0);
        assert_eq!(Alliances.axis_group(true), AxisGroup::Primary);
        assert_eq!(ViewMode::default(), Players);
    }

    #[test]
    fn mode_names() {
        let names: Vec<_> = ViewMode::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["Players", "Alliances", "Players And Alliances"]);
    }

    #[test]
    fn statistics_keep_insertion_order() {
        let production = StatisticKind::new("Production", "PUs");
        let units = StatisticKind::new("Units", "Units");
        let mut stats: Statistics = [(units.clone(), TimeSeriesTable::new()),
                                     (production.clone(), TimeSeriesTable::new())]
            .into_iter().collect();
        let mut table = TimeSeriesTable::new();
        table.insert("Germans", 1, 40.);
        stats.insert(units.clone(), table);
        assert_eq!(stats.kinds().collect::<Vec<_>>(), [&units, &production]);
        assert_eq!(stats.get(&units).map(|t| t.len()), Some(1));
        assert_eq!(stats.len(), 2);
    }
}
