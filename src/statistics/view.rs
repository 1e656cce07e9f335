use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use log::{debug, info, warn};
use rgb::RGB8;

use crate::assigner::{is_reserved, ColorAssigner};
use crate::config::ColorSource;
use crate::error::{Error, Result};
use super::{AllianceMembership, AxisGroup, StatisticKind, Statistics, ViewMode};

/// Shown while the aggregation has not completed.
pub const LOADING_MESSAGE: &str = "Computing statistics from game history...";

/// Name of the thread running the aggregation.
pub const AGGREGATION_THREAD: &str = "game-stats-calc";

/// Whether the aggregation result has been received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Empty,
    Ready,
}

/// A series to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSeries {
    pub entity: String,
    pub rounds: Vec<u32>,
    pub values: Vec<f64>,
    pub color: RGB8,
    pub axis: AxisGroup,
}

/// A row left out of a projection because it could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionWarning {
    pub entity: String,
    pub message: String,
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

/// Visible series of one statistic, plus the rows that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub series: Vec<ProjectedSeries>,
    pub warnings: Vec<ProjectionWarning>,
}

impl Projection {
    pub fn is_empty(&self) -> bool { self.series.is_empty() }
}

/// Cached aggregation result, filtered on demand by a [`ViewMode`].
///
/// The cache is written once, possibly from another thread (see
/// [`Self::completion_sink`]), and never changes afterwards.  Changing
/// the mode only changes what [`Self::projected_series`] returns.
pub struct StatisticsView<M> {
    cache: Arc<OnceLock<Statistics>>,
    mode: ViewMode,
    membership: M,
}

/// One-shot handle delivering the aggregation result to its view.
pub struct AggregationSink {
    cache: Arc<OnceLock<Statistics>>,
}

fn store(cache: &OnceLock<Statistics>, result: Statistics) -> Result<()> {
    let charts = result.len();
    if cache.set(result).is_err() {
        return Err(Error::AlreadyComplete);
    }
    info!("cached statistics for {charts} chart(s)");
    Ok(())
}

impl AggregationSink {
    /// Deliver `result`.  Fails with [`Error::AlreadyComplete`] if the
    /// view already holds a result, which is then left unchanged.
    pub fn deliver(self, result: Statistics) -> Result<()> {
        store(&self.cache, result)
    }
}

/// Run `aggregate` once on a background thread and deliver its result
/// through `sink`.  If `aggregate` fails, the failure is logged and the
/// view stays empty.
pub fn spawn_aggregation<F, E>(sink: AggregationSink, aggregate: F)
                               -> Result<JoinHandle<()>>
where F: FnOnce() -> Result<Statistics, E> + Send + 'static,
      E: fmt::Display + 'static {
    let handle = thread::Builder::new()
        .name(AGGREGATION_THREAD.to_owned())
        .spawn(move || match aggregate() {
            Ok(statistics) => {
                if let Err(e) = sink.deliver(statistics) {
                    warn!("discarding statistics: {e}");
                }
            }
            Err(e) => warn!("statistics aggregation failed: {e}"),
        })?;
    Ok(handle)
}

impl<M: AllianceMembership> StatisticsView<M> {
    /// Empty view, showing [`ViewMode::Players`].
    pub fn new(membership: M) -> Self {
        Self { cache: Arc::new(OnceLock::new()),
               mode: ViewMode::default(),
               membership }
    }

    /// Handle to deliver the aggregation result from another thread.
    pub fn completion_sink(&self) -> AggregationSink {
        AggregationSink { cache: Arc::clone(&self.cache) }
    }

    /// Store the aggregation result.  See [`AggregationSink::deliver`].
    pub fn on_aggregation_complete(&self, result: Statistics) -> Result<()> {
        store(&self.cache, result)
    }

    pub fn state(&self) -> ViewState {
        if self.is_ready() { ViewState::Ready } else { ViewState::Empty }
    }

    pub fn is_ready(&self) -> bool { self.cache.get().is_some() }

    pub fn view_mode(&self) -> ViewMode { self.mode }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        debug!("statistics view mode set to {mode}");
        self.mode = mode;
    }

    /// Charted statistics, in order (none before the result arrived).
    pub fn kinds(&self) -> Vec<StatisticKind> {
        self.cache.get()
            .map(|s| s.kinds().cloned().collect())
            .unwrap_or_default()
    }

    /// Titles of the value axes of `kind` in the current mode, indexed
    /// by [`AxisGroup::index`].
    pub fn axis_titles(&self, kind: &StatisticKind) -> Vec<String> {
        match self.mode {
            ViewMode::PlayersAndAlliances => vec![
                format!("{} - {}", kind.axis_label, ViewMode::Players),
                format!("{} - {}", kind.axis_label, ViewMode::Alliances)],
            _ => vec![kind.axis_label.clone()],
        }
    }

    /// Series of `kind` visible in the current mode, in row order, with
    /// their colors taken from `colors`.
    ///
    /// Before the aggregation completed, or for an unknown `kind`, the
    /// projection is empty.  Rows whose membership cannot be determined
    /// are dropped and reported in [`Projection::warnings`].  Errors
    /// only come from malformed configured colors.
    pub fn projected_series<S: ColorSource>(
        &self, kind: &StatisticKind, colors: &mut ColorAssigner<'_, S>,
    ) -> Result<Projection> {
        let mut projection = Projection::default();
        let Some(table) = self.cache.get().and_then(|s| s.get(kind)) else {
            return Ok(projection);
        };
        for row in table.rows() {
            let entity = row.entity();
            if is_reserved(entity) {
                warn!("dropping reserved {entity:?} from {:?}", kind.title);
                projection.warnings.push(ProjectionWarning {
                    entity: entity.to_owned(),
                    message: "reserved name cannot be charted".to_owned() });
                continue;
            }
            let is_alliance = match self.membership.is_alliance_group(entity) {
                Ok(a) => a,
                Err(e) => {
                    warn!("dropping {entity:?} from {:?}: {e}", kind.title);
                    projection.warnings.push(ProjectionWarning {
                        entity: entity.to_owned(), message: e.to_string() });
                    continue;
                }
            };
            if !self.mode.shows(is_alliance) { continue }
            projection.series.push(ProjectedSeries {
                entity: entity.to_owned(),
                rounds: row.rounds().collect(),
                values: row.values().collect(),
                color: colors.color_for(entity)?,
                axis: self.mode.axis_group(is_alliance),
            });
        }
        debug!("{:?} in mode {}: {} series, {} dropped", kind.title, self.mode,
               projection.series.len(), projection.warnings.len());
        Ok(projection)
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use super::*;
    use crate::config::Properties;
    use crate::statistics::TimeSeriesTable;

    fn production() -> StatisticKind { StatisticKind::new("Production", "PUs") }

    fn view() -> StatisticsView<HashSet<String>> {
        StatisticsView::new(["Allies".to_owned()].into_iter().collect())
    }

    fn stats() -> Statistics {
        let table: TimeSeriesTable = [("Germany", 1, 40.), ("Allies", 1, 70.),
                                      ("Germany", 2, 42.), ("Allies", 2, 66.)]
            .into_iter().collect();
        [(production(), table)].into_iter().collect()
    }

    fn entities(p: &Projection) -> Vec<(&str, usize)> {
        p.series.iter().map(|s| (s.entity.as_str(), s.axis.index())).collect()
    }

    #[test]
    fn empty_before_completion() {
        let view = view();
        let mut colors = ColorAssigner::new(Properties::new());
        assert_eq!(view.state(), ViewState::Empty);
        assert!(view.projected_series(&production(), &mut colors).unwrap().is_empty());
        assert!(view.kinds().is_empty());
        assert_eq!(colors.palette_remaining(), 7);
    }

    #[test]
    fn filters_by_mode() {
        let mut view = view();
        let mut colors = ColorAssigner::new(Properties::new());
        view.on_aggregation_complete(stats()).unwrap();
        assert_eq!(view.state(), ViewState::Ready);
        let p = view.projected_series(&production(), &mut colors).unwrap();
        assert_eq!(entities(&p), [("Germany", 0)]);
        assert_eq!(p.series[0].rounds, [1, 2]);
        assert_eq!(p.series[0].values, [40., 42.]);
        view.set_view_mode(ViewMode::Alliances);
        let p = view.projected_series(&production(), &mut colors).unwrap();
        assert_eq!(entities(&p), [("Allies", 0)]);
        view.set_view_mode(ViewMode::PlayersAndAlliances);
        let p = view.projected_series(&production(), &mut colors).unwrap();
        assert_eq!(entities(&p), [("Germany", 0), ("Allies", 1)]);
        assert!(p.warnings.is_empty());
    }

    #[test]
    fn unknown_kind_is_empty() {
        let view = view();
        let mut colors = ColorAssigner::new(Properties::new());
        view.on_aggregation_complete(stats()).unwrap();
        let units = StatisticKind::new("Units", "Units");
        assert!(view.projected_series(&units, &mut colors).unwrap().is_empty());
    }

    #[test]
    fn second_delivery_ignored() {
        let view = view();
        view.on_aggregation_complete(stats()).unwrap();
        assert!(matches!(view.completion_sink().deliver(Statistics::new()),
                         Err(Error::AlreadyComplete)));
        assert_eq!(view.kinds(), [production()]);
    }

    #[test]
    fn axis_titles_follow_mode() {
        let mut view = view();
        assert_eq!(view.axis_titles(&production()), ["PUs"]);
        view.set_view_mode(ViewMode::PlayersAndAlliances);
        assert_eq!(view.axis_titles(&production()),
                   ["PUs - Players", "PUs - Alliances"]);
    }

    #[test]
    fn reserved_rows_are_not_colored() {
        let view = view();
        let mut colors = ColorAssigner::new(Properties::new());
        let table: TimeSeriesTable = [("Impassable", 1, 0.), ("Germany", 1, 40.)]
            .into_iter().collect();
        view.on_aggregation_complete([(production(), table)].into_iter().collect())
            .unwrap();
        let p = view.projected_series(&production(), &mut colors).unwrap();
        assert_eq!(entities(&p), [("Germany", 0)]);
        assert_eq!(p.warnings.len(), 1);
        assert_eq!(p.warnings[0].entity, "Impassable");
    }

    #[test]
    fn malformed_color_aborts_projection() {
        let view = view();
        let mut props = Properties::new();
        props.set_color("Germany", "GG0000");
        let mut colors = ColorAssigner::new(props);
        view.on_aggregation_complete(stats()).unwrap();
        assert!(matches!(view.projected_series(&production(), &mut colors),
                         Err(Error::InvalidColor { .. })));
    }
}
