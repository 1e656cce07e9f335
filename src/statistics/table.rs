use std::collections::{BTreeMap, HashMap};

/// Values of one statistic indexed by entity (row) and round (column).
///
/// Rows keep the order in which their entity was first inserted;
/// within a row, values are ordered by round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    rows: Vec<Row>,
    index: HashMap<String, usize>, // entity → position in `rows`
}

/// The values of a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    entity: String,
    values: BTreeMap<u32, f64>,
}

impl Row {
    pub fn entity(&self) -> &str { &self.entity }

    /// Rounds having a value, in increasing order.
    pub fn rounds(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.keys().copied()
    }

    /// Values, ordered by round.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    pub fn get(&self, round: u32) -> Option<f64> { self.values.get(&round).copied() }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

impl TimeSeriesTable {
    pub fn new() -> Self { Self::default() }

    /// Set the value of `entity` at `round`, returning the previous one.
    pub fn insert(&mut self, entity: &str, round: u32, value: f64) -> Option<f64> {
        let i = match self.index.get(entity) {
            Some(&i) => i,
            None => {
                self.index.insert(entity.to_owned(), self.rows.len());
                self.rows.push(Row { entity: entity.to_owned(),
                                     values: BTreeMap::new() });
                self.rows.len() - 1
            }
        };
        self.rows[i].values.insert(round, value)
    }

    pub fn row(&self, entity: &str) -> Option<&Row> {
        self.index.get(entity).map(|&i| &self.rows[i])
    }

    pub fn get(&self, entity: &str, round: u32) -> Option<f64> {
        self.row(entity).and_then(|r| r.get(round))
    }

    /// Rows in their natural order.
    pub fn rows(&self) -> std::slice::Iter<'_, Row> { self.rows.iter() }

    /// Number of rows.
    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl<'a> FromIterator<(&'a str, u32, f64)> for TimeSeriesTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32, f64)>>(iter: I) -> Self {
        let mut table = TimeSeriesTable::new();
        for (entity, round, value) in iter { table.insert(entity, round, value); }
        table
    }
}
