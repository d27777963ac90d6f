use std::{collections::BTreeMap, fmt, sync::mpsc};

/// Error returned when a stat name is outside a collection's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown stat `{name}`")]
pub struct StatNotFound {
    pub name: String,
}

/// A named non-negative counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    name: String,
    value: u32,
}

impl Stat {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

/// Report of a single stat mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChange {
    pub name: String,
    pub old: u32,
    pub new: u32,
}

impl StatChange {
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.old != self.new
    }

    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.new) - i64::from(self.old)
    }
}

/// A closed vocabulary of named counters.
///
/// The set of names is fixed when the collection is created; every lookup or
/// mutation of a name outside it fails with [`StatNotFound`]. Stats iterate in
/// the order the names were given.
///
/// # Change notification
///
/// Every mutation returns a [`StatChange`] and publishes a copy to each receiver
/// opened with [`subscribe`](Self::subscribe). Receivers that have been dropped
/// are forgotten on the next publish. A clone of a collection copies the values
/// but starts with no subscribers.
///
/// ```
/// use cavern_telemetry::StatCollection;
///
/// let mut stats = StatCollection::new(["Kills", "Deaths"]);
/// let changes = stats.subscribe();
///
/// stats.increment("Kills")?;
/// stats.set("Deaths", 3)?;
/// assert_eq!(stats.value("Kills")?, 1);
/// assert!(stats.increment("Score").is_err());
///
/// let published: Vec<_> = changes.try_iter().map(|c| (c.name, c.new)).collect();
/// assert_eq!(published, [("Kills".to_owned(), 1), ("Deaths".to_owned(), 3)]);
/// # Ok::<(), cavern_telemetry::StatNotFound>(())
/// ```
pub struct StatCollection {
    stats: Vec<Stat>,
    subscribers: Vec<mpsc::Sender<StatChange>>,
}

impl fmt::Debug for StatCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.stats.iter().map(|s| (&s.name, s.value)))
            .finish()
    }
}

impl Clone for StatCollection {
    fn clone(&self) -> Self {
        Self {
            stats: self.stats.clone(),
            subscribers: vec![],
        }
    }
}

impl PartialEq for StatCollection {
    fn eq(&self, other: &Self) -> bool {
        self.stats == other.stats
    }
}

impl Eq for StatCollection {}

impl StatCollection {
    /// Creates a collection with every stat at zero.
    ///
    /// Duplicate names are kept once, at their first position.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stats: Vec<Stat> = vec![];
        for name in names {
            let name = name.into();
            if stats.iter().all(|s| s.name != name) {
                stats.push(Stat { name, value: 0 });
            }
        }
        Self {
            stats,
            subscribers: vec![],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_ok()
    }

    pub fn get(&self, name: &str) -> Result<&Stat, StatNotFound> {
        let index = self.index_of(name)?;
        Ok(&self.stats[index])
    }

    pub fn value(&self, name: &str) -> Result<u32, StatNotFound> {
        self.get(name).map(Stat::value)
    }

    pub fn increment(&mut self, name: &str) -> Result<StatChange, StatNotFound> {
        let index = self.index_of(name)?;
        Ok(self.increment_at(index))
    }

    /// Decrements a stat, saturating at zero.
    pub fn decrement(&mut self, name: &str) -> Result<StatChange, StatNotFound> {
        let index = self.index_of(name)?;
        Ok(self.decrement_at(index))
    }

    pub fn set(&mut self, name: &str, value: u32) -> Result<StatChange, StatNotFound> {
        let index = self.index_of(name)?;
        Ok(self.set_at(index, value))
    }

    /// Zeroes every stat, keeping the vocabulary.
    ///
    /// Returns (and publishes) a change for every stat that was not already zero.
    pub fn reset(&mut self) -> Vec<StatChange> {
        let nonzero: Vec<usize> = (0..self.stats.len())
            .filter(|&index| self.stats[index].value != 0)
            .collect();
        nonzero
            .into_iter()
            .map(|index| self.set_at(index, 0))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stat> + '_ {
        self.stats.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stats.iter().map(Stat::name)
    }

    /// Returns the current values keyed by name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, u32> {
        self.stats
            .iter()
            .map(|s| (s.name.clone(), s.value))
            .collect()
    }

    /// Opens a channel receiving every subsequent [`StatChange`].
    pub fn subscribe(&mut self) -> mpsc::Receiver<StatChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn value_at(&self, index: usize) -> u32 {
        self.stats[index].value
    }

    pub(crate) fn increment_at(&mut self, index: usize) -> StatChange {
        let new = self.stats[index].value.saturating_add(1);
        self.set_at(index, new)
    }

    pub(crate) fn decrement_at(&mut self, index: usize) -> StatChange {
        let new = self.stats[index].value.saturating_sub(1);
        self.set_at(index, new)
    }

    pub(crate) fn set_at(&mut self, index: usize, value: u32) -> StatChange {
        let stat = &mut self.stats[index];
        let old = stat.value;
        stat.value = value;
        let change = StatChange {
            name: stat.name.clone(),
            old,
            new: value,
        };
        self.publish(&change);
        change
    }

    fn index_of(&self, name: &str) -> Result<usize, StatNotFound> {
        self.stats
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StatNotFound {
                name: name.to_owned(),
            })
    }

    fn publish(&mut self, change: &StatChange) {
        tracing::trace!(name = %change.name, old = change.old, new = change.new, "stat changed");
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> StatCollection {
        StatCollection::new(["A", "B", "C"])
    }

    #[test]
    fn test_unknown_name() {
        let mut stats = collection();
        let err = stats.increment("D").unwrap_err();
        assert_eq!(err.name, "D");
        assert_eq!(err.to_string(), "unknown stat `D`");
        assert!(stats.get("D").is_err());
        assert!(stats.set("D", 1).is_err());
        assert!(!stats.contains("D"));
    }

    #[test]
    fn test_mutations_report_changes() {
        let mut stats = collection();
        let change = stats.increment("A").unwrap();
        assert_eq!(
            change,
            StatChange {
                name: "A".into(),
                old: 0,
                new: 1
            }
        );
        let change = stats.set("B", 5).unwrap();
        assert_eq!(change.delta(), 5);
        let change = stats.decrement("B").unwrap();
        assert_eq!((change.old, change.new), (5, 4));
        assert_eq!(stats.value("B").unwrap(), 4);
    }

    #[test]
    fn test_decrement_saturates_at_zero() {
        let mut stats = collection();
        let change = stats.decrement("C").unwrap();
        assert_eq!(change.new, 0);
        assert!(!change.is_changed());
        assert_eq!(stats.value("C").unwrap(), 0);
    }

    #[test]
    fn test_reset_keeps_vocabulary() {
        let mut stats = collection();
        stats.set("A", 2).unwrap();
        stats.set("C", 7).unwrap();
        let changes = stats.reset();
        let names: Vec<_> = changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.value() == 0));
    }

    #[test]
    fn test_vocabulary_order_and_duplicates() {
        let stats = StatCollection::new(["Z", "A", "Z", "M"]);
        assert_eq!(stats.names().collect::<Vec<_>>(), ["Z", "A", "M"]);
        assert_eq!(stats.snapshot().keys().collect::<Vec<_>>(), ["A", "M", "Z"]);
    }

    #[test]
    fn test_subscribers_receive_changes() {
        let mut stats = collection();
        let first = stats.subscribe();
        let second = stats.subscribe();
        stats.increment("A").unwrap();
        stats.increment("A").unwrap();
        assert_eq!(first.try_iter().map(|c| c.new).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(second.try_iter().count(), 2);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut stats = collection();
        let kept = stats.subscribe();
        drop(stats.subscribe());
        assert_eq!(stats.subscriber_count(), 2);
        stats.increment("B").unwrap();
        assert_eq!(stats.subscriber_count(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }

    #[test]
    fn test_clone_has_no_subscribers() {
        let mut stats = collection();
        let rx = stats.subscribe();
        stats.set("A", 3).unwrap();
        let mut cloned = stats.clone();
        assert_eq!(cloned, stats);
        assert_eq!(cloned.subscriber_count(), 0);
        cloned.increment("A").unwrap();
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(cloned.value("A").unwrap(), 4);
        assert_eq!(stats.value("A").unwrap(), 3);
    }
}
