//! Classification results and their JSON file format.
//!
//! A results file records one classification session:
//!
//! ```text
//! ResultsFile
//! ├─ algorithm ("AR" or "GNB")
//! ├─ created_at / updated_at
//! └─ entries: Vec<ResultEntry>
//!     ├─ level, deaths
//!     ├─ classification (1 accepted, 0 otherwise)
//!     ├─ ground_truth (1 liked, 0 otherwise)
//!     └─ player_stats / room_stats (name → value)
//! ```
//!
//! Entries are produced in bulk by [`BulkClassification`], an iterator that
//! classifies dataset entries one at a time and stops early once its
//! [`CancelFlag`] is set.

use std::collections::BTreeMap;

use cavern_classifier::{Classification, Classifier};
use cavern_engine::CancelFlag;
use cavern_evaluator::dodge_rating;
use cavern_stats::{confusion::ConfusionMatrix, descriptive};
use cavern_telemetry::PlayerStat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::dataset::DatasetEntry;

/// One classified room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub level: usize,
    /// `1` when the room was accepted, `0` when rejected or undecided.
    #[serde(deserialize_with = "deserialize_flag")]
    pub classification: u8,
    /// `1` when the player likes the room.
    #[serde(deserialize_with = "deserialize_flag")]
    pub ground_truth: u8,
    pub deaths: u32,
    pub player_stats: BTreeMap<String, u32>,
    pub room_stats: BTreeMap<String, u32>,
}

/// Accepts only `0` and `1`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > 1 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(u64::from(value)),
            &"0 or 1",
        ));
    }
    Ok(value)
}

impl ResultEntry {
    #[must_use]
    pub fn from_classified(entry: &DatasetEntry, classification: Classification, level: usize) -> Self {
        Self {
            level,
            classification: classification.code(),
            ground_truth: u8::from(entry.ground_truth),
            deaths: 0,
            player_stats: entry.player.collection().snapshot(),
            room_stats: entry.room.collection().snapshot(),
        }
    }

    #[must_use]
    pub const fn is_liked(&self) -> bool {
        self.ground_truth == 1
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.classification == 1
    }

    fn player_stat(&self, stat: PlayerStat) -> u32 {
        self.player_stats.get(stat.name()).copied().unwrap_or(0)
    }

    /// Dodge rating of the recorded player stats, `0.0` when absent.
    #[must_use]
    pub fn dodge_rating(&self) -> f64 {
        dodge_rating(
            self.player_stat(PlayerStat::HitsTaken),
            self.player_stat(PlayerStat::EnemyAttacks),
        )
    }
}

/// A classification session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub algorithm: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<ResultEntry>,
}

impl ResultsFile {
    #[must_use]
    pub fn new(algorithm: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            algorithm: algorithm.into(),
            created_at: now,
            updated_at: now,
            entries: vec![],
        }
    }

    #[must_use]
    pub fn from_classified<I>(algorithm: impl Into<String>, entries: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = ResultEntry>,
    {
        Self {
            entries: entries.into_iter().collect(),
            ..Self::new(algorithm, now)
        }
    }

    pub fn push(&mut self, entry: ResultEntry, now: DateTime<Utc>) {
        self.entries.push(entry);
        self.updated_at = now;
    }

    /// `(ground truth, classification)` pairs of every entry.
    pub fn pairs(&self) -> impl Iterator<Item = (bool, bool)> + '_ {
        self.entries.iter().map(|e| (e.is_liked(), e.is_accepted()))
    }

    #[must_use]
    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        ConfusionMatrix::from_pairs(self.pairs())
    }

    /// Mean dodge rating over all entries, `0.0` for an empty session.
    #[must_use]
    pub fn mean_dodge_rating(&self) -> f64 {
        let ratings: Vec<f64> = self.entries.iter().map(ResultEntry::dodge_rating).collect();
        descriptive::mean(&ratings)
    }
}

/// Iterator classifying dataset entries with any [`Classifier`].
///
/// ```
/// use cavern_analysis::{
///     config::DatasetConfig, generator::DatasetGenerator, results::BulkClassification,
/// };
/// use cavern_classifier::accept_reject::AcceptRejectClassifier;
/// use cavern_engine::Seed;
///
/// let config = DatasetConfig { profiles: 1, ..DatasetConfig::default() };
/// let entries: Vec<_> = DatasetGenerator::new(config, Seed::new(3)).collect();
///
/// let classifier = AcceptRejectClassifier::default();
/// let results: Vec<_> = BulkClassification::new(&classifier, &entries, 1).collect();
/// assert_eq!(results.len(), entries.len());
/// ```
#[derive(Debug)]
pub struct BulkClassification<'a, I> {
    classifier: &'a dyn Classifier,
    entries: I,
    level: usize,
    cancel: Option<CancelFlag>,
    classified: usize,
    undecided: usize,
    cancelled: bool,
}

impl<'a, I> BulkClassification<'a, I>
where
    I: Iterator<Item = &'a DatasetEntry>,
{
    pub fn new<T>(classifier: &'a dyn Classifier, entries: T, level: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            classifier,
            entries: entries.into_iter(),
            level,
            cancel: None,
            classified: 0,
            undecided: 0,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[must_use]
    pub fn classified(&self) -> usize {
        self.classified
    }

    /// Entries neither accepted nor rejected, such as GNB entries whose
    /// similarity feature is undefined.
    #[must_use]
    pub fn undecided(&self) -> usize {
        self.undecided
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl<'a, I> Iterator for BulkClassification<'a, I>
where
    I: Iterator<Item = &'a DatasetEntry>,
{
    type Item = ResultEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancelled {
            return None;
        }
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            tracing::info!(classified = self.classified, "bulk classification cancelled");
            self.cancelled = true;
            return None;
        }
        let entry = self.entries.next()?;
        let classification = self
            .classifier
            .classify(&entry.player_triple(), &entry.room_triple());
        if classification.is_undecided() {
            self.undecided += 1;
        }
        self.classified += 1;
        Some(ResultEntry::from_classified(entry, classification, self.level))
    }
}

#[cfg(test)]
mod tests {
    use cavern_classifier::{accept_reject::AcceptRejectClassifier, gaussian_nb::GnbModel};
    use cavern_engine::{Seed, generation::FeatureParameters};
    use cavern_telemetry::{PlayerStatCollection, RoomStatCollection};
    use chrono::TimeZone as _;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn dataset_entry(ground_truth: bool) -> DatasetEntry {
        let mut player = PlayerStatCollection::new(Seed::new(1));
        player.set(PlayerStat::FireUses, 4);
        player.set(PlayerStat::FireHits, 2);
        player.set(PlayerStat::EnemyAttacks, 4);
        player.set(PlayerStat::HitsTaken, 1);
        let seed = Seed::new(2);
        let room = RoomStatCollection::from_features(seed, &FeatureParameters::partition(seed, 3, 1));
        DatasetEntry {
            player,
            room,
            ground_truth,
        }
    }

    fn result(ground_truth: u8, classification: u8) -> ResultEntry {
        ResultEntry {
            level: 1,
            classification,
            ground_truth,
            deaths: 0,
            player_stats: BTreeMap::new(),
            room_stats: BTreeMap::new(),
        }
    }

    #[test]
    fn test_from_classified() {
        let entry = ResultEntry::from_classified(&dataset_entry(true), Classification::Undecided, 2);
        assert_eq!(entry.level, 2);
        assert_eq!(entry.classification, 0);
        assert_eq!(entry.ground_truth, 1);
        assert_eq!(entry.player_stats["FireHits"], 2);
        assert_eq!(entry.room_stats.values().sum::<u32>(), 4);
        assert_eq!(entry.dodge_rating(), 0.25);
    }

    #[test]
    fn test_pairs_and_matrix() {
        let file = ResultsFile::from_classified(
            "AR",
            [result(1, 1), result(1, 0), result(0, 0), result(0, 1), result(1, 1)],
            now(),
        );
        let matrix = file.confusion_matrix();
        assert_eq!(matrix.true_positive, 2);
        assert_eq!(matrix.false_negative, 1);
        assert_eq!(matrix.true_negative, 1);
        assert_eq!(matrix.false_positive, 1);
        assert_eq!(file.pairs().count(), 5);
    }

    #[test]
    fn test_mean_dodge_rating() {
        let mut file = ResultsFile::new("GNB", now());
        assert_eq!(file.mean_dodge_rating(), 0.0);
        let mut entry = result(1, 1);
        entry.player_stats.insert("HitsTaken".into(), 1);
        entry.player_stats.insert("EnemyAttacks".into(), 2);
        let later = now() + chrono::Duration::minutes(5);
        file.push(entry, later);
        file.push(result(0, 0), later);
        assert_eq!(file.mean_dodge_rating(), 0.25);
        assert_eq!(file.updated_at, later);
        assert_eq!(file.created_at, now());
    }

    #[test]
    fn test_json_layout() {
        let file = ResultsFile::from_classified("AR", [result(1, 0)], now());
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["algorithm"], "AR");
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
        assert_eq!(json["entries"][0]["ground_truth"], 1);
        assert_eq!(json["entries"][0]["classification"], 0);
        let back: ResultsFile = serde_json::from_value(json).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_rejects_flags_other_than_zero_or_one() {
        let file = ResultsFile::from_classified("AR", [result(1, 0)], now());
        for field in ["classification", "ground_truth"] {
            let mut json = serde_json::to_value(&file).unwrap();
            json["entries"][0][field] = serde_json::json!(2);
            let err = serde_json::from_value::<ResultsFile>(json).unwrap_err();
            assert!(err.to_string().contains("0 or 1"), "{err}");
        }
    }

    #[test]
    fn test_bulk_classification_counts_undecided() {
        let silent = DatasetEntry {
            player: PlayerStatCollection::new(Seed::new(5)),
            ..dataset_entry(false)
        };
        let entries = [dataset_entry(true), silent];
        let model = GnbModel::train(&[0.9, 0.95], &[0.1, 0.2]);
        let mut bulk = BulkClassification::new(&model, &entries, 1);
        let results: Vec<_> = bulk.by_ref().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(bulk.classified(), 2);
        assert_eq!(bulk.undecided(), 1);
        assert_eq!(results[1].classification, 0);
    }

    #[test]
    fn test_bulk_classification_cancel() {
        let entries = vec![dataset_entry(true); 5];
        let classifier = AcceptRejectClassifier::default();
        let cancel = CancelFlag::new();
        let mut bulk =
            BulkClassification::new(&classifier, &entries, 1).with_cancel_flag(cancel.clone());
        assert!(bulk.next().is_some());
        cancel.cancel();
        assert!(bulk.next().is_none());
        assert!(bulk.is_cancelled());
        assert_eq!(bulk.classified(), 1);
    }
}
