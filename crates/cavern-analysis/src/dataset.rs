//! Labeled (player, room) examples and their CSV file format.
//!
//! # File Format
//!
//! One header row followed by one row per [`DatasetEntry`]:
//!
//! ```text
//! SeedPlayer,SeedRoom,FireUses,FireHits,...,EnemyAttacks,FireEnemies,...,WaveObstacles,GroundTruth
//! 8731542,1204981,12,5,...,3,2,...,0,1
//! ```
//!
//! Player stat columns follow [`PlayerStat::ALL`] and room stat columns follow
//! [`RoomStat::ALL`]. `GroundTruth` is `1` for rooms the player likes and `0`
//! otherwise. Reading rejects files whose header differs from the expected one.

use std::io;

use cavern_classifier::gaussian_nb::LabeledSample;
use cavern_engine::Seed;
use cavern_evaluator::{PreferenceTriple, SimilarityError};
use cavern_telemetry::{PlayerStat, PlayerStatCollection, RoomStat, RoomStatCollection};

const SEED_PLAYER: &str = "SeedPlayer";
const SEED_ROOM: &str = "SeedRoom";
const GROUND_TRUTH: &str = "GroundTruth";

/// Error reading or writing a dataset file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("CSV error: {_0}")]
    Csv(csv::Error),
    #[display("Unexpected dataset header: expected `{expected}`, found `{actual}`")]
    HeaderMismatch { expected: String, actual: String },
    #[display("Row {row}: expected {expected} fields, found {actual}")]
    FieldCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("Row {row}: invalid value `{value}` in column {column}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One labeled example: a player profile, a candidate room and whether the
/// player likes the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub player: PlayerStatCollection,
    pub room: RoomStatCollection,
    pub ground_truth: bool,
}

impl DatasetEntry {
    #[must_use]
    pub fn player_seed(&self) -> Seed {
        self.player.seed()
    }

    #[must_use]
    pub fn room_seed(&self) -> Seed {
        self.room.seed()
    }

    #[must_use]
    pub fn player_triple(&self) -> PreferenceTriple {
        PreferenceTriple::player(Some(&self.player))
    }

    #[must_use]
    pub fn room_triple(&self) -> PreferenceTriple {
        PreferenceTriple::room(Some(&self.room))
    }

    /// Cosine similarity of the player and room triples, labeled with the ground truth.
    pub fn labeled_sample(&self) -> Result<LabeledSample, SimilarityError> {
        LabeledSample::from_triples(&self.player_triple(), &self.room_triple(), self.ground_truth)
    }
}

/// Column names of the dataset file, in order.
#[must_use]
pub fn dataset_header() -> Vec<&'static str> {
    let mut header = vec![SEED_PLAYER, SEED_ROOM];
    header.extend(PlayerStat::ALL.map(PlayerStat::name));
    header.extend(RoomStat::ALL.map(RoomStat::name));
    header.push(GROUND_TRUTH);
    header
}

/// Writes `entries` as CSV, header first.
pub fn write_dataset<'a, W, I>(writer: W, entries: I) -> Result<(), DatasetError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a DatasetEntry>,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(dataset_header())?;
    for entry in entries {
        let mut record = vec![
            entry.player_seed().to_string(),
            entry.room_seed().to_string(),
        ];
        record.extend(PlayerStat::ALL.map(|s| entry.player.get(s).to_string()));
        record.extend(RoomStat::ALL.map(|s| entry.room.get(s).to_string()));
        record.push(u8::from(entry.ground_truth).to_string());
        writer.write_record(&record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads a dataset written by [`write_dataset`].
pub fn read_dataset<R>(reader: R) -> Result<Vec<DatasetEntry>, DatasetError>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let expected = dataset_header();
    let actual = reader.headers()?.clone();
    if actual.iter().map(str::trim).ne(expected.iter().copied()) {
        return Err(DatasetError::HeaderMismatch {
            expected: expected.join(","),
            actual: actual.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut entries = vec![];
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // header is row 1
        let row = i + 2;
        if record.len() != expected.len() {
            return Err(DatasetError::FieldCount {
                row,
                expected: expected.len(),
                actual: record.len(),
            });
        }
        let mut fields = record.iter().zip(expected.iter().copied());
        let mut next_field = || {
            // lengths were checked above
            let (value, column) = fields.next().unwrap_or(("", GROUND_TRUTH));
            (value.trim(), column)
        };

        let player_seed = parse_field::<u64>(row, next_field())?;
        let room_seed = parse_field::<u64>(row, next_field())?;
        let mut player = PlayerStatCollection::new(Seed::new(player_seed));
        for stat in PlayerStat::ALL {
            player.set(stat, parse_field(row, next_field())?);
        }
        let mut room = RoomStatCollection::new(Seed::new(room_seed));
        for stat in RoomStat::ALL {
            room.set(stat, parse_field(row, next_field())?);
        }
        let ground_truth = match next_field() {
            ("1", _) => true,
            ("0", _) => false,
            (value, column) => {
                return Err(DatasetError::InvalidField {
                    row,
                    column,
                    value: value.to_owned(),
                });
            }
        };
        entries.push(DatasetEntry {
            player,
            room,
            ground_truth,
        });
    }
    Ok(entries)
}

fn parse_field<T>(row: usize, (value, column): (&str, &'static str)) -> Result<T, DatasetError>
where
    T: std::str::FromStr,
{
    value.parse().map_err(|_| DatasetError::InvalidField {
        row,
        column,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use cavern_engine::{Weapon, generation::FeatureParameters};

    use super::*;

    fn entry(player_seed: u64, room_seed: u64, ground_truth: bool) -> DatasetEntry {
        let mut player = PlayerStatCollection::new(Seed::new(player_seed));
        player.set(PlayerStat::FireUses, 10);
        player.set(PlayerStat::FireHits, 4);
        player.set(PlayerStat::WaveUses, 3);
        player.set(PlayerStat::WaveHits, 3);
        player.set(PlayerStat::EnemyAttacks, 7);
        player.set(PlayerStat::HitsTaken, 2);
        let seed = Seed::new(room_seed);
        let room = RoomStatCollection::from_features(seed, &FeatureParameters::partition(seed, 5, 2));
        DatasetEntry {
            player,
            room,
            ground_truth,
        }
    }

    fn write_to_string(entries: &[DatasetEntry]) -> String {
        let mut buf = vec![];
        write_dataset(&mut buf, entries).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header() {
        let csv = write_to_string(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "SeedPlayer,SeedRoom,FireUses,FireHits,BeamUses,BeamHits,WaveUses,WaveHits,\
             HitsTaken,EnemyAttacks,FireEnemies,BeamEnemies,WaveEnemies,FireObstacles,\
             BeamObstacles,WaveObstacles,GroundTruth"
        );
    }

    #[test]
    fn test_row_layout() {
        let csv = write_to_string(&[entry(11, 22, true)]);
        let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row.len(), 17);
        assert_eq!(&row[..4], ["11", "22", "10", "4"]);
        assert_eq!(row[16], "1");
    }

    #[test]
    fn test_read_back() {
        let entries = vec![entry(1, 2, true), entry(3, 4, false)];
        let csv = write_to_string(&entries);
        let read = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(read, entries);
        assert_eq!(read[0].player.hits(Weapon::Wave), 3);
        assert_eq!(read[1].room.total_enemies(), 5);
    }

    #[test]
    fn test_rejects_wrong_header() {
        let err = read_dataset("SeedPlayer,SeedRoom,GroundTruth\n1,2,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_rejects_malformed_rows() {
        let header = dataset_header().join(",");

        let bad_value = format!("{header}\n1,2,x,0,0,0,0,0,0,0,0,0,0,0,0,0,1\n");
        let err = read_dataset(bad_value.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidField {
                row: 2,
                column: "FireUses",
                ..
            }
        ));

        let bad_label = format!("{header}\n1,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,2\n");
        let err = read_dataset(bad_label.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidField {
                column: "GroundTruth",
                ..
            }
        ));
    }

    #[test]
    fn test_labeled_sample() {
        let entry = entry(5, 6, false);
        let sample = entry.labeled_sample().unwrap();
        assert!(!sample.accepted);
        assert!(sample.feature.abs() <= 1.0 + 1e-12);

        let silent = DatasetEntry {
            player: PlayerStatCollection::new(Seed::new(0)),
            ..entry
        };
        assert!(silent.labeled_sample().is_err());
    }
}
