use cavern_telemetry::RoomStatCollection;

use crate::preference::as_f64;

/// Share of the feature budget taken by enemies: `total_enemies / max_feature_count`.
///
/// Returns `0.0` for an absent room or a zero budget.
#[must_use]
pub fn difficulty(stats: Option<&RoomStatCollection>, max_feature_count: u32) -> f64 {
    match stats {
        Some(room) if max_feature_count > 0 => {
            as_f64(room.total_enemies()) / f64::from(max_feature_count)
        }
        _ => 0.0,
    }
}

/// Fraction of enemy attacks that hit the player: `hits_taken / enemy_attacks`.
///
/// Returns `0.0` when no enemy attacked.
#[must_use]
pub fn dodge_rating(hits_taken: u32, enemy_attacks: u32) -> f64 {
    if enemy_attacks == 0 {
        0.0
    } else {
        f64::from(hits_taken) / f64::from(enemy_attacks)
    }
}

#[cfg(test)]
mod tests {
    use cavern_engine::{Seed, generation::FeatureParameters};

    use super::*;

    #[test]
    fn test_difficulty() {
        let seed = Seed::new(2);
        let room = RoomStatCollection::from_features(seed, &FeatureParameters::partition(seed, 3, 1));
        assert_eq!(difficulty(Some(&room), 6), 0.5);
        assert_eq!(difficulty(Some(&room), 0), 0.0);
        assert_eq!(difficulty(None, 6), 0.0);
    }

    #[test]
    fn test_dodge_rating() {
        assert_eq!(dodge_rating(3, 4), 0.75);
        assert_eq!(dodge_rating(0, 4), 0.0);
        assert_eq!(dodge_rating(5, 0), 0.0);
    }
}
