use serde::{Deserialize, Serialize};

/// Weapon category shared by player telemetry and room features.
///
/// Every enemy and obstacle is vulnerable to exactly one category, and every player
/// attack is made with one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Weapon {
    Fire,
    Beam,
    Wave,
}

impl Weapon {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Fire, Self::Beam, Self::Wave];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
