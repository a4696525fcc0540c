//! Survivor model.
//!
//! A [`Survivor`] is the server-confirmed record of one survivor in a settlement. Its numeric
//! stats are grouped in a [`StatBlock`] so that drafts and records can share the same
//! representation and be compared stat-by-stat through [`SurvivorSnapshot`].

use crate::constants::{
    INSANE_THRESHOLD, NEW_SURVIVOR_BIRTH, NEW_SURVIVOR_MOVEMENT, NEW_SURVIVOR_SURVIVAL,
};
use crate::draft::DisorderSlots;
use crate::reconcile::Keyed;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "M" | "m" => Ok(Gender::M),
            "F" | "f" => Ok(Gender::F),
            other => Err(CoreError::UnknownGender(other.to_owned())),
        }
    }
}

/// Closed set of survivor statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurvivorStatus {
    #[default]
    Alive,
    #[serde(rename = "Cannot depart")]
    CannotDepart,
    #[serde(rename = "Ceased to exist")]
    CeasedToExist,
    Dead,
    Retired,
}

impl SurvivorStatus {
    pub const ALL: [SurvivorStatus; 5] = [
        SurvivorStatus::Alive,
        SurvivorStatus::CannotDepart,
        SurvivorStatus::CeasedToExist,
        SurvivorStatus::Dead,
        SurvivorStatus::Retired,
    ];

    /// Wire representation, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurvivorStatus::Alive => "Alive",
            SurvivorStatus::CannotDepart => "Cannot depart",
            SurvivorStatus::CeasedToExist => "Ceased to exist",
            SurvivorStatus::Dead => "Dead",
            SurvivorStatus::Retired => "Retired",
        }
    }
}

impl fmt::Display for SurvivorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurvivorStatus {
    type Err = CoreError;

    /// Accepts the wire strings case-insensitively, with `-` or `_` standing in for spaces
    /// so `cannot-depart` works on a command line.
    fn from_str(s: &str) -> CoreResult<Self> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        SurvivorStatus::ALL
            .into_iter()
            .find(|status| status.as_str().to_ascii_lowercase() == normalised)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_owned()))
    }
}

/// Numeric survivor stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stat {
    HuntXp,
    Survival,
    Movement,
    Accuracy,
    Strength,
    Evasion,
    Luck,
    Speed,
    Lumi,
    Insanity,
    Torment,
    SystemicPressure,
    Courage,
    Understanding,
    Birth,
}

impl Stat {
    pub const ALL: [Stat; 15] = [
        Stat::HuntXp,
        Stat::Survival,
        Stat::Movement,
        Stat::Accuracy,
        Stat::Strength,
        Stat::Evasion,
        Stat::Luck,
        Stat::Speed,
        Stat::Lumi,
        Stat::Insanity,
        Stat::Torment,
        Stat::SystemicPressure,
        Stat::Courage,
        Stat::Understanding,
        Stat::Birth,
    ];

    /// Key used in records and in `statUpdates` of a patch.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Stat::HuntXp => "huntxp",
            Stat::Survival => "survival",
            Stat::Movement => "movement",
            Stat::Accuracy => "accuracy",
            Stat::Strength => "strength",
            Stat::Evasion => "evasion",
            Stat::Luck => "luck",
            Stat::Speed => "speed",
            Stat::Lumi => "lumi",
            Stat::Insanity => "insanity",
            Stat::Torment => "torment",
            Stat::SystemicPressure => "systemicPressure",
            Stat::Courage => "courage",
            Stat::Understanding => "understanding",
            Stat::Birth => "birth",
        }
    }

    /// Human-readable name used in validation messages and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Stat::HuntXp => "Hunt XP",
            Stat::Survival => "Survival",
            Stat::Movement => "Movement",
            Stat::Accuracy => "Accuracy",
            Stat::Strength => "Strength",
            Stat::Evasion => "Evasion",
            Stat::Luck => "Luck",
            Stat::Speed => "Speed",
            Stat::Lumi => "Lumi",
            Stat::Insanity => "Insanity",
            Stat::Torment => "Torment",
            Stat::SystemicPressure => "Systemic Pressure",
            Stat::Courage => "Courage",
            Stat::Understanding => "Understanding",
            Stat::Birth => "Birth",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

impl FromStr for Stat {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.wire_key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| CoreError::UnknownStat(s.to_owned()))
    }
}

/// All numeric stats of a survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub birth: i32,
    pub huntxp: i32,
    pub survival: i32,
    pub movement: i32,
    pub accuracy: i32,
    pub strength: i32,
    pub evasion: i32,
    pub luck: i32,
    pub speed: i32,
    pub lumi: i32,
    pub insanity: i32,
    pub torment: i32,
    pub systemic_pressure: i32,
    pub courage: i32,
    pub understanding: i32,
}

impl StatBlock {
    /// Current value of `stat`.
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::HuntXp => self.huntxp,
            Stat::Survival => self.survival,
            Stat::Movement => self.movement,
            Stat::Accuracy => self.accuracy,
            Stat::Strength => self.strength,
            Stat::Evasion => self.evasion,
            Stat::Luck => self.luck,
            Stat::Speed => self.speed,
            Stat::Lumi => self.lumi,
            Stat::Insanity => self.insanity,
            Stat::Torment => self.torment,
            Stat::SystemicPressure => self.systemic_pressure,
            Stat::Courage => self.courage,
            Stat::Understanding => self.understanding,
            Stat::Birth => self.birth,
        }
    }

    /// Returns a copy with `stat` set to `value`.
    #[must_use]
    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        let slot = match stat {
            Stat::HuntXp => &mut self.huntxp,
            Stat::Survival => &mut self.survival,
            Stat::Movement => &mut self.movement,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Strength => &mut self.strength,
            Stat::Evasion => &mut self.evasion,
            Stat::Luck => &mut self.luck,
            Stat::Speed => &mut self.speed,
            Stat::Lumi => &mut self.lumi,
            Stat::Insanity => &mut self.insanity,
            Stat::Torment => &mut self.torment,
            Stat::SystemicPressure => &mut self.systemic_pressure,
            Stat::Courage => &mut self.courage,
            Stat::Understanding => &mut self.understanding,
            Stat::Birth => &mut self.birth,
        };
        *slot = value;
        self
    }
}

impl Default for StatBlock {
    /// Stats of a freshly created survivor.
    fn default() -> Self {
        Self {
            birth: NEW_SURVIVOR_BIRTH,
            huntxp: 0,
            survival: NEW_SURVIVOR_SURVIVAL,
            movement: NEW_SURVIVOR_MOVEMENT,
            accuracy: 0,
            strength: 0,
            evasion: 0,
            luck: 0,
            speed: 0,
            lumi: 0,
            insanity: 0,
            torment: 0,
            systemic_pressure: 0,
            courage: 0,
            understanding: 0,
        }
    }
}

/// A survivor as returned by the settlement API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survivor {
    pub id: String,
    pub settlement_id: String,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub status: SurvivorStatus,
    #[serde(flatten)]
    pub stats: StatBlock,
    #[serde(default)]
    pub disorders: Vec<String>,
}

impl Survivor {
    /// Whether insanity has reached the threshold at which a survivor counts as insane.
    pub fn is_insane(&self) -> bool {
        self.stats.insanity >= INSANE_THRESHOLD
    }
}

impl Keyed for Survivor {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Read access shared by server records and local drafts.
///
/// The diff engine compares two snapshots through this trait only, so any two implementors
/// are guaranteed to expose the same field schema.
pub trait SurvivorSnapshot {
    fn stat(&self, stat: Stat) -> i32;
    fn status(&self) -> SurvivorStatus;
    fn disorder_slots(&self) -> DisorderSlots;
}

impl SurvivorSnapshot for Survivor {
    fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    fn status(&self) -> SurvivorStatus {
        self.status
    }

    /// Records carry a plain list; the first slots are filled in order.
    fn disorder_slots(&self) -> DisorderSlots {
        DisorderSlots::from_list(&self.disorders)
    }
}

/// Body of `POST /api/settlements/{settlementId}/survivors`.
///
/// The create endpoint spells systemic pressure in lower case, unlike records and patches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvivor {
    pub name: String,
    pub gender: Gender,
    pub birth: i32,
    pub huntxp: i32,
    pub survival: i32,
    #[serde(rename = "systemicpressure")]
    pub systemic_pressure: i32,
    pub movement: i32,
    pub accuracy: i32,
    pub strength: i32,
    pub evasion: i32,
    pub luck: i32,
    pub speed: i32,
    pub lumi: i32,
    pub insanity: i32,
    pub torment: i32,
    pub courage: i32,
    pub understanding: i32,
    pub settlement_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disorders: Vec<String>,
}

impl NewSurvivor {
    /// Builds a creation body from validated draft values.
    ///
    /// # Arguments
    ///
    /// * `settlement_id` - Settlement the survivor joins
    /// * `name` - Trimmed survivor name
    /// * `gender` - Survivor gender
    /// * `stats` - Every stat including birth, copied into the flat wire layout
    /// * `disorders` - Collapsed disorder ids; omitted from the body when empty
    pub fn new(
        settlement_id: impl Into<String>,
        name: impl Into<String>,
        gender: Gender,
        stats: &StatBlock,
        disorders: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            gender,
            birth: stats.birth,
            huntxp: stats.huntxp,
            survival: stats.survival,
            systemic_pressure: stats.systemic_pressure,
            movement: stats.movement,
            accuracy: stats.accuracy,
            strength: stats.strength,
            evasion: stats.evasion,
            luck: stats.luck,
            speed: stats.speed,
            lumi: stats.lumi,
            insanity: stats.insanity,
            torment: stats.torment,
            courage: stats.courage,
            understanding: stats.understanding,
            settlement_id: settlement_id.into(),
            disorders,
        }
    }
}
