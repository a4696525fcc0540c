//! Field specifications for numeric survivor stats.

use crate::constants::{HUNT_XP_BOXES, MILESTONE_TRACK_BOXES};
use crate::survivor::Stat;
use std::ops::RangeInclusive;

/// A numeric field together with its valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub stat: Stat,
    pub range: RangeInclusive<i32>,
}

const ANY: RangeInclusive<i32> = i32::MIN..=i32::MAX;
const NON_NEGATIVE: RangeInclusive<i32> = 0..=i32::MAX;

impl FieldSpec {
    /// Creates a spec accepting `range`, both ends inclusive.
    pub const fn new(stat: Stat, range: RangeInclusive<i32>) -> Self {
        Self { stat, range }
    }

    pub fn wire_key(&self) -> &'static str {
        self.stat.wire_key()
    }

    /// Whether `value` lies inside the range.
    pub fn accepts(&self, value: i32) -> bool {
        self.range.contains(&value)
    }

    /// Human readable form of the range, used in validation messages.
    pub fn describe_range(&self) -> String {
        match (*self.range.start(), *self.range.end()) {
            (i32::MIN, i32::MAX) => "any integer".to_owned(),
            (min, i32::MAX) => format!("at least {min}"),
            (i32::MIN, max) => format!("at most {max}"),
            (min, max) => format!("between {min} and {max}"),
        }
    }
}

/// Stats compared by the diff engine when editing, in sheet order.
///
/// Birth is fixed once a survivor exists, so it is validated but never patched.
pub static SURVIVOR_EDIT_SPECS: [FieldSpec; 14] = [
    FieldSpec::new(Stat::HuntXp, 0..=HUNT_XP_BOXES),
    FieldSpec::new(Stat::Survival, NON_NEGATIVE),
    FieldSpec::new(Stat::Movement, ANY),
    FieldSpec::new(Stat::Accuracy, ANY),
    FieldSpec::new(Stat::Strength, ANY),
    FieldSpec::new(Stat::Evasion, ANY),
    FieldSpec::new(Stat::Luck, ANY),
    FieldSpec::new(Stat::Speed, ANY),
    FieldSpec::new(Stat::Lumi, NON_NEGATIVE),
    FieldSpec::new(Stat::Insanity, NON_NEGATIVE),
    FieldSpec::new(Stat::Torment, ANY),
    FieldSpec::new(Stat::SystemicPressure, ANY),
    FieldSpec::new(Stat::Courage, 0..=MILESTONE_TRACK_BOXES),
    FieldSpec::new(Stat::Understanding, 0..=MILESTONE_TRACK_BOXES),
];

pub static BIRTH_SPEC: FieldSpec = FieldSpec::new(Stat::Birth, NON_NEGATIVE);

/// Every validated numeric field, including birth.
///
/// Use this for validation; use [`SURVIVOR_EDIT_SPECS`] for diffing.
pub fn validated_specs() -> impl Iterator<Item = &'static FieldSpec> {
    SURVIVOR_EDIT_SPECS.iter().chain(std::iter::once(&BIRTH_SPEC))
}

/// Whether `stat` can be changed on an existing survivor, i.e. the diff engine compares it.
pub fn is_patchable(stat: Stat) -> bool {
    SURVIVOR_EDIT_SPECS.iter().any(|spec| spec.stat == stat)
}

/// Spec for `stat`.
pub fn spec_for(stat: Stat) -> &'static FieldSpec {
    validated_specs()
        .find(|spec| spec.stat == stat)
        .unwrap_or(&BIRTH_SPEC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stat_has_exactly_one_spec() {
        for stat in Stat::ALL {
            assert_eq!(
                validated_specs().filter(|s| s.stat == stat).count(),
                1,
                "{stat}"
            );
        }
    }

    #[test]
    fn test_describe_range() {
        assert_eq!(spec_for(Stat::Movement).describe_range(), "any integer");
        assert_eq!(spec_for(Stat::Lumi).describe_range(), "at least 0");
        assert_eq!(spec_for(Stat::HuntXp).describe_range(), "between 0 and 16");
    }

    #[test]
    fn test_accepts_respects_bounds() {
        let courage = spec_for(Stat::Courage);
        assert!(courage.accepts(0));
        assert!(courage.accepts(9));
        assert!(!courage.accepts(10));
        assert!(!courage.accepts(-1));
    }
}
