/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The trimmed input has fewer characters than allowed
    #[error("text must be at least {min} characters")]
    TooShort { min: usize },
    /// The trimmed input has more characters than allowed
    #[error("text must be at most {max} characters")]
    TooLong { max: usize },
}

/// A string type that guarantees a trimmed, non-empty length within `MIN..=MAX` characters.
///
/// The input is trimmed of leading and trailing whitespace during construction and the
/// remaining length is counted in `char`s, so names such as `"Zachary"` and `"Ælfrún"` are
/// measured the way a user would count them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedText<const MIN: usize, const MAX: usize>(String);

/// Survivor names: 1 to 50 characters.
pub type SurvivorName = BoundedText<1, 50>;

/// Settlement names: 5 to 25 characters.
pub type SettlementName = BoundedText<5, 25>;

impl<const MIN: usize, const MAX: usize> BoundedText<MIN, MAX> {
    /// Creates a new `BoundedText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input, `TextError::TooShort` or
    /// `TextError::TooLong` when the trimmed length falls outside `MIN..=MAX`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let len = trimmed.chars().count();
        if len < MIN {
            return Err(TextError::TooShort { min: MIN });
        }
        if len > MAX {
            return Err(TextError::TooLong { max: MAX });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MIN: usize, const MAX: usize> std::fmt::Display for BoundedText<MIN, MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const MIN: usize, const MAX: usize> AsRef<str> for BoundedText<MIN, MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MIN: usize, const MAX: usize> serde::Serialize for BoundedText<MIN, MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const MIN: usize, const MAX: usize> serde::Deserialize<'de> for BoundedText<MIN, MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}
