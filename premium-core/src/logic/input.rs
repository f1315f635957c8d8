//! Raw applicant input
//!
//! The user-facing fields before any encoding. Domains live in
//! `constants.rs`; `RawInput::validate` is the only place they are checked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{AGE_MAX, AGE_MIN, BMI_MAX, BMI_MIN, CHILDREN_MAX};
use super::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            _ => Err(ValidationError::new("sex", s, "female, male")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northwest,
    Northeast,
    Southwest,
    Southeast,
}

impl Region {
    /// Rotation order used by the change-region preset
    pub const ALL: [Region; 4] = [
        Region::Northwest,
        Region::Northeast,
        Region::Southwest,
        Region::Southeast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Northwest => "northwest",
            Self::Northeast => "northeast",
            Self::Southwest => "southwest",
            Self::Southeast => "southeast",
        }
    }

    /// Next region in rotation, wrapping around
    pub fn next(&self) -> Region {
        let idx = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::new("region", s, "northwest, northeast, southwest, southeast")
            })
    }
}

/// One applicant profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: u32,
    pub sex: Sex,
    pub bmi: f64,
    pub children: u32,
    pub smoker: bool,
    pub region: Region,
}

impl RawInput {
    /// Check every field against its domain, reporting the first offender
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_age(self.age)?;
        validate_bmi(self.bmi)?;
        if self.children > CHILDREN_MAX {
            return Err(ValidationError::new(
                "children",
                self.children,
                format!("0..={}", CHILDREN_MAX),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_age(age: u32) -> Result<(), ValidationError> {
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(ValidationError::new(
            "age",
            age,
            format!("{}..={}", AGE_MIN, AGE_MAX),
        ));
    }
    Ok(())
}

pub(crate) fn validate_bmi(bmi: f64) -> Result<(), ValidationError> {
    // NaN fails the range check as well
    if !(BMI_MIN..=BMI_MAX).contains(&bmi) {
        return Err(ValidationError::new(
            "bmi",
            bmi,
            format!("{:.1}..={:.1}", BMI_MIN, BMI_MAX),
        ));
    }
    Ok(())
}
