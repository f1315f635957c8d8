//! Feature Encoder
//!
//! Turns a validated `RawInput` into the standardized vector the model was
//! trained on. Categorical codes and scaler parameters both come from the
//! artifact; nothing here is re-derived at request time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::input::{RawInput, Region, Sex};
use super::layout::{self, FEATURE_COUNT};
use super::scaler::StandardScaler;
use super::vector::FeatureVector;

/// Category name → numeric code, per categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCodes {
    pub sex: BTreeMap<String, f64>,
    /// Keys are `"no"` / `"yes"`
    pub smoker: BTreeMap<String, f64>,
    pub region: BTreeMap<String, f64>,
}

impl CategoryCodes {
    /// Ordinal codes of the insurance notebook
    pub fn ordinal() -> Self {
        let map = |pairs: &[(&str, f64)]| {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<_, _>>()
        };
        Self {
            sex: map(&[("female", 0.0), ("male", 1.0)]),
            smoker: map(&[("no", 0.0), ("yes", 1.0)]),
            region: map(&[
                ("northwest", 0.0),
                ("northeast", 1.0),
                ("southwest", 2.0),
                ("southeast", 3.0),
            ]),
        }
    }
}

fn smoker_key(smoker: bool) -> &'static str {
    if smoker { "yes" } else { "no" }
}

fn lookup(column: &str, codes: &BTreeMap<String, f64>, key: &str) -> EngineResult<f64> {
    match codes.get(key) {
        Some(code) if code.is_finite() => Ok(*code),
        Some(_) => Err(EngineError::Artifact(format!("{} code for '{}' is not finite", column, key))),
        None => Err(EngineError::Artifact(format!("{} encoding has no code for '{}'", column, key))),
    }
}

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    sex: [f64; 2],
    smoker: [f64; 2],
    region: [f64; 4],
    scaler: StandardScaler,
}

impl FeatureEncoder {
    /// Resolve every enum variant up front so `encode` cannot miss a code
    pub fn new(codes: &CategoryCodes, scaler: StandardScaler) -> EngineResult<Self> {
        scaler.validate(FEATURE_COUNT)?;

        let mut sex = [0.0; 2];
        for (slot, variant) in sex.iter_mut().zip(Sex::ALL) {
            *slot = lookup("sex", &codes.sex, variant.as_str())?;
        }

        let smoker = [
            lookup("smoker", &codes.smoker, smoker_key(false))?,
            lookup("smoker", &codes.smoker, smoker_key(true))?,
        ];

        let mut region = [0.0; 4];
        for (slot, variant) in region.iter_mut().zip(Region::ALL) {
            *slot = lookup("region", &codes.region, variant.as_str())?;
        }

        Ok(Self { sex, smoker, region, scaler })
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Unscaled numeric row in layout order
    pub fn raw_values(&self, input: &RawInput) -> [f64; FEATURE_COUNT] {
        let mut row = [0.0; FEATURE_COUNT];
        row[layout::AGE] = input.age as f64;
        row[layout::SEX] = self.sex[Self::sex_slot(input.sex)];
        row[layout::BMI] = input.bmi;
        row[layout::CHILDREN] = input.children as f64;
        row[layout::SMOKER] = self.smoker[input.smoker as usize];
        row[layout::REGION] = self.region[Self::region_slot(input.region)];
        row
    }

    pub fn encode(&self, input: &RawInput) -> EngineResult<FeatureVector> {
        input.validate()?;
        let scaled = self.scaler.transform(&self.raw_values(input));
        Ok(FeatureVector::from_values(scaled))
    }

    fn sex_slot(sex: Sex) -> usize {
        match sex {
            Sex::Female => 0,
            Sex::Male => 1,
        }
    }

    fn region_slot(region: Region) -> usize {
        match region {
            Region::Northwest => 0,
            Region::Northeast => 1,
            Region::Southwest => 2,
            Region::Southeast => 3,
        }
    }
}
