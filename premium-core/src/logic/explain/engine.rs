use super::types::{CostDriver, Impact};
use crate::logic::input::{RawInput, Region};

// Band edges shown to applicants next to every estimate
const AGE_LOW_BELOW: u32 = 30;
const AGE_MODERATE_BELOW: u32 = 50;
const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;
const BMI_HEALTHY_BELOW: f64 = 25.0;
const BMI_OVERWEIGHT_BELOW: f64 = 30.0;

/// Qualitative drivers for one input, in display order: age, BMI,
/// smoking, region.
pub fn cost_drivers(input: &RawInput) -> Vec<CostDriver> {
    vec![age_driver(input.age), bmi_driver(input.bmi), smoking_driver(input.smoker), region_driver(input.region)]
}

fn driver(factor: &str, assessment: &str, impact: Impact) -> CostDriver {
    CostDriver {
        factor: factor.to_string(),
        assessment: assessment.to_string(),
        impact,
    }
}

fn age_driver(age: u32) -> CostDriver {
    if age < AGE_LOW_BELOW {
        driver("age", "Low impact", Impact::Favorable)
    } else if age < AGE_MODERATE_BELOW {
        driver("age", "Moderate impact", Impact::Neutral)
    } else {
        driver("age", "High impact", Impact::Elevated)
    }
}

fn bmi_driver(bmi: f64) -> CostDriver {
    if bmi < BMI_UNDERWEIGHT_BELOW {
        driver("bmi", "Underweight", Impact::Favorable)
    } else if bmi < BMI_HEALTHY_BELOW {
        driver("bmi", "Healthy", Impact::Favorable)
    } else if bmi < BMI_OVERWEIGHT_BELOW {
        driver("bmi", "Overweight", Impact::Neutral)
    } else {
        driver("bmi", "Obese", Impact::Elevated)
    }
}

fn smoking_driver(smoker: bool) -> CostDriver {
    if smoker {
        driver("smoking", "Major impact", Impact::Major)
    } else {
        driver("smoking", "Non-smoker", Impact::Favorable)
    }
}

fn region_driver(region: Region) -> CostDriver {
    match region {
        Region::Northeast => driver("region", "Higher rates", Impact::Neutral),
        _ => driver("region", "Standard rates", Impact::Favorable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::input::Sex;

    fn input(age: u32, bmi: f64, smoker: bool, region: Region) -> RawInput {
        RawInput { age, sex: Sex::Female, bmi, children: 0, smoker, region }
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(age_driver(29).impact, Impact::Favorable);
        assert_eq!(age_driver(30).impact, Impact::Neutral);
        assert_eq!(age_driver(50).impact, Impact::Elevated);
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(bmi_driver(18.4).assessment, "Underweight");
        assert_eq!(bmi_driver(18.5).assessment, "Healthy");
        assert_eq!(bmi_driver(25.0).assessment, "Overweight");
        assert_eq!(bmi_driver(30.0).assessment, "Obese");
    }

    #[test]
    fn test_drivers_order_and_smoking() {
        let drivers = cost_drivers(&input(26, 25.0, true, Region::Southeast));
        let factors: Vec<&str> = drivers.iter().map(|d| d.factor.as_str()).collect();
        assert_eq!(factors, ["age", "bmi", "smoking", "region"]);
        assert_eq!(drivers[2].impact, Impact::Major);
        assert_eq!(drivers[3].assessment, "Standard rates");
    }

    #[test]
    fn test_northeast_flagged() {
        let drivers = cost_drivers(&input(40, 22.0, false, Region::Northeast));
        assert_eq!(drivers[3].assessment, "Higher rates");
    }
}
