use serde::{Deserialize, Serialize};

/// BMI category over the Asian-Pacific breakpoints used by the original
/// intake form. Every lower bound is inclusive — in particular exactly 23.0
/// falls into `Overweight`, the majority behavior across form revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    /// Sentinel for missing or non-positive weight/height.
    Invalid,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObeseClass1 => "Obesity class 1",
            BmiCategory::ObeseClass2 => "Obesity class 2",
            BmiCategory::Invalid => "Not available",
        }
    }

    /// Category is a pure function of the (rounded) BMI value.
    fn from_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 23.0 {
            BmiCategory::Healthy
        } else if bmi < 25.0 {
            BmiCategory::Overweight
        } else if bmi < 30.0 {
            BmiCategory::ObeseClass1
        } else {
            BmiCategory::ObeseClass2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
}

impl BmiResult {
    fn invalid() -> Self {
        Self {
            value: 0.0,
            category: BmiCategory::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.category != BmiCategory::Invalid
    }
}

/// Compute BMI from weight (kg) and height (cm), rounded to two decimals.
///
/// Fails soft: missing weight/height, weight ≤ 0, or height ≤ 0 yields the
/// invalid sentinel instead of an error.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> BmiResult {
    let (weight, height) = match (weight_kg, height_cm) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => (w, h),
        _ => return BmiResult::invalid(),
    };

    let height_m = height / 100.0;
    let raw = weight / (height_m * height_m);
    if !raw.is_finite() {
        return BmiResult::invalid();
    }

    let value = (raw * 100.0).round() / 100.0;
    BmiResult {
        value,
        category: BmiCategory::from_value(value),
    }
}
