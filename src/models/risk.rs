use serde::{Deserialize, Serialize};

/// Clinical readings feeding the risk decision table. Absent fields never
/// satisfy a comparison.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ClinicalReadings {
    pub blood_sugar: Option<f64>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub hba1c: Option<f64>,
    pub has_complications: bool,
}

/// One of seven ordered risk tiers with canned, verbatim advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskProfile {
    pub level: u8,
    pub name: &'static str,
    pub color: &'static str,
    pub advice: &'static [&'static str],
}

const COMPLICATIONS: RiskProfile = RiskProfile {
    level: 7,
    name: "Complications",
    color: "#7b1fa2",
    advice: &[
        "Existing complications require active medical management.",
        "Keep every scheduled appointment with your care team.",
        "Bring an up-to-date medication list to each visit.",
        "Seek urgent care if symptoms suddenly worsen.",
    ],
};

const CRITICAL: RiskProfile = RiskProfile {
    level: 6,
    name: "Critical",
    color: "#c62828",
    advice: &[
        "One or more readings are in a critical range.",
        "Contact a medical professional today.",
        "Do not adjust medication on your own.",
        "If you feel chest pain, confusion, or severe weakness, seek emergency care.",
    ],
};

const DANGER: RiskProfile = RiskProfile {
    level: 5,
    name: "Danger",
    color: "#e64a19",
    advice: &[
        "Readings are well above the recommended range.",
        "Book a medical review within the next few days.",
        "Cut back on salt, sugar, and alcohol while you wait.",
        "Measure again at the same time tomorrow and note the result.",
    ],
};

const WATCH: RiskProfile = RiskProfile {
    level: 4,
    name: "Watch",
    color: "#f9a825",
    advice: &[
        "Readings are above target and worth discussing with a doctor.",
        "Re-check your readings over the coming week.",
        "Favor home-cooked meals with less salt and sugar.",
        "Aim for 30 minutes of light exercise most days.",
        "Keep a simple log of readings, meals, and sleep.",
    ],
};

const WELL_CONTROLLED: RiskProfile = RiskProfile {
    level: 3,
    name: "Well controlled",
    color: "#558b2f",
    advice: &[
        "Readings are inside the controlled range.",
        "Keep up your current routine and medication schedule.",
        "Re-check at your usual interval.",
    ],
};

const AT_RISK: RiskProfile = RiskProfile {
    level: 2,
    name: "At risk",
    color: "#9e9d24",
    advice: &[
        "Readings are creeping toward the upper range.",
        "Small diet and activity changes now prevent escalation later.",
        "Re-check within two weeks.",
    ],
};

const NORMAL: RiskProfile = RiskProfile {
    level: 1,
    name: "Normal",
    color: "#2e7d32",
    advice: &[
        "No reading stands out.",
        "Maintain a balanced diet and regular activity.",
        "Do a routine check-up once a year.",
    ],
};

fn ge(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

fn gt(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn le(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v <= threshold)
}

/// The decision table as an explicit ordered list of (predicate, tier)
/// pairs, evaluated first-match-wins. Blood pressure tiers trigger on
/// systolic OR diastolic alone; that asymmetry is carried over from the
/// source rule table on purpose.
const RULES: &[(fn(&ClinicalReadings) -> bool, &RiskProfile)] = &[
    (|r| r.has_complications, &COMPLICATIONS),
    (
        |r| ge(r.blood_sugar, 183.0) || gt(r.systolic, 180.0) || gt(r.diastolic, 110.0) || gt(r.hba1c, 8.0),
        &CRITICAL,
    ),
    (
        |r| ge(r.blood_sugar, 155.0) || ge(r.systolic, 160.0) || ge(r.diastolic, 100.0) || ge(r.hba1c, 7.0),
        &DANGER,
    ),
    (
        |r| ge(r.blood_sugar, 126.0) || ge(r.systolic, 140.0) || ge(r.diastolic, 90.0),
        &WATCH,
    ),
    (
        |r| le(r.blood_sugar, 125.0) || le(r.systolic, 139.0) || le(r.diastolic, 89.0),
        &WELL_CONTROLLED,
    ),
    (
        |r| ge(r.blood_sugar, 100.0) || ge(r.systolic, 121.0) || ge(r.diastolic, 81.0),
        &AT_RISK,
    ),
];

/// Classify readings into exactly one tier. Total and deterministic:
/// the table is scanned top to bottom and `Normal` is the terminal default.
pub fn classify(readings: &ClinicalReadings) -> RiskProfile {
    for (predicate, profile) in RULES {
        if predicate(readings) {
            return **profile;
        }
    }
    NORMAL
}
