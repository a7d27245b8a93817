//! Type-safe enumerations for the categorical fields of a loan application.
//!
//! Each category has a fixed set of levels. Levels print as the labels shown
//! on the intake form (`"Not Graduate"`, `"3+"`, `"Semiurban"`) and parse from
//! those labels case-insensitively, ignoring spaces, hyphens and underscores,
//! so `not-graduate`, `NOT_GRADUATE` and `Not Graduate` are equivalent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownLevel;

/// Normalizes a label for lenient comparison.
fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Name of the category, as used in error messages.
            pub const CATEGORY: &'static str = $category;

            /// All levels in form order.
            pub const fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            /// Returns the form label for this level.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLevel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = normalize_label(s);
                $(
                    if normalized == normalize_label($label)
                        $(|| normalized == normalize_label($alias))*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownLevel {
                    category: $category,
                    value: s.to_string(),
                    expected: vec![$($label),+],
                })
            }
        }
    };
}

categorical! {
    /// Applicant gender. `Female` is the reference level.
    Gender, "gender" {
        Male => "Male" | "M",
        Female => "Female" | "F",
    }
}

categorical! {
    /// Whether the applicant is married. `Unmarried` is the reference level.
    MaritalStatus, "married" {
        Married => "Yes" | "married",
        Unmarried => "No" | "single" | "unmarried",
    }
}

categorical! {
    /// Number of dependents, bucketed. `Zero` is the reference level.
    Dependents, "dependents" {
        Zero => "0",
        One => "1",
        Two => "2",
        ThreePlus => "3+" | "3" | "three_plus",
    }
}

categorical! {
    /// Highest education level. `Graduate` is the reference level.
    Education, "education" {
        Graduate => "Graduate",
        NotGraduate => "Not Graduate",
    }
}

categorical! {
    /// Self-employment flag. `Salaried` (not self-employed) is the reference level.
    Employment, "self_employed" {
        SelfEmployed => "Yes" | "self_employed",
        Salaried => "No" | "salaried",
    }
}

categorical! {
    /// Property area category. `Rural` is the reference level.
    PropertyArea, "property_area" {
        Urban => "Urban",
        Semiurban => "Semiurban",
        Rural => "Rural",
    }
}

categorical! {
    /// Quality of the applicant's credit record.
    CreditHistory, "credit_history" {
        Good => "Good",
        Poor => "Poor",
    }
}

categorical! {
    /// Classifier outcome for an application.
    Verdict, "prediction" {
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

categorical! {
    /// Feedback answer to "is the prediction accurate?".
    AccuracyOpinion, "accuracy_opinion" {
        Yes => "Yes",
        Maybe => "Maybe",
        No => "No",
    }
}

impl CreditHistory {
    /// Numeric encoding used by the trained model (`Credit_History`).
    pub fn as_indicator(&self) -> f64 {
        match self {
            CreditHistory::Good => 1.0,
            CreditHistory::Poor => 0.0,
        }
    }
}

impl Verdict {
    /// Parses a verdict from a stored log value.
    ///
    /// Accepts the canonical labels as well as older free-form headlines such
    /// as `Loan Approval: APPROVED ✅`.
    pub fn from_log_value(value: &str) -> Option<Self> {
        if let Ok(verdict) = value.parse() {
            return Some(verdict);
        }
        let upper = value.to_uppercase();
        match (upper.contains("APPROVED"), upper.contains("REJECTED")) {
            (true, false) => Some(Verdict::Approved),
            (false, true) => Some(Verdict::Rejected),
            _ => None,
        }
    }
}
