//! Raw applicant input as collected by the intake form.

use serde::{Deserialize, Serialize};

use crate::enums::{
    CreditHistory, Dependents, Education, Employment, Gender, MaritalStatus, PropertyArea,
};
use crate::error::{Result, ValidationError};

/// Shortest tenure offered on the form, in years.
pub const MIN_TENURE_YEARS: u32 = 1;
/// Longest tenure offered on the form, in years.
pub const MAX_TENURE_YEARS: u32 = 30;

/// One submission's raw fields.
///
/// Amounts are in the local currency (PKR on the intake form). Income is
/// monthly; the loan amount is the full requested principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub name: String,
    pub gender: Gender,
    pub married: MaritalStatus,
    pub dependents: Dependents,
    pub education: Education,
    pub employment: Employment,
    pub property_area: PropertyArea,
    pub credit_history: CreditHistory,
    pub income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub tenure_years: u32,
}

impl Default for ApplicantInput {
    /// The form's initial state: every widget at its first option and the
    /// numeric inputs at their preset values. The name starts empty, so a
    /// default input does not validate until a name is filled in.
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Male,
            married: MaritalStatus::Married,
            dependents: Dependents::Zero,
            education: Education::Graduate,
            employment: Employment::SelfEmployed,
            property_area: PropertyArea::Urban,
            credit_history: CreditHistory::Good,
            income: 75_000.0,
            coapplicant_income: 0.0,
            loan_amount: 500_000.0,
            tenure_years: 15,
        }
    }
}

impl ApplicantInput {
    /// Creates a default input for the named applicant.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Total household income (applicant plus co-applicant).
    pub fn total_income(&self) -> f64 {
        self.income + self.coapplicant_income
    }

    /// Checks every input constraint, returning the first violation.
    ///
    /// Order: name, numeric finiteness, income signs, loan amount, tenure.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        for (field, value) in [
            ("income", self.income),
            ("coapplicant_income", self.coapplicant_income),
            ("loan_amount", self.loan_amount),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
        }
        if self.income < 0.0 {
            return Err(ValidationError::NegativeIncome {
                field: "income",
                value: self.income,
            });
        }
        if self.coapplicant_income < 0.0 {
            return Err(ValidationError::NegativeIncome {
                field: "coapplicant_income",
                value: self.coapplicant_income,
            });
        }
        if self.loan_amount <= 0.0 {
            return Err(ValidationError::NonPositiveLoan {
                value: self.loan_amount,
            });
        }
        if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&self.tenure_years) {
            return Err(ValidationError::TenureOutOfRange {
                years: self.tenure_years,
                min: MIN_TENURE_YEARS,
                max: MAX_TENURE_YEARS,
            });
        }
        Ok(())
    }
}
