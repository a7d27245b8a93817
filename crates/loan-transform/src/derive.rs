//! Applicant input → feature row.

use loan_model::{
    ApplicantInput, Dependents, Education, Employment, Gender, MaritalStatus, PropertyArea,
};
use tracing::debug;

use crate::columns::{
    APPLICANT_INCOME, COAPPLICANT_INCOME, CREDIT_HISTORY, DEPENDENTS_1, DEPENDENTS_2,
    DEPENDENTS_3_PLUS, DERIVED_COLUMNS, EDUCATION_NOT_GRADUATE, GENDER_MALE, INCOME_TO_LOAN,
    LOAN_AMOUNT, LOAN_AMOUNT_TERM, LOG_APPLICANT_INCOME, LOG_LOAN_AMOUNT, LOG_TOTAL_INCOME,
    MARRIED_YES, PROPERTY_AREA_SEMIURBAN, PROPERTY_AREA_URBAN, SELF_EMPLOYED_YES, TOTAL_INCOME,
};
use crate::row::FeatureRow;
use crate::schema::FeatureSchema;

/// Loan amounts are modelled in thousands.
pub const LOAN_SCALE: f64 = 1000.0;
/// Smoothing term in the income-to-loan ratio denominator.
pub const RATIO_SMOOTHING: f64 = 1.0;
/// Tenure is modelled in months.
pub const MONTHS_PER_YEAR: u32 = 12;

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// Computes every derived feature for `input`, in [`DERIVED_COLUMNS`] order.
///
/// The input is assumed to have passed validation; no checks happen here.
pub fn derive_features(input: &ApplicantInput) -> FeatureRow {
    let income = input.income;
    let coapplicant_income = input.coapplicant_income;
    let total_income = input.total_income();
    let scaled_loan = input.loan_amount / LOAN_SCALE;

    let mut row = FeatureRow::with_capacity(DERIVED_COLUMNS.len());
    row.push(APPLICANT_INCOME, income);
    row.push(COAPPLICANT_INCOME, coapplicant_income);
    row.push(LOAN_AMOUNT, scaled_loan);
    row.push(
        LOAN_AMOUNT_TERM,
        f64::from(input.tenure_years) * f64::from(MONTHS_PER_YEAR),
    );
    row.push(CREDIT_HISTORY, input.credit_history.as_indicator());
    row.push(TOTAL_INCOME, total_income);
    row.push(
        INCOME_TO_LOAN,
        total_income / (input.loan_amount + RATIO_SMOOTHING),
    );
    row.push(LOG_APPLICANT_INCOME, income.ln_1p());
    row.push(LOG_LOAN_AMOUNT, scaled_loan.ln_1p());
    row.push(LOG_TOTAL_INCOME, total_income.ln_1p());

    row.push(GENDER_MALE, indicator(input.gender == Gender::Male));
    row.push(MARRIED_YES, indicator(input.married == MaritalStatus::Married));
    row.push(
        EDUCATION_NOT_GRADUATE,
        indicator(input.education == Education::NotGraduate),
    );
    row.push(
        SELF_EMPLOYED_YES,
        indicator(input.employment == Employment::SelfEmployed),
    );
    row.push(
        PROPERTY_AREA_SEMIURBAN,
        indicator(input.property_area == PropertyArea::Semiurban),
    );
    row.push(
        PROPERTY_AREA_URBAN,
        indicator(input.property_area == PropertyArea::Urban),
    );
    row.push(DEPENDENTS_1, indicator(input.dependents == Dependents::One));
    row.push(DEPENDENTS_2, indicator(input.dependents == Dependents::Two));
    row.push(
        DEPENDENTS_3_PLUS,
        indicator(input.dependents == Dependents::ThreePlus),
    );
    row
}

/// Derives features for `input` and aligns them with `schema`.
pub fn transform(input: &ApplicantInput, schema: &FeatureSchema) -> FeatureRow {
    let derived = derive_features(input);
    let (row, report) = schema.reindex(&derived);
    if !report.is_exact() {
        debug!(
            zero_filled = ?report.zero_filled,
            dropped = ?report.dropped,
            "Feature row reindexed against model schema"
        );
    }
    row
}
