//! Feature column names as they appear in the training data.

pub const APPLICANT_INCOME: &str = "ApplicantIncome";
pub const COAPPLICANT_INCOME: &str = "CoapplicantIncome";
pub const LOAN_AMOUNT: &str = "LoanAmount";
pub const LOAN_AMOUNT_TERM: &str = "Loan_Amount_Term";
pub const CREDIT_HISTORY: &str = "Credit_History";
pub const TOTAL_INCOME: &str = "TotalIncome";
pub const INCOME_TO_LOAN: &str = "Income_to_Loan";
pub const LOG_APPLICANT_INCOME: &str = "log_ApplicantIncome";
pub const LOG_LOAN_AMOUNT: &str = "log_LoanAmount";
pub const LOG_TOTAL_INCOME: &str = "log_TotalIncome";

pub const GENDER_MALE: &str = "Gender_Male";
pub const MARRIED_YES: &str = "Married_Yes";
pub const EDUCATION_NOT_GRADUATE: &str = "Education_Not Graduate";
pub const SELF_EMPLOYED_YES: &str = "Self_Employed_Yes";
pub const PROPERTY_AREA_SEMIURBAN: &str = "Property_Area_Semiurban";
pub const PROPERTY_AREA_URBAN: &str = "Property_Area_Urban";
pub const DEPENDENTS_1: &str = "Dependents_1";
pub const DEPENDENTS_2: &str = "Dependents_2";
pub const DEPENDENTS_3_PLUS: &str = "Dependents_3+";

/// Prefix of the training target column(s), never a model input.
pub const TARGET_PREFIX: &str = "Loan_Status";

/// Every column `derive_features` produces, in production order.
pub const DERIVED_COLUMNS: [&str; 19] = [
    APPLICANT_INCOME,
    COAPPLICANT_INCOME,
    LOAN_AMOUNT,
    LOAN_AMOUNT_TERM,
    CREDIT_HISTORY,
    TOTAL_INCOME,
    INCOME_TO_LOAN,
    LOG_APPLICANT_INCOME,
    LOG_LOAN_AMOUNT,
    LOG_TOTAL_INCOME,
    GENDER_MALE,
    MARRIED_YES,
    EDUCATION_NOT_GRADUATE,
    SELF_EMPLOYED_YES,
    PROPERTY_AREA_SEMIURBAN,
    PROPERTY_AREA_URBAN,
    DEPENDENTS_1,
    DEPENDENTS_2,
    DEPENDENTS_3_PLUS,
];

/// One-hot column groups, one per categorical field.
///
/// The reference level of each category has no column, so at most one
/// column per group is set.
pub const ONE_HOT_GROUPS: [&[&str]; 6] = [
    &[GENDER_MALE],
    &[MARRIED_YES],
    &[EDUCATION_NOT_GRADUATE],
    &[SELF_EMPLOYED_YES],
    &[PROPERTY_AREA_SEMIURBAN, PROPERTY_AREA_URBAN],
    &[DEPENDENTS_1, DEPENDENTS_2, DEPENDENTS_3_PLUS],
];
