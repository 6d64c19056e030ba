//! Employment profile model and related types.
//!
//! The profile is owned by the application's profile store. The engine only
//! reads it; [`EmploymentProfile::apply`] implements the store's merge of a
//! partial edit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The employment contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Open-ended contract.
    Indefinite,
    /// Probation (experience) contract.
    Probation,
    /// Apprenticeship contract.
    Apprentice,
    /// Any other arrangement.
    Other,
}

/// How often salary is disbursed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// Once a month.
    Monthly,
    /// Twice a month.
    Biweekly,
    /// Every week.
    Weekly,
}

/// The part of the month in which the employer pays salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPeriod {
    /// Paid on day 5.
    #[default]
    Early,
    /// Paid on day 15.
    Mid,
    /// Paid on day 25.
    Late,
}

impl PaymentPeriod {
    /// Returns the statutory pay day of month for this period.
    ///
    /// # Example
    ///
    /// ```
    /// use ferias_engine::models::PaymentPeriod;
    ///
    /// assert_eq!(PaymentPeriod::Early.pay_day(), 5);
    /// assert_eq!(PaymentPeriod::Mid.pay_day(), 15);
    /// assert_eq!(PaymentPeriod::Late.pay_day(), 25);
    /// ```
    pub fn pay_day(self) -> u32 {
        match self {
            PaymentPeriod::Early => 5,
            PaymentPeriod::Mid => 15,
            PaymentPeriod::Late => 25,
        }
    }
}

/// A recurring payroll deduction (health plan, meal voucher share, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Description of the deduction.
    pub label: String,
    /// Monthly amount.
    pub amount: Decimal,
}

/// The employment data an employee keeps in the app.
///
/// Every field is optional on the wire. Absent monetary fields are treated
/// as zero and an absent payment period as [`PaymentPeriod::Early`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentProfile {
    /// Name shown in the app.
    pub display_name: Option<String>,
    /// Date the employee was hired.
    pub admission_date: Option<NaiveDate>,
    /// The contract type.
    pub contract_type: Option<ContractType>,
    /// Monthly base salary.
    pub base_salary: Option<Decimal>,
    /// How often salary is paid.
    pub payment_frequency: Option<PaymentFrequency>,
    /// The part of the month salary is paid in.
    pub payment_period: Option<PaymentPeriod>,
    /// Explicit pay day agreed with the employer. Overrides `payment_period`.
    pub pay_day: Option<u32>,
    /// Whether the employee receives commissions, overtime or other variable pay.
    pub has_variable_pay: bool,
    /// Monthly average of variable pay.
    pub variable_pay_average: Option<Decimal>,
    /// Recurring deductions.
    pub deductions: Vec<Deduction>,
    /// When the profile was last edited.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A partial edit of an [`EmploymentProfile`]. Present fields replace the
/// stored ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    /// New display name.
    pub display_name: Option<String>,
    /// New admission date.
    pub admission_date: Option<NaiveDate>,
    /// New contract type.
    pub contract_type: Option<ContractType>,
    /// New base salary.
    pub base_salary: Option<Decimal>,
    /// New payment frequency.
    pub payment_frequency: Option<PaymentFrequency>,
    /// New payment period.
    pub payment_period: Option<PaymentPeriod>,
    /// New pay day override.
    pub pay_day: Option<u32>,
    /// New variable pay flag.
    pub has_variable_pay: Option<bool>,
    /// New variable pay average.
    pub variable_pay_average: Option<Decimal>,
    /// Replacement deduction list.
    pub deductions: Option<Vec<Deduction>>,
}

impl EmploymentProfile {
    /// Returns the monthly remuneration used for vacation pay: base salary
    /// plus the variable pay average.
    ///
    /// # Example
    ///
    /// ```
    /// use ferias_engine::models::EmploymentProfile;
    /// use rust_decimal::Decimal;
    ///
    /// let profile = EmploymentProfile {
    ///     base_salary: Some(Decimal::new(3000, 0)),
    ///     variable_pay_average: Some(Decimal::new(450, 0)),
    ///     ..Default::default()
    /// };
    /// assert_eq!(profile.remuneration(), Decimal::new(3450, 0));
    /// assert_eq!(EmploymentProfile::default().remuneration(), Decimal::ZERO);
    /// ```
    pub fn remuneration(&self) -> Decimal {
        self.base_salary.unwrap_or_default() + self.variable_pay_average.unwrap_or_default()
    }

    /// Returns the nominal pay day of month.
    ///
    /// The explicit `pay_day` wins over the payment period. The day may exceed
    /// the length of a given month; callers clamp it per month.
    pub fn pay_day(&self) -> u32 {
        self.pay_day
            .unwrap_or_else(|| self.payment_period.unwrap_or_default().pay_day())
    }

    /// Checks the fields the engine relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.base_salary.is_some_and(|s| s < Decimal::ZERO) {
            return Err(EngineError::InvalidProfile {
                field: "base_salary".to_string(),
                message: "cannot be negative".to_string(),
            });
        }

        if self.variable_pay_average.is_some_and(|v| v < Decimal::ZERO) {
            return Err(EngineError::InvalidProfile {
                field: "variable_pay_average".to_string(),
                message: "cannot be negative".to_string(),
            });
        }

        if let Some(day) = self.pay_day.filter(|d| !(1..=31).contains(d)) {
            return Err(EngineError::InvalidProfile {
                field: "pay_day".to_string(),
                message: format!("{} is not a day of month (1-31)", day),
            });
        }

        Ok(())
    }

    /// Merges a partial edit into the profile and stamps `updated_at`.
    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(display_name) = update.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(admission_date) = update.admission_date {
            self.admission_date = Some(admission_date);
        }
        if let Some(contract_type) = update.contract_type {
            self.contract_type = Some(contract_type);
        }
        if let Some(base_salary) = update.base_salary {
            self.base_salary = Some(base_salary);
        }
        if let Some(payment_frequency) = update.payment_frequency {
            self.payment_frequency = Some(payment_frequency);
        }
        if let Some(payment_period) = update.payment_period {
            self.payment_period = Some(payment_period);
        }
        if let Some(pay_day) = update.pay_day {
            self.pay_day = Some(pay_day);
        }
        if let Some(has_variable_pay) = update.has_variable_pay {
            self.has_variable_pay = has_variable_pay;
        }
        if let Some(variable_pay_average) = update.variable_pay_average {
            self.variable_pay_average = Some(variable_pay_average);
        }
        if let Some(deductions) = update.deductions {
            self.deductions = deductions;
        }
        self.updated_at = Some(now);
    }
}
