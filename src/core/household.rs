use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::round::{to2, to4};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HouseholdIncome {
    pub employment: f64,
    pub self_employment: f64,
    pub eligible_dividends: f64,
    pub capital_gains: f64,
    pub pension: f64,
    pub other: f64,
}

impl HouseholdIncome {
    pub fn total(&self) -> f64 {
        self.employment
            + self.self_employment
            + self.eligible_dividends
            + self.capital_gains
            + self.pension
            + self.other
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxOutcome {
    pub tax: f64,
    pub avg_rate: f64,
    pub mtr: f64,
}

pub type TaxCompute = Arc<dyn Fn(&HouseholdIncome) -> TaxOutcome + Send + Sync>;

#[derive(Clone, Default)]
pub struct ScheduleRecord {
    pub label: String,
    pub compute: Option<TaxCompute>,
}

#[derive(Clone)]
pub enum TaxSchedule {
    Compute(TaxCompute),
    Record(ScheduleRecord),
}

impl TaxSchedule {
    pub fn from_fn<F>(compute: F) -> Self
    where
        F: Fn(&HouseholdIncome) -> TaxOutcome + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(compute))
    }

    fn invoke(&self, income: &HouseholdIncome) -> Option<TaxOutcome> {
        let compute = match self {
            Self::Compute(compute) => compute,
            Self::Record(record) => record.compute.as_ref()?,
        };
        Some(compute(income))
    }
}

impl fmt::Debug for TaxSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compute(_) => f.write_str("TaxSchedule::Compute(..)"),
            Self::Record(record) => f
                .debug_struct("TaxSchedule::Record")
                .field("label", &record.label)
                .field("has_compute", &record.compute.is_some())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdTaxYear {
    pub year: i32,
    pub tax: f64,
    pub avg_rate: f64,
    pub mtr: f64,
}

pub fn project_household_taxes(
    schedule_by_year: &BTreeMap<i32, TaxSchedule>,
    income_path: &BTreeMap<i32, HouseholdIncome>,
) -> Vec<HouseholdTaxYear> {
    income_path
        .iter()
        .map(|(&year, income)| {
            let outcome = schedule_by_year
                .get(&year)
                .and_then(|schedule| schedule.invoke(income))
                .unwrap_or_default();
            HouseholdTaxYear {
                year,
                tax: to2(outcome.tax),
                avg_rate: to4(outcome.avg_rate),
                mtr: to4(outcome.mtr),
            }
        })
        .collect()
}
