use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::round::to2;
use super::types::BaseBudgetSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BudgetState {
    pub fiscal_indicators: Option<FiscalIndicators>,
    pub revenue_sources: BTreeMap<String, RevenueSourceState>,
    pub spending_categories: BTreeMap<String, SpendingCategoryState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FiscalIndicators {
    pub gdp: Option<f64>,
    pub debt: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevenueSourceState {
    pub adjusted_amount: Option<f64>,
    pub base: Option<f64>,
    pub rate: Option<f64>,
}

impl RevenueSourceState {
    fn amount(&self) -> f64 {
        match self.adjusted_amount {
            Some(amount) => amount,
            None => self.base.unwrap_or(0.0) * self.rate.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpendingCategoryState {
    pub base_amount: Option<f64>,
    pub adjustment_factor: Option<f64>,
    pub is_group: bool,
    pub children: BTreeMap<String, SpendingCategoryState>,
}

impl SpendingCategoryState {
    fn amount(&self) -> f64 {
        self.base_amount.unwrap_or(0.0) * self.adjustment_factor.unwrap_or(1.0)
    }
}

pub fn snapshot_from_state(state: &BudgetState) -> BaseBudgetSnapshot {
    let indicators = state.fiscal_indicators.unwrap_or_default();

    let revenues_by_source = state
        .revenue_sources
        .iter()
        .map(|(id, source)| (id.clone(), to2(source.amount())))
        .collect();

    let mut spending_by_category = BTreeMap::new();
    fold_categories(&state.spending_categories, &mut spending_by_category);

    BaseBudgetSnapshot {
        gdp: to2(indicators.gdp.unwrap_or(0.0)),
        debt: to2(indicators.debt.unwrap_or(0.0)),
        revenues_by_source,
        spending_by_category,
    }
}

fn fold_categories(
    categories: &BTreeMap<String, SpendingCategoryState>,
    out: &mut BTreeMap<String, f64>,
) {
    for (id, category) in categories {
        if category.is_group {
            fold_categories(&category.children, out);
        } else {
            out.insert(id.clone(), to2(category.amount()));
        }
    }
}
