use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type SourceId = String;
pub type CategoryId = String;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseBudgetSnapshot {
    pub gdp: f64,
    pub debt: f64,
    pub revenues_by_source: BTreeMap<SourceId, f64>,
    pub spending_by_category: BTreeMap<CategoryId, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EconomicAssumptions {
    pub gdp_real: f64,
    pub inflation: f64,
    pub interest_rate: f64,
    pub population: f64,
}

impl Default for EconomicAssumptions {
    fn default() -> Self {
        Self {
            gdp_real: 1.8,
            inflation: 2.0,
            interest_rate: 3.0,
            population: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanningSettings {
    pub base_year: i32,
    pub horizon_years: i32,
}

impl Default for PlanningSettings {
    fn default() -> Self {
        Self {
            base_year: 2025,
            horizon_years: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpendingGrowthProfile {
    pub baseline: f64,
    pub demographic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryUserDelta {
    pub level: f64,
    pub growth_delta: f64,
    pub ongoing: bool,
}

impl Default for CategoryUserDelta {
    fn default() -> Self {
        Self {
            level: 0.0,
            growth_delta: 0.0,
            ongoing: true,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    #[default]
    Points,
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRule {
    pub start_year: i32,
    pub start_rate: f64,
    #[serde(default)]
    pub annual_delta_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevenuePlan {
    pub mode: PlanMode,
    pub points: BTreeMap<i32, f64>,
    pub rule: Option<RevenueRule>,
}

impl RevenuePlan {
    pub fn active_rule(&self) -> Option<&RevenueRule> {
        match self.mode {
            PlanMode::Rule => self.rule.as_ref(),
            PlanMode::Points => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingRule {
    pub start_year: i32,
    pub start_factor: f64,
    #[serde(default)]
    pub annual_delta_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpendingPlan {
    pub mode: PlanMode,
    pub points: BTreeMap<i32, f64>,
    pub rule: Option<SpendingRule>,
    pub start_year: Option<i32>,
    pub level_shift_pct: Option<f64>,
    pub ongoing_level_pct: Option<f64>,
}

impl SpendingPlan {
    pub fn active_rule(&self) -> Option<&SpendingRule> {
        match self.mode {
            PlanMode::Rule => self.rule.as_ref(),
            PlanMode::Points => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Revenue,
    Spending,
}

impl std::str::FromStr for PlanKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "revenue" => Ok(Self::Revenue),
            "spending" => Ok(Self::Spending),
            other => Err(format!("unknown plan kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionSettings {
    pub planning: PlanningSettings,
    pub economic: EconomicAssumptions,
    pub revenue_elasticity: BTreeMap<SourceId, f64>,
    pub spending_growth: BTreeMap<CategoryId, SpendingGrowthProfile>,
    pub user_deltas: BTreeMap<CategoryId, CategoryUserDelta>,
    pub revenue_plans: BTreeMap<SourceId, RevenuePlan>,
    pub spending_plans: BTreeMap<CategoryId, SpendingPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: i32,
    pub gdp: f64,
    pub revenue_by_source: BTreeMap<SourceId, f64>,
    pub revenue_total: f64,
    pub spending_by_category: BTreeMap<CategoryId, f64>,
    pub program_spending: f64,
    pub interest: f64,
    pub spending_total: f64,
    pub deficit: f64,
    pub debt: f64,
    #[serde(rename = "debtToGDP")]
    pub debt_to_gdp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub first_year: i32,
    pub last_year: i32,
    pub cumulative_deficit: f64,
    pub final_debt: f64,
    #[serde(rename = "finalDebtToGDP")]
    pub final_debt_to_gdp: f64,
    #[serde(rename = "peakDebtToGDP")]
    pub peak_debt_to_gdp: f64,
    pub surplus_years: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YearOverlay {
    pub revenue_pct: BTreeMap<String, f64>,
    pub spending_pct: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub year: String,
    pub name: String,
    pub overlay: YearOverlay,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
