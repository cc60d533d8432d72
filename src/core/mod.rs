mod engine;
mod household;
mod overlay;
mod round;
mod settings;
mod snapshot;
mod types;

pub use engine::{
    MAX_HORIZON_YEARS, RevenueProjection, SpendingProjection, YearBasis, calc_debt, calc_interest,
    calc_nominal_gdp, calc_program_spending, calc_revenue, project_all, summarize,
};
pub use household::{
    HouseholdIncome, HouseholdTaxYear, ScheduleRecord, TaxCompute, TaxOutcome, TaxSchedule,
    project_household_taxes,
};
pub use overlay::{YearOverlayStore, apply_overlay};
pub use round::{to2, to4};
pub use settings::{
    EconomicPatch, PlanningPatch, Preset, SettingsStore, builtin_presets,
    default_revenue_elasticity, default_spending_growth, factory_settings,
};
pub use snapshot::{
    BudgetState, FiscalIndicators, RevenueSourceState, SpendingCategoryState, snapshot_from_state,
};
pub use types::{
    BaseBudgetSnapshot, CategoryId, CategoryUserDelta, EconomicAssumptions, PlanKind, PlanMode,
    PlanningSettings, ProjectionSettings, ProjectionSummary, ProjectionYear, RevenuePlan,
    RevenueRule, Scenario, SourceId, SpendingGrowthProfile, SpendingPlan, SpendingRule,
    YearOverlay,
};
