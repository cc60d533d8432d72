use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{
    CategoryId, PlanKind, ProjectionSettings, RevenuePlan, SourceId, SpendingGrowthProfile,
    SpendingPlan,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanningPatch {
    pub base_year: Option<i32>,
    pub horizon_years: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EconomicPatch {
    pub gdp_real: Option<f64>,
    pub inflation: Option<f64>,
    pub interest_rate: Option<f64>,
    pub population: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preset {
    pub planning: Option<PlanningPatch>,
    pub economic: Option<EconomicPatch>,
}

const DEFAULT_ELASTICITIES: [(&str, f64); 8] = [
    ("personal_income_tax", 1.1),
    ("corporate_income_tax", 1.3),
    ("gst", 1.0),
    ("excise_taxes", 0.6),
    ("customs_duties", 0.9),
    ("ei_premiums", 1.0),
    ("carbon_levies", 0.5),
    ("other_revenue", 1.0),
];

// (category, baseline %, demographic %)
const DEFAULT_SPENDING_GROWTH: [(&str, f64, f64); 10] = [
    ("health_transfer", 3.0, 1.2),
    ("social_transfer", 3.0, 0.0),
    ("old_age_security", 2.0, 3.2),
    ("children_benefits", 2.0, -0.5),
    ("employment_insurance", 1.5, 0.5),
    ("equalization", 3.5, 0.0),
    ("national_defence", 2.5, 0.0),
    ("indigenous_services", 3.0, 1.8),
    ("infrastructure", 2.0, 0.0),
    ("other_programs", 1.5, 0.0),
];

pub fn default_revenue_elasticity() -> BTreeMap<SourceId, f64> {
    DEFAULT_ELASTICITIES
        .iter()
        .map(|(id, e)| (id.to_string(), *e))
        .collect()
}

pub fn default_spending_growth() -> BTreeMap<CategoryId, SpendingGrowthProfile> {
    DEFAULT_SPENDING_GROWTH
        .iter()
        .map(|(id, baseline, demographic)| {
            (
                id.to_string(),
                SpendingGrowthProfile {
                    baseline: *baseline,
                    demographic: *demographic,
                },
            )
        })
        .collect()
}

fn economic_preset(gdp_real: f64, inflation: f64, interest_rate: f64, population: f64) -> Preset {
    Preset {
        planning: None,
        economic: Some(EconomicPatch {
            gdp_real: Some(gdp_real),
            inflation: Some(inflation),
            interest_rate: Some(interest_rate),
            population: Some(population),
        }),
    }
}

pub fn builtin_presets() -> BTreeMap<String, Preset> {
    let mut presets = BTreeMap::new();
    presets.insert("baseline".to_string(), economic_preset(1.8, 2.0, 3.0, 1.0));
    presets.insert("optimistic".to_string(), economic_preset(2.6, 2.0, 2.6, 1.2));
    presets.insert("pessimistic".to_string(), economic_preset(0.9, 2.8, 4.1, 0.8));
    presets.insert("recession".to_string(), economic_preset(-1.5, 1.2, 2.2, 0.9));
    presets.insert(
        "long-term".to_string(),
        Preset {
            planning: Some(PlanningPatch {
                base_year: None,
                horizon_years: Some(25),
            }),
            economic: Some(EconomicPatch {
                gdp_real: Some(1.6),
                inflation: Some(2.0),
                interest_rate: None,
                population: Some(0.9),
            }),
        },
    );
    presets
}

pub fn factory_settings() -> ProjectionSettings {
    ProjectionSettings {
        revenue_elasticity: default_revenue_elasticity(),
        spending_growth: default_spending_growth(),
        ..ProjectionSettings::default()
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    state: Arc<ProjectionSettings>,
    presets: BTreeMap<String, Preset>,
    growth_defaults: BTreeMap<CategoryId, SpendingGrowthProfile>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(factory_settings())
    }
}

impl SettingsStore {
    pub fn new(settings: ProjectionSettings) -> Self {
        Self {
            state: Arc::new(settings),
            presets: builtin_presets(),
            growth_defaults: default_spending_growth(),
        }
    }

    pub fn snapshot(&self) -> Arc<ProjectionSettings> {
        Arc::clone(&self.state)
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.state
    }

    pub fn replace(&mut self, settings: ProjectionSettings) {
        self.state = Arc::new(settings);
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(preset) = self.presets.get(name).copied() else {
            warn!(preset = name, "unknown preset ignored");
            return false;
        };

        let state = Arc::make_mut(&mut self.state);
        if let Some(planning) = preset.planning {
            let mut next = state.planning;
            if let Some(v) = planning.base_year {
                next.base_year = v;
            }
            if let Some(v) = planning.horizon_years {
                next.horizon_years = v;
            }
            state.planning = next;
        }
        if let Some(economic) = preset.economic {
            let mut next = state.economic;
            if let Some(v) = economic.gdp_real {
                next.gdp_real = v;
            }
            if let Some(v) = economic.inflation {
                next.inflation = v;
            }
            if let Some(v) = economic.interest_rate {
                next.interest_rate = v;
            }
            if let Some(v) = economic.population {
                next.population = v;
            }
            state.economic = next;
        }
        debug!(preset = name, "preset applied");
        true
    }

    pub fn reset_spending_growth_key(&mut self, key: &str) {
        let restored = self.growth_defaults.get(key).copied();
        let state = Arc::make_mut(&mut self.state);
        match restored {
            Some(profile) => {
                state.spending_growth.insert(key.to_string(), profile);
            }
            None => {
                state.spending_growth.remove(key);
            }
        }
    }

    pub fn reset_all_spending_growth(&mut self) {
        let defaults = self.growth_defaults.clone();
        Arc::make_mut(&mut self.state).spending_growth = defaults;
    }

    pub fn set_revenue_plan(&mut self, source: &str, plan: RevenuePlan) {
        Arc::make_mut(&mut self.state)
            .revenue_plans
            .insert(source.to_string(), plan);
    }

    pub fn set_spending_plan(&mut self, category: &str, plan: SpendingPlan) {
        Arc::make_mut(&mut self.state)
            .spending_plans
            .insert(category.to_string(), plan);
    }

    pub fn clear_plan(&mut self, id: &str, kind: PlanKind) {
        let state = Arc::make_mut(&mut self.state);
        match kind {
            PlanKind::Revenue => {
                state.revenue_plans.remove(id);
            }
            PlanKind::Spending => {
                state.spending_plans.remove(id);
            }
        }
    }

    pub fn planned_rate_for_year(
        &self,
        source: &str,
        year: i32,
        fallback: Option<f64>,
    ) -> Option<f64> {
        let Some(plan) = self.state.revenue_plans.get(source) else {
            return fallback;
        };
        if let Some(point) = plan.points.get(&year) {
            return Some(*point);
        }
        if let Some(rule) = plan.active_rule() {
            // Linear from the global base year, not the rule's own start.
            let elapsed = f64::from(year) - f64::from(self.state.planning.base_year);
            return Some(rule.start_rate + elapsed * rule.annual_delta_pct);
        }
        fallback
    }

    pub fn planned_factor_for_year(
        &self,
        category: &str,
        year: i32,
        fallback: Option<f64>,
    ) -> Option<f64> {
        let Some(plan) = self.state.spending_plans.get(category) else {
            return fallback;
        };
        if let Some(point) = plan.points.get(&year) {
            return Some(*point);
        }
        if let Some(ongoing) = plan.ongoing_level_pct {
            return fallback.map(|f| f * (1.0 + ongoing / 100.0));
        }

        let Some(rule) = plan.active_rule() else {
            let start_year = plan.start_year.unwrap_or(self.state.planning.base_year);
            return match plan.level_shift_pct {
                Some(shift) if year >= start_year => fallback.map(|f| f * (1.0 + shift / 100.0)),
                _ => fallback,
            };
        };

        if year < rule.start_year {
            return fallback;
        }
        let start = match plan.level_shift_pct {
            Some(shift) => rule.start_factor * (1.0 + shift / 100.0),
            None => rule.start_factor,
        };
        let step = 1.0 + rule.annual_delta_pct / 100.0;
        let elapsed = i64::from(year) - i64::from(rule.start_year);
        let factor = match i32::try_from(elapsed) {
            Ok(n) => step.powi(n),
            Err(_) => step.powf(elapsed as f64),
        };
        Some(start * factor)
    }
}
