use std::collections::BTreeMap;

use tracing::debug;

use super::round::{to2, to4};
use super::types::{
    BaseBudgetSnapshot, CategoryId, CategoryUserDelta, EconomicAssumptions, ProjectionSettings,
    ProjectionSummary, ProjectionYear, SourceId, SpendingGrowthProfile,
};

const NOMINAL_GROWTH_FLOOR: f64 = -0.99;
const PROGRAM_GROWTH_FLOOR_PCT: f64 = -90.0;
const DEFAULT_ELASTICITY: f64 = 1.0;
pub const MAX_HORIZON_YEARS: i32 = 200;

#[derive(Debug, Clone, Copy)]
pub struct YearBasis<'a> {
    pub gdp: f64,
    pub revenue_by_source: &'a BTreeMap<SourceId, f64>,
    pub spending_by_category: &'a BTreeMap<CategoryId, f64>,
}

impl<'a> From<&'a BaseBudgetSnapshot> for YearBasis<'a> {
    fn from(base: &'a BaseBudgetSnapshot) -> Self {
        Self {
            gdp: base.gdp,
            revenue_by_source: &base.revenues_by_source,
            spending_by_category: &base.spending_by_category,
        }
    }
}

impl<'a> From<&'a ProjectionYear> for YearBasis<'a> {
    fn from(year: &'a ProjectionYear) -> Self {
        Self {
            gdp: year.gdp,
            revenue_by_source: &year.revenue_by_source,
            spending_by_category: &year.spending_by_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueProjection {
    pub total: f64,
    pub by_source: BTreeMap<SourceId, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingProjection {
    pub total: f64,
    pub by_category: BTreeMap<CategoryId, f64>,
}

// Real growth and inflation are added rather than compounded.
pub fn calc_nominal_gdp(prev_gdp: f64, economic: &EconomicAssumptions) -> f64 {
    let growth = ((economic.gdp_real + economic.inflation) / 100.0).max(NOMINAL_GROWTH_FLOOR);
    to2(prev_gdp * (1.0 + growth))
}

pub fn calc_revenue(
    prev: YearBasis<'_>,
    next_gdp: f64,
    elasticity: &BTreeMap<SourceId, f64>,
    inflation_pct: f64,
) -> RevenueProjection {
    let gdp_ratio = if prev.gdp > 0.0 {
        next_gdp / prev.gdp
    } else {
        1.0
    };
    let indexation = 1.0 + inflation_pct / 100.0;

    let by_source = prev
        .revenue_by_source
        .iter()
        .map(|(id, prev_value)| {
            let e = elasticity.get(id).copied().unwrap_or(DEFAULT_ELASTICITY);
            (id.clone(), to2(prev_value * indexation * gdp_ratio.powf(e)))
        })
        .collect::<BTreeMap<_, _>>();

    // Sum of already-rounded values, then rounded again.
    let total = to2(by_source.values().sum::<f64>());
    RevenueProjection { total, by_source }
}

pub fn calc_program_spending(
    prev: YearBasis<'_>,
    growth: &BTreeMap<CategoryId, SpendingGrowthProfile>,
    deltas: &BTreeMap<CategoryId, CategoryUserDelta>,
) -> SpendingProjection {
    let by_category = prev
        .spending_by_category
        .iter()
        .map(|(id, prev_value)| {
            let profile = growth.get(id).copied().unwrap_or_default();
            let delta = deltas.get(id).copied().unwrap_or_default();
            let growth_pct = (profile.baseline + profile.demographic + delta.growth_delta)
                .max(PROGRAM_GROWTH_FLOOR_PCT);
            let factor = 1.0 + growth_pct / 100.0;
            let level_adj = if delta.ongoing {
                1.0 + delta.level / 100.0
            } else {
                1.0
            };
            (id.clone(), to2(prev_value * factor * level_adj))
        })
        .collect::<BTreeMap<_, _>>();

    let total = to2(by_category.values().sum::<f64>());
    SpendingProjection { total, by_category }
}

pub fn calc_interest(debt_bop: f64, avg_rate_pct: f64) -> f64 {
    to2((avg_rate_pct / 100.0).max(0.0) * debt_bop)
}

pub fn calc_debt(debt_bop: f64, deficit: f64) -> f64 {
    to2(debt_bop + deficit)
}

pub(crate) fn debt_to_gdp(debt: f64, gdp: f64) -> f64 {
    if gdp > 0.0 { to4(debt / gdp) } else { 0.0 }
}

pub fn project_all(
    base: Option<&BaseBudgetSnapshot>,
    settings: Option<&ProjectionSettings>,
) -> Vec<ProjectionYear> {
    let (Some(base), Some(settings)) = (base, settings) else {
        debug!("projection skipped: base snapshot or settings missing");
        return Vec::new();
    };

    let horizon = settings.planning.horizon_years.max(1) as usize;
    let base_year = settings.planning.base_year;
    let economic = &settings.economic;

    let mut years = Vec::with_capacity(horizon.min(MAX_HORIZON_YEARS as usize));
    years.push(seed_year(base, base_year, economic.interest_rate));

    for offset in 1..horizon {
        let prev = &years[offset - 1];
        let next = project_next_year(prev, settings);
        years.push(next);
    }

    debug!(
        base_year,
        horizon,
        final_debt = years[years.len() - 1].debt,
        "projection complete"
    );
    years
}

fn seed_year(base: &BaseBudgetSnapshot, year: i32, interest_rate: f64) -> ProjectionYear {
    let revenue_total = to2(base.revenues_by_source.values().sum::<f64>());
    let program_spending = to2(base.spending_by_category.values().sum::<f64>());
    let interest = calc_interest(base.debt, interest_rate);
    let spending_total = to2(program_spending + interest);
    let deficit = to2(spending_total - revenue_total);
    let debt = calc_debt(base.debt, deficit);

    ProjectionYear {
        year,
        gdp: base.gdp,
        revenue_by_source: base.revenues_by_source.clone(),
        revenue_total,
        spending_by_category: base.spending_by_category.clone(),
        program_spending,
        interest,
        spending_total,
        deficit,
        debt,
        debt_to_gdp: debt_to_gdp(debt, base.gdp),
    }
}

fn project_next_year(prev: &ProjectionYear, settings: &ProjectionSettings) -> ProjectionYear {
    let economic = &settings.economic;
    let gdp = calc_nominal_gdp(prev.gdp, economic);
    // The GDP ratio is already nominal, so revenue gets no separate indexation.
    let revenue = calc_revenue(prev.into(), gdp, &settings.revenue_elasticity, 0.0);
    let spending =
        calc_program_spending(prev.into(), &settings.spending_growth, &settings.user_deltas);
    let interest = calc_interest(prev.debt, economic.interest_rate);
    let spending_total = to2(spending.total + interest);
    let deficit = to2(spending_total - revenue.total);
    let debt = calc_debt(prev.debt, deficit);

    ProjectionYear {
        year: prev.year.saturating_add(1),
        gdp,
        revenue_by_source: revenue.by_source,
        revenue_total: revenue.total,
        spending_by_category: spending.by_category,
        program_spending: spending.total,
        interest,
        spending_total,
        deficit,
        debt,
        debt_to_gdp: debt_to_gdp(debt, gdp),
    }
}

pub fn summarize(years: &[ProjectionYear]) -> Option<ProjectionSummary> {
    let first = years.first()?;
    let last = years.last()?;

    let cumulative_deficit = to2(years.iter().map(|y| y.deficit).sum::<f64>());
    let peak_debt_to_gdp = years
        .iter()
        .map(|y| y.debt_to_gdp)
        .fold(f64::NEG_INFINITY, f64::max);
    let surplus_years = years.iter().filter(|y| y.deficit < 0.0).count() as u32;

    Some(ProjectionSummary {
        first_year: first.year,
        last_year: last.year,
        cumulative_deficit,
        final_debt: last.debt,
        final_debt_to_gdp: last.debt_to_gdp,
        peak_debt_to_gdp,
        surplus_years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PlanningSettings;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use std::fs;
    use std::path::Path;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn assert_golden_snapshot(path: &str, actual: &str) {
        let update = matches!(
            std::env::var("UPDATE_GOLDEN").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );
        let snapshot_path = Path::new(path);

        if update {
            if let Some(parent) = snapshot_path.parent() {
                fs::create_dir_all(parent).expect("failed to create snapshot directory");
            }
            fs::write(snapshot_path, actual).expect("failed to write golden snapshot");
            return;
        }

        let expected = fs::read_to_string(snapshot_path).unwrap_or_else(|_| {
            panic!("missing golden snapshot at {path}; run with UPDATE_GOLDEN=1 to generate")
        });
        assert_eq!(
            actual, expected,
            "snapshot mismatch for {path}; run with UPDATE_GOLDEN=1 to refresh if expected"
        );
    }

    fn reference_base() -> BaseBudgetSnapshot {
        BaseBudgetSnapshot {
            gdp: 1_000.0,
            debt: 500.0,
            revenues_by_source: BTreeMap::from([("a".to_string(), 100.0)]),
            spending_by_category: BTreeMap::from([("x".to_string(), 90.0)]),
        }
    }

    fn reference_settings() -> ProjectionSettings {
        ProjectionSettings {
            planning: PlanningSettings {
                base_year: 2024,
                horizon_years: 2,
            },
            economic: EconomicAssumptions {
                gdp_real: 2.0,
                inflation: 2.0,
                interest_rate: 4.0,
                population: 0.0,
            },
            revenue_elasticity: BTreeMap::from([("a".to_string(), 1.0)]),
            spending_growth: BTreeMap::from([(
                "x".to_string(),
                SpendingGrowthProfile {
                    baseline: 0.0,
                    demographic: 0.0,
                },
            )]),
            ..ProjectionSettings::default()
        }
    }

    fn canadian_base() -> BaseBudgetSnapshot {
        BaseBudgetSnapshot {
            gdp: 2_950.0,
            debt: 1_236.0,
            revenues_by_source: BTreeMap::from([
                ("personal_income_tax".to_string(), 217.7),
                ("corporate_income_tax".to_string(), 82.5),
                ("gst".to_string(), 51.4),
                ("excise_taxes".to_string(), 12.3),
                ("ei_premiums".to_string(), 29.8),
            ]),
            spending_by_category: BTreeMap::from([
                ("health_transfer".to_string(), 52.1),
                ("old_age_security".to_string(), 76.0),
                ("national_defence".to_string(), 33.0),
                ("children_benefits".to_string(), 26.8),
            ]),
        }
    }

    #[test]
    fn reference_scenario_matches_hand_calculation() {
        let years = project_all(Some(&reference_base()), Some(&reference_settings()));
        assert_eq!(years.len(), 2);

        let y0 = &years[0];
        assert_eq!(y0.year, 2024);
        assert_approx(y0.gdp, 1_000.0);
        assert_approx(y0.revenue_total, 100.0);
        assert_approx(y0.program_spending, 90.0);
        assert_approx(y0.interest, 20.0);
        assert_approx(y0.spending_total, 110.0);
        assert_approx(y0.deficit, 10.0);
        assert_approx(y0.debt, 510.0);
        assert_approx(y0.debt_to_gdp, 0.51);

        // Hand calculation:
        // GDP 1000 * 1.04 = 1040; revenue 100 * (1040/1000)^1 = 104
        // interest 4% of 510 = 20.4; total 110.4; deficit 6.4; debt 516.4
        let y1 = &years[1];
        assert_eq!(y1.year, 2025);
        assert_approx(y1.gdp, 1_040.0);
        assert_approx(y1.revenue_by_source["a"], 104.0);
        assert_approx(y1.revenue_total, 104.0);
        assert_approx(y1.spending_by_category["x"], 90.0);
        assert_approx(y1.program_spending, 90.0);
        assert_approx(y1.interest, 20.4);
        assert_approx(y1.spending_total, 110.4);
        assert_approx(y1.deficit, 6.4);
        assert_approx(y1.debt, 516.4);
        assert_approx(y1.debt_to_gdp, 0.4965);
    }

    #[test]
    fn golden_snapshot_reference_projection_json() {
        let years = project_all(Some(&reference_base()), Some(&reference_settings()));
        let json = format!(
            "{}\n",
            serde_json::to_string(&years).expect("projection should serialize")
        );
        assert_golden_snapshot("tests/golden/reference_projection.json", &json);
    }

    #[test]
    fn year_counter_saturates_at_the_end_of_the_calendar() {
        let mut settings = reference_settings();
        settings.planning.base_year = i32::MAX;
        let years = project_all(Some(&reference_base()), Some(&settings));
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, i32::MAX);
        assert_eq!(years[1].year, i32::MAX);
        assert_approx(years[1].debt, 516.4);
    }

    #[test]
    fn missing_base_or_settings_yields_empty_projection() {
        let base = reference_base();
        let settings = reference_settings();
        assert!(project_all(None, Some(&settings)).is_empty());
        assert!(project_all(Some(&base), None).is_empty());
        assert!(project_all(None, None).is_empty());
    }

    #[test]
    fn non_positive_horizon_is_coerced_to_one_year() {
        let base = reference_base();
        let mut settings = reference_settings();
        for horizon in [0, -3] {
            settings.planning.horizon_years = horizon;
            let years = project_all(Some(&base), Some(&settings));
            assert_eq!(years.len(), 1);
            assert_eq!(years[0].year, 2024);
        }
    }

    #[test]
    fn single_year_passes_base_values_through() {
        let base = canadian_base();
        let mut settings = reference_settings();
        settings.planning.horizon_years = 1;
        settings.economic.gdp_real = 25.0;

        let years = project_all(Some(&base), Some(&settings));
        assert_eq!(years.len(), 1);
        let y0 = &years[0];
        assert_eq!(y0.gdp, base.gdp);
        assert_eq!(y0.revenue_by_source, base.revenues_by_source);
        assert_eq!(y0.spending_by_category, base.spending_by_category);
        assert_approx(y0.interest, to2(base.debt * 0.04));
        assert_approx(y0.spending_total, to2(y0.program_spending + y0.interest));
        assert_approx(y0.deficit, to2(y0.spending_total - y0.revenue_total));
        assert_approx(y0.debt, to2(base.debt + y0.deficit));
    }

    #[test]
    fn nominal_gdp_growth_is_floored_at_minus_ninety_nine_percent() {
        let economic = EconomicAssumptions {
            gdp_real: -500.0,
            inflation: 0.0,
            interest_rate: 0.0,
            population: 0.0,
        };
        assert_approx(calc_nominal_gdp(1_000.0, &economic), 10.0);
    }

    #[test]
    fn nominal_gdp_adds_real_growth_and_inflation() {
        let economic = EconomicAssumptions {
            gdp_real: 1.5,
            inflation: 2.5,
            interest_rate: 0.0,
            population: 0.0,
        };
        assert_approx(calc_nominal_gdp(2_000.0, &economic), 2_080.0);
    }

    #[test]
    fn revenue_uses_unit_ratio_when_previous_gdp_is_zero() {
        let revenue = BTreeMap::from([("gst".to_string(), 50.0)]);
        let spending = BTreeMap::new();
        let prev = YearBasis {
            gdp: 0.0,
            revenue_by_source: &revenue,
            spending_by_category: &spending,
        };
        let out = calc_revenue(prev, 1_000.0, &BTreeMap::new(), 0.0);
        assert_approx(out.by_source["gst"], 50.0);
        assert_approx(out.total, 50.0);
    }

    #[test]
    fn revenue_applies_elasticity_and_indexation() {
        let revenue = BTreeMap::from([
            ("pit".to_string(), 200.0),
            ("excise".to_string(), 10.0),
        ]);
        let spending = BTreeMap::new();
        let prev = YearBasis {
            gdp: 1_000.0,
            revenue_by_source: &revenue,
            spending_by_category: &spending,
        };
        let elasticity = BTreeMap::from([
            ("pit".to_string(), 2.0),
            ("excise".to_string(), 0.0),
        ]);

        let out = calc_revenue(prev, 1_100.0, &elasticity, 2.0);
        // pit: 200 * 1.02 * 1.1^2 = 246.84; excise: 10 * 1.02 * 1 = 10.2
        assert_approx(out.by_source["pit"], 246.84);
        assert_approx(out.by_source["excise"], 10.2);
        assert_approx(out.total, 257.04);
    }

    #[test]
    fn revenue_total_sums_rounded_components() {
        let revenue = BTreeMap::from([
            ("a".to_string(), 0.005),
            ("b".to_string(), 0.005),
            ("c".to_string(), 0.005),
        ]);
        let spending = BTreeMap::new();
        let prev = YearBasis {
            gdp: 100.0,
            revenue_by_source: &revenue,
            spending_by_category: &spending,
        };
        let out = calc_revenue(prev, 100.0, &BTreeMap::new(), 0.0);
        // Each source rounds to 0.01 so the total is 0.03, not round(0.015) = 0.02.
        for value in out.by_source.values() {
            assert_approx(*value, 0.01);
        }
        assert_approx(out.total, 0.03);
    }

    #[test]
    fn program_spending_combines_profile_delta_and_level() {
        let spending = BTreeMap::from([
            ("health".to_string(), 100.0),
            ("defence".to_string(), 50.0),
            ("arts".to_string(), 10.0),
        ]);
        let revenue = BTreeMap::new();
        let prev = YearBasis {
            gdp: 1_000.0,
            revenue_by_source: &revenue,
            spending_by_category: &spending,
        };
        let growth = BTreeMap::from([(
            "health".to_string(),
            SpendingGrowthProfile {
                baseline: 3.0,
                demographic: 1.0,
            },
        )]);
        let deltas = BTreeMap::from([
            (
                "defence".to_string(),
                CategoryUserDelta {
                    level: 10.0,
                    growth_delta: 2.0,
                    ongoing: true,
                },
            ),
            (
                "arts".to_string(),
                CategoryUserDelta {
                    level: 50.0,
                    growth_delta: 0.0,
                    ongoing: false,
                },
            ),
        ]);

        let out = calc_program_spending(prev, &growth, &deltas);
        assert_approx(out.by_category["health"], 104.0);
        // 50 * 1.02 * 1.10
        assert_approx(out.by_category["defence"], 56.1);
        // One-off level shifts are not applied by the recurrence.
        assert_approx(out.by_category["arts"], 10.0);
        assert_approx(out.total, 170.1);
    }

    #[test]
    fn program_spending_growth_is_floored_at_minus_ninety_percent() {
        let spending = BTreeMap::from([("ei".to_string(), 40.0)]);
        let revenue = BTreeMap::new();
        let prev = YearBasis {
            gdp: 1_000.0,
            revenue_by_source: &revenue,
            spending_by_category: &spending,
        };
        let deltas = BTreeMap::from([(
            "ei".to_string(),
            CategoryUserDelta {
                level: 0.0,
                growth_delta: -400.0,
                ongoing: true,
            },
        )]);
        let out = calc_program_spending(prev, &BTreeMap::new(), &deltas);
        assert_approx(out.by_category["ei"], 4.0);
    }

    #[test]
    fn next_year_functions_accept_base_snapshot() {
        let base = reference_base();
        let settings = reference_settings();
        let revenue = calc_revenue((&base).into(), 1_040.0, &settings.revenue_elasticity, 0.0);
        let spending = calc_program_spending(
            (&base).into(),
            &settings.spending_growth,
            &settings.user_deltas,
        );
        assert_approx(revenue.total, 104.0);
        assert_approx(spending.total, 90.0);
    }

    #[test]
    fn interest_rate_is_floored_at_zero() {
        assert_approx(calc_interest(1_000.0, -3.0), 0.0);
        assert_approx(calc_interest(1_000.0, 3.25), 32.5);
    }

    #[test]
    fn surplus_reduces_debt() {
        assert_approx(calc_debt(500.0, -12.345), 487.66);
    }

    #[test]
    fn debt_to_gdp_is_zero_when_gdp_is_not_positive() {
        let mut base = reference_base();
        base.gdp = 0.0;
        let years = project_all(Some(&base), Some(&reference_settings()));
        for year in &years {
            assert_eq!(year.debt_to_gdp, 0.0);
        }
    }

    #[test]
    fn years_are_consecutive_from_base_year() {
        let mut settings = reference_settings();
        settings.planning.base_year = 2026;
        settings.planning.horizon_years = 6;
        let years = project_all(Some(&canadian_base()), Some(&settings));
        let labels = years.iter().map(|y| y.year).collect::<Vec<_>>();
        assert_eq!(labels, vec![2026, 2027, 2028, 2029, 2030, 2031]);
    }

    #[test]
    fn summarize_reports_headline_figures() {
        let years = project_all(Some(&reference_base()), Some(&reference_settings()));
        let summary = summarize(&years).expect("non-empty projection");
        assert_eq!(summary.first_year, 2024);
        assert_eq!(summary.last_year, 2025);
        assert_approx(summary.cumulative_deficit, 16.4);
        assert_approx(summary.final_debt, 516.4);
        assert_approx(summary.final_debt_to_gdp, 0.4965);
        assert_approx(summary.peak_debt_to_gdp, 0.51);
        assert_eq!(summary.surplus_years, 0);
        assert!(summarize(&[]).is_none());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_projection_is_deterministic_and_horizon_sized(
            horizon in -5i32..40,
            gdp_real_bp in -1_000i32..1_000,
            inflation_bp in -500i32..1_500,
            rate_bp in -200i32..1_200,
            baseline_bp in -500i32..800,
            elasticity_pct in 0u32..250,
        ) {
            let mut settings = reference_settings();
            settings.planning.horizon_years = horizon;
            settings.economic.gdp_real = gdp_real_bp as f64 / 100.0;
            settings.economic.inflation = inflation_bp as f64 / 100.0;
            settings.economic.interest_rate = rate_bp as f64 / 100.0;
            settings.revenue_elasticity.insert("personal_income_tax".to_string(), elasticity_pct as f64 / 100.0);
            settings.spending_growth.insert(
                "health_transfer".to_string(),
                SpendingGrowthProfile { baseline: baseline_bp as f64 / 100.0, demographic: 0.5 },
            );
            let base = canadian_base();

            let first = project_all(Some(&base), Some(&settings));
            let second = project_all(Some(&base), Some(&settings));
            prop_assert_eq!(first.len(), horizon.max(1) as usize);
            prop_assert_eq!(&first, &second);

            for year in &first {
                prop_assert!(year.gdp.is_finite() && year.gdp > 0.0);
                prop_assert!(year.interest >= 0.0);
                prop_assert!(year.debt.is_finite());
            }
        }

        #[test]
        fn prop_unit_elasticity_tracks_gdp_ratio(
            horizon in 2i32..15,
            gdp_real_bp in -300i32..600,
            revenue_cents in 100u32..50_000_000,
        ) {
            let mut settings = reference_settings();
            settings.planning.horizon_years = horizon;
            settings.economic.gdp_real = gdp_real_bp as f64 / 100.0;
            settings.economic.inflation = 0.0;
            settings.revenue_elasticity.insert("a".to_string(), 1.0);
            let mut base = reference_base();
            base.revenues_by_source.insert("a".to_string(), revenue_cents as f64 / 100.0);

            let years = project_all(Some(&base), Some(&settings));
            for pair in years.windows(2) {
                let expected = pair[0].revenue_by_source["a"] * pair[1].gdp / pair[0].gdp;
                assert_approx_tol(pair[1].revenue_by_source["a"], expected, 0.01);
            }
        }

        #[test]
        fn prop_gdp_never_contracts_below_floor(
            gdp_real_bp in -100_000i32..0,
            inflation_bp in -10_000i32..0,
            prev_gdp_cents in 1u64..1_000_000_000,
        ) {
            let economic = EconomicAssumptions {
                gdp_real: gdp_real_bp as f64 / 100.0,
                inflation: inflation_bp as f64 / 100.0,
                interest_rate: 0.0,
                population: 0.0,
            };
            let prev = prev_gdp_cents as f64 / 100.0;
            let next = calc_nominal_gdp(prev, &economic);
            prop_assert!(next >= to2(prev * 0.01) - 1e-9);
        }
    }
}
