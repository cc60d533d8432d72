use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::debug;

use super::engine::{calc_debt, debt_to_gdp};
use super::round::to2;
use super::types::{ProjectionYear, Scenario, YearOverlay};

const ID_SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Default)]
pub struct YearOverlayStore {
    overlays_by_year: BTreeMap<String, Arc<YearOverlay>>,
    scenarios: Vec<Scenario>,
    id_counter: u64,
}

impl YearOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&mut self, year: impl Display) -> Arc<YearOverlay> {
        let entry = self.overlays_by_year.entry(year.to_string()).or_default();
        Arc::clone(entry)
    }

    pub fn existing_overlay(&self, year: impl Display) -> Option<Arc<YearOverlay>> {
        self.overlays_by_year.get(&year.to_string()).cloned()
    }

    pub fn set_revenue_delta(&mut self, year: impl Display, key: &str, pct: f64) {
        let current = self.overlay(&year);
        let mut next = YearOverlay::clone(&current);
        next.revenue_pct.insert(key.to_string(), pct);
        self.overlays_by_year.insert(year.to_string(), Arc::new(next));
    }

    pub fn set_spending_delta(&mut self, year: impl Display, key: &str, pct: f64) {
        let current = self.overlay(&year);
        let mut next = YearOverlay::clone(&current);
        next.spending_pct.insert(key.to_string(), pct);
        self.overlays_by_year.insert(year.to_string(), Arc::new(next));
    }

    pub fn reset_year(&mut self, year: impl Display) {
        self.overlays_by_year
            .insert(year.to_string(), Arc::new(YearOverlay::default()));
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn save_scenario(&mut self, year: impl Display, name: Option<&str>) -> String {
        let year = year.to_string();
        let overlay = YearOverlay::clone(&self.overlay(&year));
        let created_at = Utc::now();
        let id = self.next_id(created_at.timestamp_millis());
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!(
                "Scenario {year} ({})",
                created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ),
        };

        debug!(scenario_id = %id, year = %year, "scenario saved");
        self.scenarios.push(Scenario {
            id: id.clone(),
            year,
            name,
            overlay,
            created_at,
        });
        id
    }

    pub fn load_scenario(&mut self, id: &str) -> bool {
        let Some(scenario) = self.scenarios.iter().find(|s| s.id == id) else {
            debug!(scenario_id = id, "scenario not found");
            return false;
        };
        self.overlays_by_year.insert(
            scenario.year.clone(),
            Arc::new(scenario.overlay.clone()),
        );
        true
    }

    pub fn delete_scenario(&mut self, id: &str) {
        self.scenarios.retain(|s| s.id != id);
    }

    fn next_id(&mut self, epoch_ms: i64) -> String {
        self.id_counter = self.id_counter.wrapping_add(1);
        let seed = splitmix64((epoch_ms as u64) ^ self.id_counter.rotate_left(32))
            ^ std::process::id() as u64;
        let mut rng = IdRng::new(seed);
        let suffix = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[(rng.next_u64() % 36) as usize] as char)
            .collect::<String>();
        format!("ys_{epoch_ms}_{suffix}")
    }
}

// Each year is adjusted on its own: the opening debt comes from the unadjusted record, so an
// overlay on one year does not carry into the debt of later years.
pub fn apply_overlay(record: &ProjectionYear, overlay: &YearOverlay) -> ProjectionYear {
    let revenue_by_source = scale_by_pct(&record.revenue_by_source, &overlay.revenue_pct);
    let spending_by_category = scale_by_pct(&record.spending_by_category, &overlay.spending_pct);

    let revenue_total = to2(revenue_by_source.values().sum::<f64>());
    let program_spending = to2(spending_by_category.values().sum::<f64>());
    let spending_total = to2(program_spending + record.interest);
    let deficit = to2(spending_total - revenue_total);
    let opening_debt = to2(record.debt - record.deficit);
    let debt = calc_debt(opening_debt, deficit);

    ProjectionYear {
        year: record.year,
        gdp: record.gdp,
        revenue_by_source,
        revenue_total,
        spending_by_category,
        program_spending,
        interest: record.interest,
        spending_total,
        deficit,
        debt,
        debt_to_gdp: debt_to_gdp(debt, record.gdp),
    }
}

fn scale_by_pct(
    values: &BTreeMap<String, f64>,
    pct: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(key, value)| {
            let adj = pct.get(key).copied().unwrap_or(0.0);
            (key.clone(), to2(value * (1.0 + adj / 100.0)))
        })
        .collect()
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

struct IdRng {
    state: u64,
}

impl IdRng {
    fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            0xA5A5_A5A5_A5A5_A5A5
        } else {
            seed
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}
