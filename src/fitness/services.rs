use serde::Serialize;
use time::{Date, Duration};

use crate::config::{DayDefaults, Goals};
use crate::model::{round_half_up, Meal, TrackingStore, Workout};

pub const ML_PER_GLASS: f64 = 250.0;

/// One tracked facet of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Nutrition,
    Hydration,
    Steps,
    Weight,
}

/// Entries of one day, with per-domain defaults already filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyFacts {
    pub date: Date,
    pub meals: Vec<Meal>,
    pub water_glasses: f64,
    pub steps: u32,
    pub workouts: Vec<Workout>,
    pub weight: f64,
    pub previous_weight: f64,
    /// Domains whose values are synthesized rather than recorded.
    pub defaulted: Vec<Domain>,
}

pub fn select_for_date(store: &TrackingStore, date: Date, defaults: &DayDefaults) -> DailyFacts {
    let tracking = &store.tracking;
    let on = |d: Option<Date>| d == Some(date);
    let yesterday = date - Duration::days(1);
    let mut defaulted = Vec::new();

    let meals: Vec<Meal> = tracking
        .nutrition
        .meals
        .iter()
        .filter(|m| on(m.date))
        .cloned()
        .collect();
    if meals.is_empty() {
        defaulted.push(Domain::Nutrition);
    }

    let water_glasses = match tracking.water.iter().find(|w| on(w.date)) {
        Some(entry) => entry.glasses,
        None => {
            defaulted.push(Domain::Hydration);
            defaults.water_glasses
        }
    };

    let steps = match tracking.steps.iter().find(|s| on(s.date)) {
        Some(entry) => entry.steps,
        None => {
            defaulted.push(Domain::Steps);
            defaults.steps
        }
    };

    let workouts = tracking
        .workouts
        .iter()
        .filter(|w| on(w.date))
        .cloned()
        .collect();

    let weight_on = |day: Date| {
        tracking
            .weight
            .iter()
            .filter(|w| w.date == Some(day))
            .find_map(|w| w.weight)
    };
    let current = weight_on(date);
    let previous = weight_on(yesterday);
    if current.is_none() || previous.is_none() {
        defaulted.push(Domain::Weight);
    }

    DailyFacts {
        date,
        meals,
        water_glasses,
        steps,
        workouts,
        weight: current.unwrap_or(defaults.weight),
        previous_weight: previous.unwrap_or(defaults.previous_weight),
        defaulted,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub protein_sources: Vec<Meal>,
    pub carb_sources: Vec<Meal>,
    pub fat_sources: Vec<Meal>,
}

/// Sums macros over the day's meals. An empty day reports the defaults, not zeros.
pub fn aggregate(meals: &[Meal], defaults: &DayDefaults) -> Totals {
    let pick = |f: fn(&Meal) -> bool| -> Vec<Meal> {
        meals.iter().filter(|m| f(m)).cloned().collect()
    };
    let protein_sources = pick(Meal::is_protein_source);
    let carb_sources = pick(Meal::is_carb_source);
    let fat_sources = pick(Meal::is_fat_source);

    if meals.is_empty() {
        return Totals {
            calories: defaults.calories,
            protein: defaults.protein,
            carbs: defaults.carbs,
            fat: defaults.fat,
            protein_sources,
            carb_sources,
            fat_sources,
        };
    }

    Totals {
        calories: meals.iter().map(|m| m.calories).sum(),
        protein: meals.iter().map(|m| m.protein_g).sum(),
        carbs: meals.iter().map(|m| m.carbs_g).sum(),
        fat: meals.iter().map(|m| m.fat_g).sum(),
        protein_sources,
        carb_sources,
        fat_sources,
    }
}

pub fn water_ml(glasses: f64) -> f64 {
    round_half_up(glasses * ML_PER_GLASS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Decreasing,
    Increasing,
    Stable,
}

impl WeightTrend {
    pub fn from_change(change: f64) -> Self {
        if change < 0.0 {
            WeightTrend::Decreasing
        } else if change > 0.0 {
            WeightTrend::Increasing
        } else {
            WeightTrend::Stable
        }
    }
}

/// Fully resolved, gap-filled view of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub date: Date,
    pub totals: Totals,
    pub meals: Vec<Meal>,
    pub water_glasses: f64,
    pub water_ml: f64,
    pub steps: u32,
    pub workouts: Vec<Workout>,
    pub weight: f64,
    pub previous_weight: f64,
    pub weight_change: f64,
    pub trend: WeightTrend,
    pub goals: Goals,
    pub defaulted: Vec<Domain>,
}

pub fn build_snapshot(
    store: &TrackingStore,
    date: Date,
    defaults: &DayDefaults,
    goals: &Goals,
) -> Snapshot {
    let facts = select_for_date(store, date, defaults);
    let totals = aggregate(&facts.meals, defaults);
    let weight_change = facts.weight - facts.previous_weight;

    Snapshot {
        date,
        totals,
        meals: facts.meals,
        water_glasses: facts.water_glasses,
        water_ml: water_ml(facts.water_glasses),
        steps: facts.steps,
        workouts: facts.workouts,
        weight: facts.weight,
        previous_weight: facts.previous_weight,
        weight_change,
        trend: WeightTrend::from_change(weight_change),
        goals: *goals,
        defaulted: facts.defaulted,
    }
}
