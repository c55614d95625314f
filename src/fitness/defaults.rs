use serde::Serialize;
use serde_json::Map;
use time::{macros::date, Date};

use crate::model::{
    MacroCategory, Meal, NutritionLog, StepsEntry, Tracking, TrackingStore, WaterEntry,
    WeightEntry, Workout,
};

/// Day the embedded dataset was recorded on.
pub const EMBEDDED_DAY: Date = date!(2026 - 02 - 21);

fn meal(name: &str, calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64, category: MacroCategory) -> Meal {
    Meal {
        name: Some(name.to_string()),
        date: Some(EMBEDDED_DAY),
        calories,
        protein_g,
        carbs_g,
        fat_g,
        category: Some(category),
        extra: Map::new(),
    }
}

/// Last resort of the fitness source chain.
pub fn embedded_store() -> TrackingStore {
    use MacroCategory::{Carbs, Protein};

    let meals = vec![
        meal("Matjesfilet", 200.0, 24.0, 0.0, 12.0, Protein),
        meal("Zwiebelrostbraten", 300.0, 20.0, 5.0, 20.0, Protein),
        meal("Vollmilch", 150.0, 6.6, 12.0, 8.0, Protein),
        meal("Haferflocken", 200.0, 8.0, 35.0, 6.0, Carbs),
        meal("Äpfel", 100.0, 0.5, 25.0, 0.0, Carbs),
        meal("Bratkartoffeln", 283.0, 5.0, 45.0, 10.0, Carbs),
    ];

    TrackingStore {
        tracking: Tracking {
            nutrition: NutritionLog { meals },
            water: vec![WaterEntry {
                date: Some(EMBEDDED_DAY),
                glasses: 7.4,
                ml: Some(1870.0),
            }],
            steps: vec![StepsEntry {
                date: Some(EMBEDDED_DAY),
                steps: 5000,
            }],
            workouts: vec![Workout {
                date: Some(EMBEDDED_DAY),
                equipment: "Concept 2".into(),
                duration_minutes: 20.0,
                calories_estimated: None,
                kind: Some("Cardio".into()),
                location: Some("Pellendorf".into()),
                extra: Map::new(),
            }],
            weight: vec![
                WeightEntry {
                    date: Some(EMBEDDED_DAY),
                    weight: Some(106.9),
                },
                WeightEntry {
                    date: Some(date!(2026 - 02 - 20)),
                    weight: Some(107.7),
                },
            ],
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedSession {
    pub equipment: &'static str,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub location: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklySchedule {
    pub monday: PlannedSession,
    pub tuesday: PlannedSession,
    pub wednesday: PlannedSession,
    pub thursday: PlannedSession,
    pub friday: PlannedSession,
    pub saturday: PlannedSession,
    pub sunday: PlannedSession,
}

const fn planned(equipment: &'static str, duration: u32, kind: &'static str, location: &'static str) -> PlannedSession {
    PlannedSession {
        equipment,
        duration,
        kind,
        location,
    }
}

pub fn weekly_schedule() -> WeeklySchedule {
    WeeklySchedule {
        monday: planned("Concept 2", 20, "Cardio", "Pellendorf"),
        tuesday: planned("Wi3 Ergometer", 25, "Cardio", "Maishofen"),
        wednesday: planned("Finnlo Bio Force", 25, "Kraft", "Pellendorf"),
        thursday: planned("Wi3 Ergometer", 25, "Cardio", "Maishofen"),
        friday: planned("Concept 2", 20, "Cardio", "Pellendorf"),
        saturday: planned("Hammer Varon xtr", 30, "Cardio", "Pellendorf"),
        sunday: planned("Ruhetag", 0, "Rest", "Spaziergang"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_meals_add_up_to_the_default_calories() {
        let store = embedded_store();
        let total: f64 = store.tracking.nutrition.meals.iter().map(|m| m.calories).sum();
        assert_eq!(total, 1233.0);
        assert!(store
            .tracking
            .nutrition
            .meals
            .iter()
            .all(|m| m.date == Some(EMBEDDED_DAY)));
    }

    #[test]
    fn schedule_serializes_days_in_order() {
        let json = serde_json::to_string(&weekly_schedule()).unwrap();
        let monday = json.find("monday").unwrap();
        let sunday = json.find("sunday").unwrap();
        assert!(monday < sunday);
        assert!(json.contains(r#""type":"Rest""#));
    }
}
