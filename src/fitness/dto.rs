use serde::{Deserialize, Serialize};
use time::Date;

use crate::config::ProfileConfig;
use crate::fitness::defaults::{weekly_schedule, WeeklySchedule};
use crate::fitness::services::{Domain, Snapshot, WeightTrend};
use crate::model::{iso_date, Meal, Workout};
use crate::source::SourceLabel;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct FitnessResponse {
    pub success: bool,
    pub source: SourceLabel,
    pub data: FitnessData,
}

/// Body of a rejected request, e.g. a `date` that is not `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct FitnessError {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessData {
    pub user: UserSummary,
    pub today: TodaySummary,
    pub tracking: TrackingSummary,
    pub weekly_schedule: WeeklySchedule,
    /// Domains filled from defaults instead of recorded entries.
    pub defaulted: Vec<Domain>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub start_weight: f64,
    pub current_weight: f64,
    pub yesterday_weight: f64,
    pub weight_change: f64,
    pub target_weight: f64,
    pub age: u32,
    pub height: f64,
    pub location: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water_glasses: f64,
    pub water_ml: f64,
    pub steps: u32,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub water_goal: f64,
    pub step_goal: u32,
}

#[derive(Debug, Serialize)]
pub struct TrackingSummary {
    pub nutrition: NutritionSummary,
    pub hydration: HydrationSummary,
    pub activity: ActivitySummary,
    pub weight: WeightSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals: Vec<Meal>,
    pub protein_sources: Vec<Meal>,
    pub carb_sources: Vec<Meal>,
    pub fat_sources: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct HydrationSummary {
    pub glasses: f64,
    pub ml: f64,
}

#[derive(Debug, Serialize)]
pub struct ActivitySummary {
    pub steps: u32,
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Serialize)]
pub struct WeightSummary {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub trend: WeightTrend,
}

impl FitnessData {
    pub fn from_snapshot(snapshot: Snapshot, profile: &ProfileConfig) -> Self {
        let Snapshot {
            date,
            totals,
            meals,
            water_glasses,
            water_ml,
            steps,
            workouts,
            weight,
            previous_weight,
            weight_change,
            trend,
            goals,
            defaulted,
        } = snapshot;

        Self {
            user: UserSummary {
                name: profile.name.clone(),
                start_weight: profile.start_weight,
                current_weight: weight,
                yesterday_weight: previous_weight,
                weight_change,
                target_weight: profile.target_weight(),
                age: profile.age,
                height: profile.height_cm,
                location: profile.location.clone(),
            },
            today: TodaySummary {
                date,
                calories: totals.calories,
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
                water_glasses,
                water_ml,
                steps,
                calorie_goal: goals.calories,
                protein_goal: goals.protein,
                water_goal: goals.water_glasses,
                step_goal: goals.steps,
            },
            tracking: TrackingSummary {
                nutrition: NutritionSummary {
                    calories: totals.calories,
                    protein: totals.protein,
                    carbs: totals.carbs,
                    fat: totals.fat,
                    meals,
                    protein_sources: totals.protein_sources,
                    carb_sources: totals.carb_sources,
                    fat_sources: totals.fat_sources,
                },
                hydration: HydrationSummary {
                    glasses: water_glasses,
                    ml: water_ml,
                },
                activity: ActivitySummary { steps, workouts },
                weight: WeightSummary {
                    current: weight,
                    previous: previous_weight,
                    change: weight_change,
                    trend,
                },
            },
            weekly_schedule: weekly_schedule(),
            defaulted,
        }
    }
}
