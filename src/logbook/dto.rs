use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::fitness::defaults::WeeklySchedule;
use crate::logbook::equipment::EquipmentStats;
use crate::logbook::services::{Insights, NutritionDay, TrendPoint};
use crate::model::{iso_date, Meal, Workout};
use crate::source::SourceLabel;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLabel>,
    pub overview: HealthOverview,
    pub progress: HealthProgress,
    pub insights: Insights,
    pub vitals: Vitals,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOverview {
    #[serde(rename = "currentBMI")]
    pub current_bmi: f64,
    pub bmi_category: &'static str,
    pub weight_to_lose: f64,
    pub weeks_to_goal: i64,
    pub overall_health_score: u8,
}

#[derive(Debug, Serialize)]
pub struct HealthProgress {
    pub weight: WeightProgress,
    pub hydration: HydrationProgress,
    pub activity: ActivityProgress,
}

#[derive(Debug, Serialize)]
pub struct WeightProgress {
    pub current: f64,
    pub start: f64,
    pub target: f64,
    pub lost: f64,
    pub percentage: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationProgress {
    pub avg_daily: f64,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityProgress {
    pub avg_daily_steps: f64,
    pub steps_trend: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct Vitals {
    pub age: u32,
    pub height: f64,
    #[serde(rename = "targetBMI")]
    pub target_bmi: f64,
    #[serde(rename = "targetBMIWeight")]
    pub target_bmi_weight: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLabel>,
    pub daily_logs: Vec<DailyNutrition>,
    pub recent_meals: Vec<Meal>,
    pub analytics: NutritionAnalytics,
    pub targets: NutritionTargets,
    pub weekly_trend: Vec<NutritionDay>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-day nutrition figures as stored in the logbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyNutrition {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub calories_estimated: f64,
    pub protein_estimated: f64,
    pub meal_quality: f64,
    pub meals_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalytics {
    pub avg_daily_calories: f64,
    pub avg_daily_protein: f64,
    pub avg_meal_quality: f64,
    pub best_day: Option<DailyNutrition>,
    pub protein_sources: Vec<Meal>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub calories: f64,
    pub protein: f64,
    pub meal_quality: f64,
    pub meals: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLabel>,
    pub overview: ProgressOverview,
    pub weight_history: Vec<WeightPoint>,
    pub steps_history: Vec<TrendPoint>,
    pub water_history: Vec<TrendPoint>,
    pub monthly_summary: MonthlySummary,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub weight_lost: f64,
    pub target_loss: f64,
    #[serde(rename = "currentBMI")]
    pub current_bmi: f64,
    pub bmi_change: f64,
    pub weeks_to_goal: i64,
    pub progress_score: i64,
}

#[derive(Debug, Serialize)]
pub struct WeightPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub weight_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub avg_daily_steps: f64,
    pub avg_water_intake: f64,
    pub total_workouts: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLabel>,
    pub sessions: Vec<Workout>,
    pub equipment: EquipmentStats,
    pub analytics: TrainingAnalytics,
    pub targets: TrainingTargets,
    pub weekly_schedule: WeeklySchedule,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAnalytics {
    pub total_sessions: usize,
    pub total_minutes: f64,
    pub total_calories: f64,
    pub avg_session_duration: f64,
    pub avg_calories_per_session: f64,
    pub weekly_progress: WeeklyProgress,
}

#[derive(Debug, Serialize)]
pub struct WeeklyProgress {
    pub current: f64,
    pub target: f64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingTargets {
    pub cardio_sessions_weekly: u32,
    pub hometrainer_minutes_weekly: u32,
    pub rowing_minutes_weekly: u32,
    pub total_cardio_minutes_weekly: u32,
}

pub const TRAINING_TARGETS: TrainingTargets = TrainingTargets {
    cardio_sessions_weekly: 4,
    hometrainer_minutes_weekly: 90,
    rowing_minutes_weekly: 60,
    total_cardio_minutes_weekly: 150,
};
