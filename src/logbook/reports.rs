//! Payload assembly for the logbook views. Every report has a `fallback`
//! used when no logbook could be read; it is the same report built over an
//! empty logbook, flagged unsuccessful and carrying the reason.

use time::{Date, OffsetDateTime};

use crate::config::{AppConfig, Goals, ProfileConfig};
use crate::fitness::defaults::weekly_schedule;
use crate::logbook::dto::*;
use crate::logbook::equipment::{categorize, empty_stats, EquipmentStatus};
use crate::logbook::services::*;
use crate::model::{percentage_of, round1, round_half_up, DailyLog};

const TARGET_BMI: f64 = 24.0;
const TARGET_MEAL_QUALITY: f64 = 7.0;
const TARGET_MEALS: u32 = 3;
const RECENT_MEALS: usize = 15;
const RECENT_SESSIONS: usize = 20;

/// Most recent log that records a weight. Days without one are skipped, and
/// the starting weight stands in when no log has a weight.
fn current_weight(logs: &[DailyLog], profile: &ProfileConfig) -> f64 {
    logs.iter()
        .rev()
        .find_map(|log| log.weight_kg.filter(|w| *w > 0.0))
        .unwrap_or(profile.start_weight)
}

impl HealthResponse {
    pub fn build(logs: &[DailyLog], config: &AppConfig, today: Date) -> Self {
        let profile = &config.profile;
        let goals = &config.goals;

        let current = current_weight(logs, profile);
        let target = profile.target_weight();
        let bmi = profile.bmi(current);
        let lost = (profile.start_weight - current).max(0.0);

        let hydration = rollup(logs, today, WEEK_DAYS, DailyLog::water, goals.water_glasses);
        let activity = rollup(
            logs,
            today,
            WEEK_DAYS,
            DailyLog::step_count,
            f64::from(goals.steps),
        );
        let avg_water = round1(hydration.average);
        let avg_steps = round_half_up(activity.average);

        let insights = health_insights(InsightInputs {
            log_count: logs.len(),
            bmi,
            weight_lost: lost,
            avg_water,
            avg_steps,
        });

        Self {
            success: true,
            source: None,
            overview: HealthOverview {
                current_bmi: round1(bmi),
                bmi_category: bmi_category(bmi),
                weight_to_lose: round1((current - target).max(0.0)),
                weeks_to_goal: weeks_to_goal(current, target),
                overall_health_score: health_score(logs, bmi, today),
            },
            progress: HealthProgress {
                weight: WeightProgress {
                    current,
                    start: profile.start_weight,
                    target,
                    lost: round1(lost),
                    percentage: percentage_of(
                        profile.start_weight - current,
                        profile.start_weight - target,
                    ),
                },
                hydration: HydrationProgress {
                    avg_daily: avg_water,
                    trend: hydration.trend,
                },
                activity: ActivityProgress {
                    avg_daily_steps: avg_steps,
                    steps_trend: activity.trend,
                },
            },
            insights,
            vitals: Vitals {
                age: profile.age,
                height: profile.height_cm,
                target_bmi: TARGET_BMI,
                target_bmi_weight: round_half_up(TARGET_BMI * profile.height_m().powi(2)),
            },
            timestamp: OffsetDateTime::now_utc(),
            error: None,
        }
    }

    pub fn fallback(config: &AppConfig, today: Date, error: String) -> Self {
        Self {
            success: false,
            insights: starter_insights(),
            error: Some(error),
            ..Self::build(&[], config, today)
        }
    }
}

impl NutritionResponse {
    pub fn build(logs: &[DailyLog], goals: &Goals, today: Date) -> Self {
        let daily_logs: Vec<DailyNutrition> = logs
            .iter()
            .map(|log| DailyNutrition {
                date: log.date,
                calories_estimated: log.calories(),
                protein_estimated: log.protein(),
                meal_quality: log.quality(),
                meals_count: log.meals.len(),
            })
            .collect();

        let eaten: Vec<&DailyNutrition> = daily_logs
            .iter()
            .filter(|day| day.calories_estimated > 0.0)
            .collect();
        let best_day = eaten
            .iter()
            .copied()
            .fold(None::<&DailyNutrition>, |best, day| {
                let best_quality = best.map_or(0.0, |b| b.meal_quality);
                if day.meal_quality > best_quality {
                    Some(day)
                } else {
                    best
                }
            })
            .cloned();

        let meals = all_meals(logs);
        let analytics = NutritionAnalytics {
            avg_daily_calories: round_half_up(average(
                eaten.iter().map(|day| day.calories_estimated),
            )),
            avg_daily_protein: round_half_up(average(
                eaten.iter().map(|day| day.protein_estimated),
            )),
            avg_meal_quality: round1(average(eaten.iter().map(|day| day.meal_quality))),
            best_day,
            protein_sources: top_protein_sources(&meals),
        };

        Self {
            success: true,
            source: None,
            recent_meals: latest(&meals, RECENT_MEALS),
            analytics,
            targets: NutritionTargets {
                calories: goals.calories,
                protein: goals.protein,
                meal_quality: TARGET_MEAL_QUALITY,
                meals: TARGET_MEALS,
            },
            weekly_trend: nutrition_week(logs, today, goals.calories, goals.protein),
            daily_logs,
            timestamp: OffsetDateTime::now_utc(),
            error: None,
        }
    }

    pub fn fallback(goals: &Goals, today: Date, error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::build(&[], goals, today)
        }
    }
}

impl ProgressResponse {
    pub fn build(logs: &[DailyLog], config: &AppConfig, today: Date) -> Self {
        let profile = &config.profile;
        let goals = &config.goals;

        let weight_history: Vec<WeightPoint> = logs
            .iter()
            .filter_map(|log| {
                log.weight_kg.filter(|w| *w > 0.0).map(|weight_kg| WeightPoint {
                    date: log.date,
                    weight_kg,
                    note: log.weight_note.clone(),
                })
            })
            .collect();

        let current = weight_history
            .last()
            .map_or(profile.start_weight, |point| point.weight_kg);
        let target = profile.target_weight();
        let weight_lost = (profile.start_weight - current).max(0.0);
        let target_loss = profile.start_weight - target;
        let bmi_start = profile.bmi(profile.start_weight);
        let bmi_current = profile.bmi(current);

        let steps = rollup(
            logs,
            today,
            MONTH_DAYS,
            DailyLog::step_count,
            f64::from(goals.steps),
        );
        let water = rollup(logs, today, MONTH_DAYS, DailyLog::water, goals.water_glasses);
        let total_workouts: usize = within_window(logs, today, MONTH_DAYS)
            .iter()
            .map(|log| log.cardio_sessions.len())
            .sum();

        Self {
            success: true,
            source: None,
            overview: ProgressOverview {
                weight_lost: round1(weight_lost),
                target_loss: round1(target_loss),
                current_bmi: round1(bmi_current),
                bmi_change: round1(bmi_start - bmi_current),
                weeks_to_goal: weeks_to_goal(current, target),
                progress_score: percentage_of(weight_lost, target_loss),
            },
            weight_history,
            steps_history: steps.trend,
            water_history: water.trend,
            monthly_summary: MonthlySummary {
                avg_daily_steps: round_half_up(steps.average),
                avg_water_intake: round1(water.average),
                total_workouts,
            },
            timestamp: OffsetDateTime::now_utc(),
            error: None,
        }
    }

    pub fn fallback(config: &AppConfig, today: Date, error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::build(&[], config, today)
        }
    }
}

impl TrainingResponse {
    pub fn build(logs: &[DailyLog], today: Date) -> Self {
        let sessions = all_sessions(logs);
        let total_minutes: f64 = sessions.iter().map(|s| s.duration_minutes).sum();
        let total_calories: f64 = sessions
            .iter()
            .map(|s| s.calories_estimated.unwrap_or(0.0))
            .sum();
        let per_session = |total: f64| {
            if sessions.is_empty() {
                0.0
            } else {
                round_half_up(total / sessions.len() as f64)
            }
        };

        let current = weekly_minutes(&sessions, today);
        let analytics = TrainingAnalytics {
            total_sessions: sessions.len(),
            total_minutes,
            total_calories,
            avg_session_duration: per_session(total_minutes),
            avg_calories_per_session: per_session(total_calories),
            weekly_progress: WeeklyProgress {
                current,
                target: WEEKLY_CARDIO_MINUTES,
                percentage: percentage_of(current, WEEKLY_CARDIO_MINUTES),
            },
        };

        Self {
            success: true,
            source: None,
            equipment: categorize(&sessions),
            sessions: latest(&sessions, RECENT_SESSIONS),
            analytics,
            targets: TRAINING_TARGETS,
            weekly_schedule: weekly_schedule(),
            timestamp: OffsetDateTime::now_utc(),
            error: None,
        }
    }

    pub fn fallback(today: Date, error: String) -> Self {
        Self {
            success: false,
            equipment: empty_stats(EquipmentStatus::Ready),
            error: Some(error),
            ..Self::build(&[], today)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataConfig, DayDefaults, MetricsConfig};
    use crate::model::LogBook;
    use serde_json::json;
    use std::path::PathBuf;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 03 - 10);

    fn config() -> AppConfig {
        AppConfig {
            environment: "test".into(),
            data: DataConfig {
                local_dir: PathBuf::from("unused"),
                workspace_dir: PathBuf::from("unused"),
            },
            auth: None,
            metrics: MetricsConfig::default(),
            profile: ProfileConfig::default(),
            defaults: DayDefaults::default(),
            goals: Goals::default(),
        }
    }

    fn logbook() -> LogBook {
        serde_json::from_value(json!({
            "daily_logs": [
                {
                    "date": "2026-03-08",
                    "weight_kg": 105.0,
                    "weight_note": "morning",
                    "water_glasses": 6,
                    "steps": 6000,
                    "calories_estimated": 1800,
                    "protein_estimated": 80,
                    "meal_quality": 7,
                    "meals": [
                        {"name": "Skyr", "calories": 200, "protein_g": 20},
                        {"name": "Toast", "calories": 300, "protein_g": 8}
                    ],
                    "cardio_sessions": [
                        {"equipment": "Concept 2", "duration_minutes": 20, "calories_estimated": 180}
                    ]
                },
                {
                    "date": "2026-03-09",
                    "weight_kg": 104.0,
                    "water_glasses": 8,
                    "steps": 9000,
                    "calories_estimated": 2000,
                    "protein_estimated": 90,
                    "meal_quality": 8,
                    "meals": [
                        {"name": "Chicken", "calories": 500, "protein_g": 45}
                    ],
                    "cardio_sessions": [
                        {"equipment": "Wi3 Ergometer", "duration_minutes": 40, "calories_estimated": 250}
                    ]
                },
                {
                    "date": "2026-03-10",
                    "steps": 3000
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn health_uses_latest_logged_weight() {
        let book = logbook();
        let report = HealthResponse::build(&book.daily_logs, &config(), TODAY);
        assert_eq!(report.progress.weight.current, 104.0);
        assert_eq!(report.progress.weight.lost, 4.0);
        // (108 - 104) / (108 - 84)
        assert_eq!(report.progress.weight.percentage, 17);
        assert_eq!(report.overview.current_bmi, 28.8);
        assert_eq!(report.overview.bmi_category, "Overweight");
        assert_eq!(report.overview.weight_to_lose, 20.0);
        assert_eq!(report.overview.weeks_to_goal, 40);
        assert_eq!(report.vitals.target_bmi_weight, 87.0);
        assert_eq!(report.progress.activity.avg_daily_steps, 6000.0);
        assert_eq!(report.progress.hydration.trend.len(), 3);
    }

    #[test]
    fn health_fallback_starts_from_profile() {
        let report = HealthResponse::fallback(&config(), TODAY, "no logbook".into());
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("no logbook"));
        assert_eq!(report.progress.weight.current, 108.0);
        assert_eq!(report.overview.weight_to_lose, 24.0);
        assert_eq!(report.overview.weeks_to_goal, 48);
        assert_eq!(report.insights, starter_insights());
        assert!(report.progress.hydration.trend.is_empty());
    }

    #[test]
    fn nutrition_analytics_skip_empty_days() {
        let book = logbook();
        let report = NutritionResponse::build(&book.daily_logs, &Goals::default(), TODAY);
        assert_eq!(report.daily_logs.len(), 3);
        assert_eq!(report.analytics.avg_daily_calories, 1900.0);
        assert_eq!(report.analytics.avg_daily_protein, 85.0);
        assert_eq!(report.analytics.avg_meal_quality, 7.5);
        let best = report.analytics.best_day.expect("best day");
        assert_eq!(best.date, date!(2026 - 03 - 09));
        assert_eq!(report.recent_meals[0].name.as_deref(), Some("Chicken"));
        assert_eq!(report.analytics.protein_sources.len(), 2);
        assert_eq!(report.weekly_trend.len(), 7);
    }

    #[test]
    fn nutrition_fallback_has_a_full_empty_week() {
        let report = NutritionResponse::fallback(&Goals::default(), TODAY, "gone".into());
        assert!(!report.success);
        assert_eq!(report.weekly_trend.len(), 7);
        assert!(report.weekly_trend.iter().all(|day| day.calories == 0.0));
        assert!(report.analytics.best_day.is_none());
        assert_eq!(report.analytics.avg_daily_calories, 0.0);
    }

    #[test]
    fn progress_tracks_weight_history() {
        let book = logbook();
        let report = ProgressResponse::build(&book.daily_logs, &config(), TODAY);
        assert_eq!(report.weight_history.len(), 2);
        assert_eq!(report.weight_history[0].note.as_deref(), Some("morning"));
        assert_eq!(report.overview.weight_lost, 4.0);
        assert_eq!(report.overview.target_loss, 24.0);
        assert_eq!(report.overview.progress_score, 17);
        // 29.9 - 28.8
        assert_eq!(report.overview.bmi_change, 1.1);
        assert_eq!(report.monthly_summary.total_workouts, 2);
        assert_eq!(report.monthly_summary.avg_daily_steps, 6000.0);
        assert_eq!(report.steps_history.len(), 3);
    }

    #[test]
    fn training_sums_sessions_and_buckets_them() {
        let book = logbook();
        let report = TrainingResponse::build(&book.daily_logs, TODAY);
        assert_eq!(report.analytics.total_sessions, 2);
        assert_eq!(report.analytics.total_minutes, 60.0);
        assert_eq!(report.analytics.total_calories, 430.0);
        assert_eq!(report.analytics.avg_session_duration, 30.0);
        assert_eq!(report.analytics.avg_calories_per_session, 215.0);
        assert_eq!(report.analytics.weekly_progress.percentage, 40);
        assert_eq!(report.sessions[0].equipment, "Wi3 Ergometer");
        assert_eq!(report.sessions[0].date, Some(date!(2026 - 03 - 09)));
        assert_eq!(report.equipment["pellendorf"]["concept2"].sessions, 1);
    }

    #[test]
    fn training_fallback_marks_equipment_ready() {
        let report = TrainingResponse::fallback(TODAY, "gone".into());
        assert_eq!(
            report.equipment["maishofen"]["wi3"].status,
            EquipmentStatus::Ready
        );
        assert_eq!(report.analytics.total_sessions, 0);
        assert_eq!(report.analytics.weekly_progress.percentage, 0);
    }
}
