use serde::Serialize;
use time::{Date, Duration};

use crate::model::{iso_date, percentage_of, round1, round_half_up, DailyLog, Meal, Workout};

pub const WEEK_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;
/// Target weight loss per week used for goal estimates.
pub const KG_PER_WEEK: f64 = 0.5;
pub const WEEKLY_CARDIO_MINUTES: f64 = 150.0;

/// Logs dated on or after `today - window_days`.
pub fn within_window(logs: &[DailyLog], today: Date, window_days: i64) -> Vec<&DailyLog> {
    let from = today - Duration::days(window_days);
    logs.iter().filter(|log| log.date >= from).collect()
}

/// Arithmetic mean, 0 for no values.
pub fn average(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub value: f64,
    pub target: f64,
    pub percentage_of_target: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub average: f64,
    pub trend: Vec<TrendPoint>,
}

/// Average and per-day trend of one field over a trailing window. An empty
/// window reports 0, unlike the single-day snapshot.
pub fn rollup(
    logs: &[DailyLog],
    today: Date,
    window_days: i64,
    field: fn(&DailyLog) -> f64,
    target: f64,
) -> Rollup {
    let recent = within_window(logs, today, window_days);
    let trend = recent
        .iter()
        .map(|log| {
            let value = field(log);
            TrendPoint {
                date: log.date,
                value,
                target,
                percentage_of_target: percentage_of(value, target),
            }
        })
        .collect();
    Rollup {
        average: average(recent.iter().map(|log| field(log))),
        trend,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionDay {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub calories: f64,
    pub protein: f64,
    pub quality: f64,
    pub calories_progress: i64,
    pub protein_progress: i64,
}

impl NutritionDay {
    fn placeholder(date: Date) -> Self {
        Self {
            date,
            calories: 0.0,
            protein: 0.0,
            quality: 0.0,
            calories_progress: 0,
            protein_progress: 0,
        }
    }
}

/// Always exactly seven days, oldest first. Days missing in front are
/// zero placeholders for the dates just before the oldest recorded one.
pub fn nutrition_week(
    logs: &[DailyLog],
    today: Date,
    calorie_target: f64,
    protein_target: f64,
) -> Vec<NutritionDay> {
    let recent = within_window(logs, today, WEEK_DAYS);
    let skip = recent.len().saturating_sub(WEEK_DAYS as usize);
    let recorded: Vec<NutritionDay> = recent[skip..]
        .iter()
        .map(|log| NutritionDay {
            date: log.date,
            calories: log.calories(),
            protein: log.protein(),
            quality: log.quality(),
            calories_progress: percentage_of(log.calories(), calorie_target),
            protein_progress: percentage_of(log.protein(), protein_target),
        })
        .collect();

    let missing = WEEK_DAYS as usize - recorded.len();
    let anchor = recorded
        .first()
        .map_or(today + Duration::days(1), |day| day.date);
    let mut week: Vec<NutritionDay> = (1..=missing as i64)
        .rev()
        .map(|back| NutritionDay::placeholder(anchor - Duration::days(back)))
        .collect();
    week.extend(recorded);
    week
}

pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

/// 0..=100. BMI bands, then step and hydration bands averaged over the last week.
pub fn health_score(logs: &[DailyLog], current_bmi: f64, today: Date) -> u8 {
    let mut score = 50.0;

    if current_bmi < 25.0 {
        score += 40.0;
    } else if current_bmi < 30.0 {
        score += 20.0;
    } else if current_bmi < 35.0 {
        score += 10.0;
    }

    let recent = within_window(logs, today, WEEK_DAYS);
    if !recent.is_empty() {
        let avg_steps = average(recent.iter().map(|log| log.step_count()));
        if avg_steps >= 8000.0 {
            score += 30.0;
        } else if avg_steps >= 5000.0 {
            score += 20.0;
        } else if avg_steps >= 2000.0 {
            score += 10.0;
        }

        let avg_water = average(recent.iter().map(|log| log.water()));
        if avg_water >= 8.0 {
            score += 20.0;
        } else if avg_water >= 6.0 {
            score += 15.0;
        } else if avg_water >= 4.0 {
            score += 10.0;
        }
    }

    round_half_up(score).clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Inputs for [`health_insights`], all already rolled up.
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs {
    pub log_count: usize,
    pub bmi: f64,
    pub weight_lost: f64,
    pub avg_water: f64,
    pub avg_steps: f64,
}

pub fn health_insights(inputs: InsightInputs) -> Insights {
    let mut insights = Insights::default();

    if inputs.bmi < 30.0 {
        insights
            .strengths
            .push("BMI below the obesity threshold, a good base for further progress".into());
    }
    if inputs.weight_lost > 0.0 {
        insights.strengths.push(format!(
            "Already {}kg lost, you are on the right track",
            round1(inputs.weight_lost)
        ));
    }

    if inputs.avg_water >= 6.0 {
        insights
            .strengths
            .push("Good hydration, water intake is regular".into());
    } else {
        insights
            .improvements
            .push("Raise water intake to at least 8 glasses a day".into());
        insights
            .recommendations
            .push("Keep a water bottle on the desk as a visual reminder".into());
    }

    if inputs.avg_steps >= 5000.0 {
        insights
            .strengths
            .push("Solid baseline activity, regular movement is established".into());
    } else {
        insights
            .improvements
            .push("Raise daily steps to at least 8,000".into());
        insights
            .recommendations
            .push("Plan 2-3 short walks into the day".into());
    }

    if inputs.bmi > 25.0 {
        insights
            .recommendations
            .push("Aim for sustainable loss of 0.5kg per week".into());
        insights
            .recommendations
            .push("Combine strength training with cardio".into());
    }

    if inputs.log_count < WEEK_DAYS as usize {
        insights
            .improvements
            .push("Track regularly for better progress control".into());
        insights
            .recommendations
            .push("Set up a daily two-minute tracking routine in the evening".into());
    }

    insights
}

/// Insights shown when the logbook cannot be read at all.
pub fn starter_insights() -> Insights {
    Insights {
        strengths: Vec::new(),
        improvements: vec![
            "Start checking your weight regularly".into(),
            "Increase daily water intake".into(),
            "Increase physical activity".into(),
        ],
        recommendations: vec![
            "Set realistic weekly goals".into(),
            "Track weight and activity every day".into(),
            "Build healthy routines".into(),
        ],
    }
}

/// Weeks until `target` at [`KG_PER_WEEK`], never negative.
pub fn weeks_to_goal(current: f64, target: f64) -> i64 {
    ((current - target).max(0.0) / KG_PER_WEEK).ceil() as i64
}

/// Every meal of every day, stamped with its day's date.
pub fn all_meals(logs: &[DailyLog]) -> Vec<Meal> {
    logs.iter()
        .flat_map(|log| {
            log.meals.iter().map(move |meal| Meal {
                date: Some(log.date),
                ..meal.clone()
            })
        })
        .collect()
}

/// Every cardio session, stamped with its day's date.
pub fn all_sessions(logs: &[DailyLog]) -> Vec<Workout> {
    logs.iter()
        .flat_map(|log| {
            log.cardio_sessions.iter().map(move |session| Workout {
                date: Some(log.date),
                ..session.clone()
            })
        })
        .collect()
}

/// Protein-rich meals (more than 15 g), richest first, at most ten.
pub fn top_protein_sources(meals: &[Meal]) -> Vec<Meal> {
    let mut rich: Vec<Meal> = meals.iter().filter(|m| m.protein_g > 15.0).cloned().collect();
    rich.sort_by(|a, b| b.protein_g.total_cmp(&a.protein_g));
    rich.truncate(10);
    rich
}

/// Newest `n` items first.
pub fn latest<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items.iter().rev().take(n).cloned().collect()
}

pub fn weekly_minutes(sessions: &[Workout], today: Date) -> f64 {
    let from = today - Duration::days(WEEK_DAYS);
    sessions
        .iter()
        .filter(|s| s.date.is_some_and(|d| d >= from))
        .map(|s| s.duration_minutes)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 19);

    fn log(days_ago: i64, steps: u32, water: f64) -> DailyLog {
        let mut log = DailyLog::empty(TODAY - Duration::days(days_ago));
        log.steps = Some(steps);
        log.water_glasses = Some(water);
        log
    }

    #[test]
    fn rollup_over_empty_window_is_zero() {
        let logs = vec![log(40, 9000, 8.0)];
        let r = rollup(&logs, TODAY, WEEK_DAYS, DailyLog::step_count, 8000.0);
        assert_eq!(r.average, 0.0);
        assert!(r.trend.is_empty());
    }

    #[test]
    fn rollup_averages_and_scores_against_target() {
        let logs = vec![log(10, 1, 1.0), log(7, 6000, 6.0), log(1, 10000, 8.0)];
        let r = rollup(&logs, TODAY, WEEK_DAYS, DailyLog::step_count, 8000.0);
        assert_eq!(r.average, 8000.0);
        assert_eq!(r.trend.len(), 2);
        assert_eq!(r.trend[0].date, date!(2026 - 10 - 12));
        assert_eq!(r.trend[0].percentage_of_target, 75);
        assert_eq!(r.trend[1].percentage_of_target, 125);

        let json = serde_json::to_value(&r.trend[1]).unwrap();
        assert_eq!(
            json,
            json!({"date": "2026-10-18", "value": 10000.0, "target": 8000.0, "percentageOfTarget": 125})
        );
    }

    #[test]
    fn nutrition_week_is_always_seven_days() {
        let none = nutrition_week(&[], TODAY, 2000.0, 90.0);
        assert_eq!(none.len(), 7);
        assert_eq!(none[0].date, date!(2026 - 10 - 13));
        assert_eq!(none[6].date, TODAY);
        assert!(none.iter().all(|d| d.calories == 0.0));

        let mut logs: Vec<DailyLog> = (0..12).rev().map(|ago| log(ago, 0, 0.0)).collect();
        logs[11].calories_estimated = Some(1500.0);
        let many = nutrition_week(&logs, TODAY, 2000.0, 90.0);
        assert_eq!(many.len(), 7);
        assert_eq!(many[6].date, TODAY);
        assert_eq!(many[6].calories_progress, 75);

        let two = nutrition_week(&[log(3, 0, 0.0), log(1, 0, 0.0)], TODAY, 2000.0, 90.0);
        assert_eq!(two.len(), 7);
        let dates: Vec<Date> = two.iter().map(|d| d.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]), "oldest first: {dates:?}");
        assert_eq!(two[4].date, date!(2026 - 10 - 15));
        assert_eq!(two[5].date, date!(2026 - 10 - 16));
    }

    #[test]
    fn health_score_bands() {
        assert_eq!(health_score(&[], 40.0, TODAY), 50);
        assert_eq!(health_score(&[], 32.0, TODAY), 60);
        assert_eq!(health_score(&[], 27.0, TODAY), 70);
        assert_eq!(health_score(&[log(1, 8000, 8.0)], 24.0, TODAY), 100);
        assert_eq!(health_score(&[log(1, 5000, 6.0)], 40.0, TODAY), 85);
        assert_eq!(health_score(&[log(1, 2000, 4.0)], 40.0, TODAY), 70);
        // Only logs from the last week count.
        assert_eq!(health_score(&[log(30, 9000, 9.0)], 40.0, TODAY), 50);
    }

    #[test]
    fn health_score_is_monotonic_in_steps_and_water() {
        let steps = [0, 1999, 2000, 4999, 5000, 7999, 8000, 20000];
        let water = [0.0, 3.9, 4.0, 5.9, 6.0, 7.9, 8.0, 12.0];
        let mut last = 0;
        for s in steps {
            let score = health_score(&[log(0, s, 0.0)], 31.0, TODAY);
            assert!(score >= last);
            last = score;
        }
        let mut last = 0;
        for w in water {
            let score = health_score(&[log(0, 0, w)], 31.0, TODAY);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn health_score_is_clamped() {
        let score = health_score(&[log(0, 50_000, 30.0)], -5.0, TODAY);
        assert_eq!(score, 100);
        assert_eq!(health_score(&[], f64::NAN, TODAY), 50);
    }

    #[test]
    fn bmi_categories() {
        assert_eq!(bmi_category(17.0), "Underweight");
        assert_eq!(bmi_category(22.0), "Normal");
        assert_eq!(bmi_category(29.9), "Overweight");
        assert_eq!(bmi_category(30.0), "Obese");
    }

    #[test]
    fn insights_follow_the_rollups() {
        let good = health_insights(InsightInputs {
            log_count: 10,
            bmi: 24.0,
            weight_lost: 2.0,
            avg_water: 8.0,
            avg_steps: 9000.0,
        });
        assert_eq!(good.strengths.len(), 4);
        assert!(good.improvements.is_empty());
        assert!(good.recommendations.is_empty());

        let poor = health_insights(InsightInputs {
            log_count: 2,
            bmi: 31.0,
            weight_lost: 0.0,
            avg_water: 2.0,
            avg_steps: 1000.0,
        });
        assert!(poor.strengths.is_empty());
        assert_eq!(poor.improvements.len(), 3);
        assert_eq!(poor.recommendations.len(), 5);
    }

    #[test]
    fn weeks_to_goal_never_negative() {
        assert_eq!(weeks_to_goal(108.0, 84.0), 48);
        assert_eq!(weeks_to_goal(84.2, 84.0), 1);
        assert_eq!(weeks_to_goal(80.0, 84.0), 0);
    }

    #[test]
    fn meals_and_sessions_take_their_day() {
        let mut day = log(2, 0, 0.0);
        day.meals = vec![serde_json::from_value(json!({"name": "Eier", "protein_g": 18})).unwrap()];
        day.cardio_sessions =
            vec![serde_json::from_value(json!({"equipment": "Wi3", "duration_minutes": 25})).unwrap()];
        let logs = vec![day];

        let meals = all_meals(&logs);
        assert_eq!(meals[0].date, Some(date!(2026 - 10 - 17)));
        let sessions = all_sessions(&logs);
        assert_eq!(sessions[0].date, Some(date!(2026 - 10 - 17)));
        assert_eq!(weekly_minutes(&sessions, TODAY), 25.0);
        assert_eq!(weekly_minutes(&sessions, TODAY + Duration::days(30)), 0.0);
    }

    #[test]
    fn protein_sources_sorted_and_capped() {
        let meals: Vec<Meal> = (0..14)
            .map(|g| serde_json::from_value(json!({ "protein_g": 10 + g })).unwrap())
            .collect();
        let top = top_protein_sources(&meals);
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].protein_g, 23.0);
        assert!(top.iter().all(|m| m.protein_g > 15.0));
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average(Vec::new()), 0.0);
        assert_eq!(average([1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn latest_is_newest_first() {
        assert_eq!(latest(&[1, 2, 3, 4], 2), vec![4, 3]);
        assert_eq!(latest(&[1], 5), vec![1]);
    }
}
