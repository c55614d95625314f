use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use time::Date;

/// `YYYY-MM-DD` (de)serialization for [`Date`] fields.
pub mod iso_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    pub const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn format(date: Date) -> String {
        // The format only has numeric components, formatting cannot fail.
        date.format(FORMAT).unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Result<Date, time::error::Parse> {
        Date::parse(raw, FORMAT)
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&format(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}

/// Field decoders for hand-edited tracking files: `null` reads as the
/// default and counts may be written as floats.
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.map_or(0, to_count))
    }

    pub fn optional_count<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.map(to_count))
    }

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    fn to_count(value: f64) -> u32 {
        super::round_half_up(value).clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

/// Grams of a macro from which a meal counts as a source of it.
pub const SOURCE_THRESHOLD_G: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroCategory {
    Protein,
    Carbs,
    Fat,
}

impl MacroCategory {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "protein" => Some(Self::Protein),
            "carbs" | "carb" => Some(Self::Carbs),
            "fat" => Some(Self::Fat),
            _ => None,
        }
    }
}

/// Unknown tags are dropped so the category gets derived from the macros instead.
fn lenient_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<MacroCategory>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(MacroCategory::from_tag))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "iso_date::option::deserialize")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub carbs_g: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fat_g: f64,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<MacroCategory>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meal {
    /// Stored tag if present, otherwise the macro with the largest energy share.
    pub fn category(&self) -> MacroCategory {
        if let Some(stored) = self.category {
            return stored;
        }
        let protein = self.protein_g * 4.0;
        let carbs = self.carbs_g * 4.0;
        let fat = self.fat_g * 9.0;
        if protein >= carbs && protein >= fat {
            MacroCategory::Protein
        } else if carbs >= fat {
            MacroCategory::Carbs
        } else {
            MacroCategory::Fat
        }
    }

    pub fn is_protein_source(&self) -> bool {
        self.protein_g >= SOURCE_THRESHOLD_G
    }

    pub fn is_carb_source(&self) -> bool {
        self.carbs_g >= SOURCE_THRESHOLD_G
    }

    pub fn is_fat_source(&self) -> bool {
        self.fat_g >= SOURCE_THRESHOLD_G
    }
}

/// Meals always go out with their effective category, stored or derived.
impl Serialize for Meal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Outgoing<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<&'a str>,
            #[serde(with = "iso_date::option", skip_serializing_if = "Option::is_none")]
            date: Option<Date>,
            calories: f64,
            protein_g: f64,
            carbs_g: f64,
            fat_g: f64,
            category: MacroCategory,
            #[serde(flatten)]
            extra: &'a Map<String, Value>,
        }

        Outgoing {
            name: self.name.as_deref(),
            date: self.date,
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            category: self.category(),
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub glasses: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsEntry {
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub steps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    /// Entries without a value are ignored by day selection.
    #[serde(default)]
    pub weight: Option<f64>,
}

/// A workout or cardio session. Both store schemas are accepted: the tracking
/// document says `duration`/`calories`, the logbook `duration_minutes`/`calories_estimated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub equipment: String,
    #[serde(default, alias = "duration", deserialize_with = "lenient::number")]
    pub duration_minutes: f64,
    #[serde(default, alias = "calories", skip_serializing_if = "Option::is_none")]
    pub calories_estimated: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionLog {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub nutrition: NutritionLog,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub water: Vec<WaterEntry>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub steps: Vec<StepsEntry>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub workouts: Vec<Workout>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub weight: Vec<WeightEntry>,
}

/// Contents of `data.data` in the tracking document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingStore {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tracking: Tracking,
}

/// One calendar day in the logbook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub weight_note: Option<String>,
    #[serde(default)]
    pub water_glasses: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub steps: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meals: Vec<Meal>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub cardio_sessions: Vec<Workout>,
    #[serde(default)]
    pub calories_estimated: Option<f64>,
    #[serde(default)]
    pub protein_estimated: Option<f64>,
    #[serde(default)]
    pub meal_quality: Option<f64>,
}

impl DailyLog {
    #[cfg(test)]
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            weight_kg: None,
            weight_note: None,
            water_glasses: None,
            steps: None,
            meals: Vec::new(),
            cardio_sessions: Vec::new(),
            calories_estimated: None,
            protein_estimated: None,
            meal_quality: None,
        }
    }

    pub fn water(&self) -> f64 {
        self.water_glasses.unwrap_or(0.0)
    }

    pub fn step_count(&self) -> f64 {
        f64::from(self.steps.unwrap_or(0))
    }

    pub fn calories(&self) -> f64 {
        self.calories_estimated.unwrap_or(0.0)
    }

    pub fn protein(&self) -> f64 {
        self.protein_estimated.unwrap_or(0.0)
    }

    pub fn quality(&self) -> f64 {
        self.meal_quality.unwrap_or(0.0)
    }
}

/// The logbook document: `{ "daily_logs": [...] }`, oldest day first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogBook {
    pub daily_logs: Vec<DailyLog>,
}

/// Current calendar day in UTC.
pub fn today() -> Date {
    time::OffsetDateTime::now_utc().date()
}

/// Rounds half-way cases towards positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// One decimal place, same tie rule as [`round_half_up`].
pub fn round1(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

pub fn percentage_of(value: f64, target: f64) -> i64 {
    if target == 0.0 {
        return 0;
    }
    round_half_up(value / target * 100.0) as i64
}
