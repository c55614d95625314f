use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::RegexSet;
use serde::Serialize;

use crate::model::Workout;

/// One piece of equipment sessions are counted against.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    pub pattern: &'static str,
    pub location: &'static str,
    pub key: &'static str,
    pub name: &'static str,
}

/// Match pattern → bucket. Patterns are case-sensitive substrings of the
/// session's equipment text.
pub const BUCKETS: &[Bucket] = &[
    Bucket {
        pattern: "Concept",
        location: "pellendorf",
        key: "concept2",
        name: "Concept 2 Rudergerät",
    },
    Bucket {
        pattern: "Hammer",
        location: "pellendorf",
        key: "hammerVaron",
        name: "Hammer Varon xtr",
    },
    Bucket {
        pattern: "Finnlo",
        location: "pellendorf",
        key: "finnloBioForce",
        name: "Finnlo Bio Force",
    },
    Bucket {
        pattern: "Wi3",
        location: "maishofen",
        key: "wi3",
        name: "Wi3 Ergometer",
    },
];

lazy_static! {
    static ref MATCHERS: RegexSet =
        RegexSet::new(BUCKETS.iter().map(|b| regex::escape(b.pattern))).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Active,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub name: &'static str,
    pub sessions: u32,
    pub total_minutes: f64,
    pub status: EquipmentStatus,
}

/// location → bucket key → stats
pub type EquipmentStats = BTreeMap<&'static str, BTreeMap<&'static str, BucketStats>>;

pub fn empty_stats(status: EquipmentStatus) -> EquipmentStats {
    let mut stats = EquipmentStats::new();
    for bucket in BUCKETS {
        stats.entry(bucket.location).or_default().insert(
            bucket.key,
            BucketStats {
                name: bucket.name,
                sessions: 0,
                total_minutes: 0.0,
                status,
            },
        );
    }
    stats
}

/// Single pass over the sessions. Equipment matching no pattern is left out.
pub fn categorize(sessions: &[Workout]) -> EquipmentStats {
    let mut stats = empty_stats(EquipmentStatus::Active);
    for session in sessions {
        for idx in MATCHERS.matches(&session.equipment).iter() {
            let bucket = &BUCKETS[idx];
            if let Some(entry) = stats
                .get_mut(bucket.location)
                .and_then(|by_key| by_key.get_mut(bucket.key))
            {
                entry.sessions += 1;
                entry.total_minutes += session.duration_minutes;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(equipment: &str, minutes: f64) -> Workout {
        serde_json::from_value(json!({
            "equipment": equipment, "duration_minutes": minutes
        }))
        .unwrap()
    }

    #[test]
    fn sessions_land_in_their_buckets() {
        let stats = categorize(&[
            session("Concept 2 Ruder-Intervalle", 20.0),
            session("Concept 2", 15.0),
            session("Wi3 Ergometer", 25.0),
            session("Hammer Varon xtr", 30.0),
        ]);
        let concept = &stats["pellendorf"]["concept2"];
        assert_eq!(concept.sessions, 2);
        assert_eq!(concept.total_minutes, 35.0);
        assert_eq!(concept.status, EquipmentStatus::Active);
        assert_eq!(stats["maishofen"]["wi3"].sessions, 1);
        assert_eq!(stats["pellendorf"]["hammerVaron"].total_minutes, 30.0);
        assert_eq!(stats["pellendorf"]["finnloBioForce"].sessions, 0);
    }

    #[test]
    fn unknown_equipment_is_excluded() {
        let stats = categorize(&[session("Spaziergang", 45.0), session("concept2", 20.0)]);
        let counted: u32 = stats
            .values()
            .flat_map(|by_key| by_key.values())
            .map(|b| b.sessions)
            .sum();
        assert_eq!(counted, 0, "matching is case-sensitive and has no catch-all");
    }

    #[test]
    fn combined_session_counts_for_each_match() {
        let stats = categorize(&[session("Wi3 warm-up, Concept 2 intervals", 40.0)]);
        assert_eq!(stats["maishofen"]["wi3"].sessions, 1);
        assert_eq!(stats["pellendorf"]["concept2"].sessions, 1);
        assert_eq!(stats["pellendorf"]["concept2"].total_minutes, 40.0);
    }

    #[test]
    fn empty_stats_lists_every_bucket() {
        let stats = empty_stats(EquipmentStatus::Ready);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["pellendorf"].len(), 3);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["maishofen"]["wi3"]["status"], "ready");
        assert_eq!(json["maishofen"]["wi3"]["totalMinutes"], 0.0);
    }
}
