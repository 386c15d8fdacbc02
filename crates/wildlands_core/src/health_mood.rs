//! Health and mood calculator.
//!
//! Maps named actions and status effects to calibrated health/mood deltas and
//! classifies numeric levels into qualitative states. Holds only its lookup
//! tables; callers own the animal state being adjusted.

use serde::Serialize;
use std::collections::HashMap;

/// Remaining lifetime of a status effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EffectDuration {
    Seconds(f64),
    Infinite,
}

/// Per-second effect of a status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusEffect {
    pub hp_per_second: f64,
    pub mood_per_second: f64,
    pub duration: EffectDuration,
}

/// Health/mood deltas of one status over one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTick {
    pub status: String,
    pub hp_delta: f64,
    pub mood_delta: f64,
    /// New remaining duration; the caller drops the status once it reaches zero.
    pub remaining: EffectDuration,
}

impl StatusTick {
    #[must_use]
    pub fn expired(&self) -> bool {
        matches!(self.remaining, EffectDuration::Seconds(s) if s <= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodState {
    Ecstatic,
    Happy,
    Content,
    Unhappy,
    Distressed,
    Depressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Peak,
    Healthy,
    Wounded,
    Injured,
    Critical,
    Dead,
}

/// What an animal should go looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceNeed {
    Water,
    Food,
    Medicinal,
    Rest,
    Social,
    None,
}

const NEED_THRESHOLD: f64 = 70.0;
const LOW_HEALTH_PERCENT: f64 = 40.0;
const LOW_MOOD_PERCENT: f64 = 30.0;

const DEFAULT_ACTIONS: [(&str, f64, f64); 12] = [
    ("eat_plant", 10.0, 5.0),
    ("eat_meat", 15.0, 10.0),
    ("drink", 5.0, 5.0),
    ("rest", 5.0, 10.0),
    ("socialize", 0.0, 10.0),
    ("play", -1.0, 15.0),
    ("attack", -5.0, -10.0),
    ("be_attacked", -15.0, -20.0),
    ("flee", -2.0, -5.0),
    ("mate", -5.0, 25.0),
    ("hunt_success", 10.0, 15.0),
    ("hunt_failure", -5.0, -8.0),
];

const DEFAULT_STATUSES: [(&str, f64, f64, Option<f64>); 8] = [
    ("poisoned", -2.0, -5.0, Some(10.0)),
    ("bleeding", -3.0, -4.0, Some(5.0)),
    ("well_fed", 0.5, 1.0, Some(30.0)),
    ("content", 0.2, 0.5, Some(20.0)),
    ("exhausted", -0.5, -2.0, None),
    ("starving", -1.0, -3.0, None),
    ("dehydrated", -1.5, -3.0, None),
    ("grieving", 0.0, -1.5, Some(60.0)),
];

#[derive(Debug, Clone)]
pub struct HealthMoodSystem {
    actions: HashMap<String, (f64, f64)>,
    statuses: HashMap<String, StatusEffect>,
}

impl Default for HealthMoodSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthMoodSystem {
    #[must_use]
    pub fn new() -> Self {
        let actions = DEFAULT_ACTIONS
            .iter()
            .map(|(name, hp, mood)| (name.to_string(), (*hp, *mood)))
            .collect();
        let statuses = DEFAULT_STATUSES
            .iter()
            .map(|(name, hp, mood, duration)| {
                (
                    name.to_string(),
                    StatusEffect {
                        hp_per_second: *hp,
                        mood_per_second: *mood,
                        duration: duration.map_or(EffectDuration::Infinite, EffectDuration::Seconds),
                    },
                )
            })
            .collect();
        Self { actions, statuses }
    }

    /// Adds or replaces an action's unit-intensity impact.
    #[must_use]
    pub fn with_action(mut self, name: &str, hp_delta: f64, mood_delta: f64) -> Self {
        self.actions.insert(name.to_string(), (hp_delta, mood_delta));
        self
    }

    #[must_use]
    pub fn with_status(mut self, name: &str, effect: StatusEffect) -> Self {
        self.statuses.insert(name.to_string(), effect);
        self
    }

    #[must_use]
    pub fn status_effect(&self, name: &str) -> Option<&StatusEffect> {
        self.statuses.get(name)
    }

    /// Health/mood deltas of an action scaled by intensity; `(0, 0)` when unknown.
    #[must_use]
    pub fn apply_action(&self, action: &str, intensity: f64) -> (f64, f64) {
        self.actions
            .get(action)
            .map_or((0.0, 0.0), |(hp, mood)| (hp * intensity, mood * intensity))
    }

    /// Ticks every active status by `dt`. Unknown statuses yield zero deltas but still
    /// count down.
    #[must_use]
    pub fn update_status_effects(
        &self,
        active: &HashMap<String, EffectDuration>,
        dt: f64,
    ) -> Vec<StatusTick> {
        let mut ticks: Vec<StatusTick> = active
            .iter()
            .map(|(status, remaining)| {
                let (hp_delta, mood_delta) = self
                    .statuses
                    .get(status)
                    .map_or((0.0, 0.0), |e| (e.hp_per_second * dt, e.mood_per_second * dt));
                let remaining = match remaining {
                    EffectDuration::Seconds(s) => EffectDuration::Seconds((s - dt).max(0.0)),
                    EffectDuration::Infinite => EffectDuration::Infinite,
                };
                StatusTick {
                    status: status.clone(),
                    hp_delta,
                    mood_delta,
                    remaining,
                }
            })
            .collect();
        ticks.sort_by(|a, b| a.status.cmp(&b.status));
        ticks
    }

    /// Starts a status at its full configured duration.
    #[must_use]
    pub fn start_status(&self, name: &str) -> Option<EffectDuration> {
        self.statuses.get(name).map(|e| e.duration)
    }

    #[must_use]
    pub fn calculate_mood_state(mood_points: f64) -> MoodState {
        if mood_points >= 90.0 {
            MoodState::Ecstatic
        } else if mood_points >= 75.0 {
            MoodState::Happy
        } else if mood_points >= 50.0 {
            MoodState::Content
        } else if mood_points >= 25.0 {
            MoodState::Unhappy
        } else if mood_points >= 10.0 {
            MoodState::Distressed
        } else {
            MoodState::Depressed
        }
    }

    #[must_use]
    pub fn calculate_health_state(hp: f64, max_hp: f64) -> HealthState {
        let percent = hp / max_hp.max(1.0) * 100.0;
        if percent >= 90.0 {
            HealthState::Peak
        } else if percent >= 75.0 {
            HealthState::Healthy
        } else if percent >= 50.0 {
            HealthState::Wounded
        } else if percent >= 25.0 {
            HealthState::Injured
        } else if percent > 0.0 {
            HealthState::Critical
        } else {
            HealthState::Dead
        }
    }

    /// Survival priority: thirst, hunger, health, fatigue, loneliness.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn should_seek_resource(
        hp: f64,
        max_hp: f64,
        mood: f64,
        max_mood: f64,
        hunger: f64,
        thirst: f64,
        exhaustion: f64,
    ) -> (bool, ResourceNeed) {
        let hp_percent = hp / max_hp.max(1.0) * 100.0;
        let mood_percent = mood / max_mood.max(1.0) * 100.0;

        if thirst >= NEED_THRESHOLD {
            (true, ResourceNeed::Water)
        } else if hunger >= NEED_THRESHOLD {
            (true, ResourceNeed::Food)
        } else if hp_percent < LOW_HEALTH_PERCENT {
            (true, ResourceNeed::Medicinal)
        } else if exhaustion >= NEED_THRESHOLD {
            (true, ResourceNeed::Rest)
        } else if mood_percent < LOW_MOOD_PERCENT {
            (true, ResourceNeed::Social)
        } else {
            (false, ResourceNeed::None)
        }
    }

    /// Clamps health and mood into `[0, max]`.
    #[must_use]
    pub fn clamp_vitals(hp: f64, mood: f64, max_hp: f64, max_mood: f64) -> (f64, f64) {
        (hp.clamp(0.0, max_hp.max(0.0)), mood.clamp(0.0, max_mood.max(0.0)))
    }
}
