//! Fixed-stage interval table
//!
//! Each stored review item sits at a discrete stage. The stage indexes into
//! `REVIEW_INTERVALS_MS` to decide how long until the item is due again.
//!
//! Stages:
//! - 0: new, never mastered (not a resting state for stored items)
//! - 1: short-term, one hour
//! - 2: next day
//! - 3: three days
//! - 4: one week

/// Discrete retention-strength level of an item.
pub type Stage = u8;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Review delays in milliseconds, indexed by stage
pub const REVIEW_INTERVALS_MS: [i64; 5] = [0, HOUR_MS, DAY_MS, 3 * DAY_MS, 7 * DAY_MS];

/// Number of stages in the table (N)
pub const STAGE_COUNT: usize = REVIEW_INTERVALS_MS.len();

/// Highest reachable stage (N - 1)
pub const MAX_STAGE: Stage = (STAGE_COUNT - 1) as Stage;

/// Stage assigned on first mastery and after a failed review
pub const FIRST_STAGE: Stage = 1;

/// Delay for a stage. Out-of-range stages are treated as `MAX_STAGE`.
pub fn interval_ms(stage: Stage) -> i64 {
    REVIEW_INTERVALS_MS[usize::from(stage.min(MAX_STAGE))]
}

/// Delay for a stage as a std duration, for timers
pub fn interval_duration(stage: Stage) -> std::time::Duration {
    std::time::Duration::from_millis(interval_ms(stage).max(0) as u64)
}

/// Stage reached after a successful review, saturating at `MAX_STAGE`
pub fn next_stage(stage: Stage) -> Stage {
    stage.saturating_add(1).min(MAX_STAGE)
}

/// Format a delay in milliseconds to a short human-readable string
pub fn format_interval_ms(ms: i64) -> String {
    if ms <= 0 {
        return "now".to_string();
    }

    let minutes = ms / (60 * 1000);
    if ms < HOUR_MS {
        return format!("{}m", minutes.max(1));
    }
    if ms < DAY_MS {
        return format!("{}h", ms / HOUR_MS);
    }

    let days = ms / DAY_MS;
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
