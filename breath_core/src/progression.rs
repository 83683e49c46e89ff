//! XP, levels and streaks.
//!
//! - Every finished cycle earns `xp_per_cycle`
//! - A session run to the end adds `completion_bonus`
//! - Level is `1 + total_xp / xp_per_level`
//! - Streaks count consecutive local days with a completed session

use crate::config::ProgressionConfig;
use crate::{PracticeRecord, UserProgress};
use chrono::{Local, NaiveDate};

/// XP earned by one session and its effect on level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpAward {
    pub xp: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl XpAward {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

pub fn level_for(total_xp: u32, xp_per_level: u32) -> u32 {
    (total_xp / xp_per_level.max(1)).saturating_add(1)
}

/// XP still needed to reach the next level
pub fn xp_to_next_level(total_xp: u32, xp_per_level: u32) -> u32 {
    let per_level = xp_per_level.max(1);
    per_level - total_xp % per_level
}

pub fn xp_for(record: &PracticeRecord, config: &ProgressionConfig) -> u32 {
    let bonus = if record.completed {
        config.completion_bonus
    } else {
        0
    };
    record
        .cycles_completed
        .saturating_mul(config.xp_per_cycle)
        .saturating_add(bonus)
}

/// Count `day` towards the streak
pub fn extend_streak(progress: &mut UserProgress, day: NaiveDate) {
    match progress.last_practice_on {
        Some(last) if last >= day => return,
        Some(last) if last.succ_opt() == Some(day) => progress.current_streak += 1,
        _ => progress.current_streak = 1,
    }

    progress.last_practice_on = Some(day);
    progress.longest_streak = progress.longest_streak.max(progress.current_streak);
}

/// Streak as of `today`: a streak survives until a full day is missed
pub fn current_streak_on(progress: &UserProgress, today: NaiveDate) -> u32 {
    match progress.last_practice_on {
        Some(last) if last == today || last.succ_opt() == Some(today) => progress.current_streak,
        _ => 0,
    }
}

/// Fold a finished session into the user's progress
pub fn apply_record(
    progress: &mut UserProgress,
    record: &PracticeRecord,
    config: &ProgressionConfig,
) -> XpAward {
    let level_before = level_for(progress.total_xp, config.xp_per_level);
    let xp = xp_for(record, config);

    progress.total_xp = progress.total_xp.saturating_add(xp);
    progress.total_seconds = progress
        .total_seconds
        .saturating_add(record.elapsed_seconds as u64);

    if record.completed {
        progress.sessions_completed += 1;
        extend_streak(progress, record.ended_at.with_timezone(&Local).date_naive());
    } else {
        progress.sessions_stopped += 1;
    }

    let award = XpAward {
        xp,
        level_before,
        level_after: level_for(progress.total_xp, config.xp_per_level),
    };

    if award.leveled_up() {
        tracing::info!("Level up: {} -> {}", award.level_before, award.level_after);
    }
    tracing::debug!(
        "Awarded {} XP for {} (total {})",
        xp,
        record.technique_id,
        progress.total_xp
    );

    award
}
