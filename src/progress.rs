//! Daily task completion and learner statistics.
//!
//! One `DailyProgress` per calendar date records which of the five daily
//! tasks are done. A day "counts" toward streaks and the monthly figure once
//! `COUNTED_DAY_THRESHOLD` of its tasks are complete.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::StorageError;
use crate::models::date_key;
use crate::storage::{names, Store, StoreExt};

pub const TASKS_PER_DAY: u32 = 5;
pub const COUNTED_DAY_THRESHOLD: u32 = 4;
/// How far back a streak is followed.
pub const STREAK_WINDOW_DAYS: i64 = 365;
pub const DEFAULT_WEEKLY_GOAL: u32 = 28;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const EXPORT_HISTORY_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Task {
    Vocabulary,
    Idioms,
    News,
    Practice,
    #[serde(alias = "daily-gk")]
    DailyGk,
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vocabulary" => Ok(Task::Vocabulary),
            "idioms" => Ok(Task::Idioms),
            "news" => Ok(Task::News),
            "practice" => Ok(Task::Practice),
            "dailygk" | "daily-gk" => Ok(Task::DailyGk),
            other => Err(format!(
                "Unknown task '{other}'. Expected vocabulary, idioms, news, practice or dailyGk"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: String,
    #[serde(default)]
    pub vocabulary: bool,
    #[serde(default)]
    pub idioms: bool,
    #[serde(default)]
    pub news: bool,
    #[serde(default)]
    pub practice: bool,
    #[serde(default)]
    pub daily_gk: bool,
    #[serde(default)]
    pub words_learned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl DailyProgress {
    pub fn empty(date: &str) -> Self {
        Self {
            date: date.to_string(),
            vocabulary: false,
            idioms: false,
            news: false,
            practice: false,
            daily_gk: false,
            words_learned: 0,
            practice_score: None,
            completed_at: None,
        }
    }

    fn flag_mut(&mut self, task: Task) -> &mut bool {
        match task {
            Task::Vocabulary => &mut self.vocabulary,
            Task::Idioms => &mut self.idioms,
            Task::News => &mut self.news,
            Task::Practice => &mut self.practice,
            Task::DailyGk => &mut self.daily_gk,
        }
    }

    pub fn completed_count(&self) -> u32 {
        [self.vocabulary, self.idioms, self.news, self.practice, self.daily_gk]
            .iter()
            .filter(|done| **done)
            .count() as u32
    }

    pub fn counts_toward_streak(&self) -> bool {
        self.completed_count() >= COUNTED_DAY_THRESHOLD
    }

    pub fn all_done(&self) -> bool {
        self.completed_count() == TASKS_PER_DAY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_words: u32,
    pub streak_days: u32,
    pub last_active: String,
    pub weekly_goal: u32,
    pub monthly_progress: u32,
}

impl UserStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_words: 0,
            streak_days: 0,
            last_active: now.to_rfc3339(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            monthly_progress: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressExport {
    pub user_stats: UserStats,
    pub today_progress: DailyProgress,
    pub progress_history: Vec<HistoryEntry>,
}

/// Extra data reported with a task completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionDetails {
    pub words_learned: Option<u32>,
    pub score: Option<u32>,
}

type ProgressLog = BTreeMap<String, DailyProgress>;

/// Consecutive counted days ending today. An unfinished today neither
/// counts nor breaks the run; any earlier gap ends it.
pub fn streak(log: &ProgressLog, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for offset in 0..STREAK_WINDOW_DAYS {
        let date = date_key(today - Duration::days(offset));
        match log.get(&date) {
            Some(day) if day.counts_toward_streak() => streak += 1,
            _ if offset == 0 => {}
            _ => break,
        }
    }
    streak
}

/// Rounded percentage of counted days from the first of `today`'s month through `today`.
pub fn monthly_progress(log: &ProgressLog, today: NaiveDate) -> u32 {
    let total_days = today.day();
    let completed = (1..=total_days)
        .filter_map(|day| today.with_day(day))
        .filter(|date| log.get(&date_key(*date)).is_some_and(DailyProgress::counts_toward_streak))
        .count() as u32;
    if total_days == 0 {
        0
    } else {
        ((completed as f64 / total_days as f64) * 100.0).round() as u32
    }
}

/// One entry per day for the `days` days ending today, oldest first.
pub fn history(log: &ProgressLog, today: NaiveDate, days: u32) -> Vec<HistoryEntry> {
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = date_key(today - Duration::days(offset));
            let completed = log.get(&date).map_or(0, DailyProgress::completed_count);
            HistoryEntry { date, completed, total: TASKS_PER_DAY }
        })
        .collect()
}

/// Persistent progress bookkeeping over a `Store`.
#[derive(Debug)]
pub struct ProgressTracker {
    store: Arc<dyn Store>,
    lock: Mutex<()>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, lock: Mutex::new(()) }
    }

    async fn log(&self) -> Result<ProgressLog, StorageError> {
        self.store.load(names::DAILY_PROGRESS).await
    }

    async fn stored_stats(&self, now: DateTime<Utc>) -> Result<UserStats, StorageError> {
        let stats: Option<UserStats> = self.store.load(names::USER_STATS).await?;
        Ok(stats.unwrap_or_else(|| UserStats::new(now)))
    }

    pub async fn today(&self, today: NaiveDate) -> Result<DailyProgress, StorageError> {
        let key = date_key(today);
        let mut log = self.log().await?;
        Ok(log.remove(&key).unwrap_or_else(|| DailyProgress::empty(&key)))
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<UserStats, StorageError> {
        self.stored_stats(now).await
    }

    /// Mark `task` done (or undone) for today and refresh the derived stats.
    pub async fn update_task(
        &self,
        task: Task,
        completed: bool,
        details: CompletionDetails,
        now: DateTime<Utc>,
    ) -> Result<(DailyProgress, UserStats), StorageError> {
        let _guard = self.lock.lock().await;

        let today = now.date_naive();
        let key = date_key(today);
        let mut log = self.log().await?;
        let day = log.entry(key.clone()).or_insert_with(|| DailyProgress::empty(&key));

        *day.flag_mut(task) = completed;
        day.completed_at = Some(now.to_rfc3339());
        if let (Task::Vocabulary, Some(words)) = (task, details.words_learned) {
            day.words_learned += words;
        }
        if let (Task::Practice, Some(score)) = (task, details.score) {
            day.practice_score = Some(score);
        }
        let day = day.clone();
        if day.all_done() {
            info!(date = %key, "all daily tasks complete");
        }

        let mut stats = self.stored_stats(now).await?;
        stats.last_active = now.to_rfc3339();
        if let (Task::Vocabulary, Some(words)) = (task, details.words_learned) {
            stats.total_words += words;
        }
        stats.streak_days = streak(&log, today);
        stats.monthly_progress = monthly_progress(&log, today);

        self.store.save(names::DAILY_PROGRESS, &log).await?;
        self.store.save(names::USER_STATS, &stats).await?;
        info!(?task, completed, streak = stats.streak_days, "task progress updated");
        Ok((day, stats))
    }

    pub async fn history(&self, today: NaiveDate, days: u32) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(history(&self.log().await?, today, days))
    }

    pub async fn export(&self, now: DateTime<Utc>) -> Result<ProgressExport, StorageError> {
        let today = now.date_naive();
        Ok(ProgressExport {
            user_stats: self.stats(now).await?,
            today_progress: self.today(today).await?,
            progress_history: self.history(today, EXPORT_HISTORY_DAYS).await?,
        })
    }

    /// Forget all progress and statistics.
    pub async fn reset(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.store.remove(names::DAILY_PROGRESS).await?;
        self.store.remove(names::USER_STATS).await?;
        info!("progress reset");
        Ok(())
    }
}
