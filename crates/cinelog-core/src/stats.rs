use chrono::{DateTime, Datelike, TimeZone};
use cinelog_models::Movie;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct WatchlistSummary {
    pub watched: usize,
    pub pending: usize,
    pub favorites: usize,
}

/// Progress toward the monthly watched-count goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyGoal {
    pub current: usize,
    pub target: u32,
    /// Rounded, may exceed 100
    pub percentage: u32,
}

pub fn summarize(movies: &[Movie]) -> WatchlistSummary {
    movies.iter().fold(WatchlistSummary::default(), |mut summary, movie| {
        if movie.watched {
            summary.watched += 1;
        } else {
            summary.pending += 1;
        }
        if movie.is_favorite() {
            summary.favorites += 1;
        }
        summary
    })
}

/// Count watched movies whose watch date (or, lacking one, add date) falls in
/// the calendar month of `now`, judged in `now`'s time zone
pub fn monthly_goal<Tz: TimeZone>(movies: &[Movie], target: u32, now: &DateTime<Tz>) -> MonthlyGoal {
    let tz = now.timezone();
    let current = movies
        .iter()
        .filter(|m| m.watched)
        .filter_map(|m| m.date_watched_utc().or_else(|| m.date_added_utc()))
        .map(|at| at.with_timezone(&tz))
        .filter(|at| at.year() == now.year() && at.month() == now.month())
        .count();

    let percentage = if target == 0 {
        0
    } else {
        (current as f64 / target as f64 * 100.0).round() as u32
    };

    MonthlyGoal {
        current,
        target,
        percentage,
    }
}
