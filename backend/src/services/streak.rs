use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First login ever.
    Started,
    /// Logged in the calendar day after the previous login.
    Extended,
    /// A day or more was skipped.
    Reset,
    /// Same calendar day as the previous login.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: i64,
    pub change: StreakChange,
}

/// Advance a login streak. Days are compared as UTC calendar dates, so a
/// second login on the same date leaves the streak untouched.
pub fn advance(current: i64, last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> StreakUpdate {
    let Some(last_login) = last_login else {
        return StreakUpdate {
            streak: 1,
            change: StreakChange::Started,
        };
    };

    match (now.date_naive() - last_login.date_naive()).num_days() {
        1 => StreakUpdate {
            streak: current + 1,
            change: StreakChange::Extended,
        },
        days if days > 1 => StreakUpdate {
            streak: 1,
            change: StreakChange::Reset,
        },
        // Same day, or a last_login in the future.
        _ => StreakUpdate {
            streak: current,
            change: StreakChange::Unchanged,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_first_login_starts_at_one() {
        let update = advance(0, None, at(2026, 3, 1, 9));
        assert_eq!(update.streak, 1);
        assert_eq!(update.change, StreakChange::Started);
    }

    #[test]
    fn test_yesterday_extends() {
        let now = at(2026, 3, 2, 9);
        let update = advance(4, Some(now - Duration::days(1)), now);
        assert_eq!(update.streak, 5);
        assert_eq!(update.change, StreakChange::Extended);
    }

    #[test]
    fn test_three_days_ago_resets() {
        let now = at(2026, 3, 4, 9);
        let update = advance(9, Some(now - Duration::days(3)), now);
        assert_eq!(update.streak, 1);
        assert_eq!(update.change, StreakChange::Reset);
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let update = advance(3, Some(at(2026, 3, 4, 1)), at(2026, 3, 4, 23));
        assert_eq!(update.streak, 3);
        assert_eq!(update.change, StreakChange::Unchanged);
    }

    #[test]
    fn test_same_day_does_not_start_zero_streak() {
        let update = advance(0, Some(at(2026, 3, 4, 8)), at(2026, 3, 4, 10));
        assert_eq!(update.streak, 0);
    }

    #[test]
    fn test_calendar_days_not_elapsed_hours() {
        // 23:30 to 00:10 the next day is under an hour but a new calendar day.
        let last = Utc.with_ymd_and_hms(2026, 3, 4, 23, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 0, 10, 0).unwrap();
        assert_eq!(advance(2, Some(last), now).streak, 3);

        // 23:50 to 00:10 two dates later is just over a day but skips a date.
        let last = Utc.with_ymd_and_hms(2026, 3, 4, 23, 50, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 6, 0, 10, 0).unwrap();
        assert_eq!(advance(2, Some(last), now).streak, 1);
    }

    #[test]
    fn test_future_last_login_is_unchanged() {
        let now = at(2026, 3, 4, 9);
        let update = advance(6, Some(now + Duration::days(2)), now);
        assert_eq!(update.streak, 6);
        assert_eq!(update.change, StreakChange::Unchanged);
    }
}
