use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, TimeZone, Utc, Weekday};
use anyhow::{anyhow, Result};

/// True when both timestamps exist and fall on the same local calendar day.
pub fn same_day(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    same_day_in(a, b, &Local)
}

/// `same_day` against an explicit time zone.
pub fn same_day_in<Tz: TimeZone>(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, tz: &Tz) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.with_timezone(tz).date_naive() == b.with_timezone(tz).date_naive(),
        _ => false,
    }
}

/// Calendar date of a timestamp in the local zone.
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Canonical `YYYY-MM-DD` key used for completion history.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Sunday on or before `date`, clamped to the first representable date.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_sunday() as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Zero for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(0)
}

/// Resolves a human due date against `today`.
///
/// Accepts `today`/`tod`, `tomorrow`/`tom`, `eow` (coming Sunday), `eom`,
/// relative offsets (`+3d`, `+2w`, `+1m`), weekday names optionally prefixed
/// with a count (`fri`, `2:fri`) and plain `YYYY-MM-DD`.
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    let out_of_range = || anyhow!("Date out of range: {}", input);

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return today.succ_opt().ok_or_else(out_of_range),
        "eow" => {
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as u64) % 7;
            return today.checked_add_days(Days::new(days_to_sunday)).ok_or_else(out_of_range);
        }
        "eom" => {
            let last = days_in_month(today.year(), today.month());
            return Ok(today.with_day(last).unwrap_or(today));
        }
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm)
    if let Some(rest) = input.strip_prefix('+') {
        let split = rest.char_indices().last().map(|(i, _)| i).unwrap_or(0);
        let (num_str, unit) = rest.split_at(split);
        if num_str.is_empty() {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let count: u32 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;

        return match unit {
            "d" => today.checked_add_days(Days::new(count as u64)).ok_or_else(out_of_range),
            "w" => today.checked_add_days(Days::new(count as u64 * 7)).ok_or_else(out_of_range),
            // Jan 31 + 1m clamps to the last day of February
            "m" => today
                .checked_add_months(Months::new(count))
                .ok_or_else(out_of_range),
            _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as u64
                + 7
                - today.weekday().num_days_from_sunday() as u64;
            if days_needed > 7 {
                days_needed -= 7;
            }
            // count = 1 means the next one, count = 2 the one after that
            let extra_weeks = u64::try_from(count.saturating_sub(1)).unwrap_or(0);
            return extra_weeks
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_needed))
                .and_then(|days| today.checked_add_days(Days::new(days)))
                .ok_or_else(out_of_range);
        }
    }

    // 4. Fallback to the storage format
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                return Some((count, parts[1]));
            }
        }
    } else {
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
