use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};

use super::rule::RecurrenceRule;

/// 月度扫描上限（9 年），覆盖 `m 29 2` 跨越非闰世纪年的最长间隔
const MONTHLY_SCAN_LIMIT: u32 = 12 * 9;

impl RecurrenceRule {
    /// 计算从 `anchor` 出发、不早于 `now` 的最近一次发生日期
    ///
    /// 纯函数，对任何已解析的规则都有结果。`anchor >= now` 时，
    /// 按天和按年规则直接返回 `anchor`；按周和按月规则以
    /// `max(anchor, now)` 为起点，当天命中即返回当天。
    pub fn next_occurrence(&self, now: NaiveDate, anchor: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily { step_days } => next_daily(now, anchor, *step_days),
            Self::Weekly { weekdays } => next_weekly(now, anchor, weekdays),
            Self::Monthly { days, months } => next_monthly(now, anchor, days, months),
            Self::Yearly => next_yearly(now, anchor),
        }
    }
}

fn next_daily(now: NaiveDate, anchor: NaiveDate, step_days: u32) -> NaiveDate {
    if anchor >= now {
        return anchor;
    }

    let step = i64::from(step_days);
    let behind = (now - anchor).num_days();
    let steps = (behind + step - 1) / step;

    u64::try_from(steps * step)
        .ok()
        .and_then(|offset| anchor.checked_add_days(Days::new(offset)))
        .unwrap_or(NaiveDate::MAX)
}

fn next_weekly(now: NaiveDate, anchor: NaiveDate, weekdays: &BTreeSet<u32>) -> NaiveDate {
    let cursor = anchor.max(now);
    let today = cursor.weekday().number_from_monday();

    let offset = weekdays
        .iter()
        .map(|&weekday| (weekday + 7 - today) % 7)
        .min()
        .unwrap_or(0);

    cursor
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MAX)
}

fn next_monthly(
    now: NaiveDate,
    anchor: NaiveDate,
    days: &BTreeSet<i32>,
    months: &BTreeSet<u32>,
) -> NaiveDate {
    let cursor = anchor.max(now);
    let (mut year, mut month, mut min_day) = (cursor.year(), cursor.month(), cursor.day());

    for _ in 0..MONTHLY_SCAN_LIMIT {
        if months.is_empty() || months.contains(&month) {
            let length = days_in_month(year, month);
            let hit = days
                .iter()
                .filter_map(|&code| resolve_day(code, length))
                .filter(|&day| day >= min_day)
                .min()
                .and_then(|day| NaiveDate::from_ymd_opt(year, month, day));

            if let Some(date) = hit {
                return date;
            }
        }

        min_day = 1;
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }

    // 解析阶段已排除不可达规则
    cursor
}

fn next_yearly(now: NaiveDate, anchor: NaiveDate) -> NaiveDate {
    if anchor >= now {
        return anchor;
    }

    let mut years = (now.year() - anchor.year() - 1).max(1);
    loop {
        match advance_years(anchor, years) {
            Some(candidate) if candidate >= now => return candidate,
            Some(_) => years += 1,
            None => return NaiveDate::MAX,
        }
    }
}

/// 从 `anchor` 逐年推进 `years`（≥ 1）次后的日期
///
/// 2 月 29 日的下一年必然不是闰年，第一次推进就落到 3 月 1 日，
/// 之后一直停在 3 月 1 日，因此可以直接算出第 n 次的结果。
fn advance_years(anchor: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = anchor.year().checked_add(years)?;
    if (anchor.month(), anchor.day()) == (2, 29) {
        NaiveDate::from_ymd_opt(year, 3, 1)
    } else {
        NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day())
    }
}

/// 将日期代码映射为当月的具体日期，超出当月长度的正数返回 `None`
fn resolve_day(code: i32, length: u32) -> Option<u32> {
    match code {
        -1 => Some(length),
        -2 => Some(length - 1),
        day => u32::try_from(day).ok().filter(|&day| day >= 1 && day <= length),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// 某月可能的最大天数（二月按闰年计）
pub(super) fn max_days_in_month(month: u32) -> u32 {
    days_in_month(2000, month)
}
