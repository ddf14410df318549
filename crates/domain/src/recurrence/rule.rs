use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::occurrence::max_days_in_month;

static DAILY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^d ([1-9]|[1-9][0-9]|[1-3][0-9]{2}|400)$").expect("daily pattern compiles")
});

static WEEKLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^w ([1-7](?:,[1-7])*)$").expect("weekly pattern compiles"));

static MONTHLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^m ((?:-1|-2|[1-9]|[12][0-9]|3[01])(?:,(?:-1|-2|[1-9]|[12][0-9]|3[01]))*)",
        r"(?: ((?:[1-9]|1[0-2])(?:,(?:[1-9]|1[0-2]))*))?$",
    ))
    .expect("monthly pattern compiles")
});

static YEARLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y$").expect("yearly pattern compiles"));

/// 规则解析失败的具体原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleErrorReason {
    UnknownKind,
    DailyFormat,
    WeeklyFormat,
    MonthlyFormat,
    YearlyFormat,
    /// 日期列表在所选月份中永远不会出现，例如 `m 31 2,4`
    UnreachableMonthlyDays,
}

impl fmt::Display for RuleErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self {
            Self::UnknownKind => "未知的规则类型，支持 d、w、m、y",
            Self::DailyFormat => "应为 'd <1-400>'",
            Self::WeeklyFormat => "应为 'w <1-7>[,<1-7>...]'",
            Self::MonthlyFormat => "应为 'm <1-31|-1|-2>[,...] [<1-12>[,...]]'",
            Self::YearlyFormat => "应为 'y'",
            Self::UnreachableMonthlyDays => "所选月份中不存在指定的日期",
        };
        f.write_str(hint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("重复规则为空")]
    Empty,

    #[error("无效的重复规则 '{rule}': {reason}")]
    InvalidFormat {
        rule: String,
        reason: RuleErrorReason,
    },

    #[error("规则 '{rule}' 的下一次日期超出 9999-12-31")]
    OutOfRange { rule: String },
}

impl RuleError {
    fn invalid(rule: &str, reason: RuleErrorReason) -> Self {
        Self::InvalidFormat {
            rule: rule.to_string(),
            reason,
        }
    }
}

/// 已解析的重复规则
///
/// 各变体只能通过 [`RecurrenceRule::parse`] 在本 crate 之外获得，
/// 因此调用方拿到的规则总是合法的。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// `d <n>`：每隔 n 天
    #[non_exhaustive]
    Daily { step_days: u32 },

    /// `w <list>`：每周的指定几天，1 = 周一，7 = 周日
    #[non_exhaustive]
    Weekly { weekdays: BTreeSet<u32> },

    /// `m <days> [<months>]`：每月的指定几天，-1 为最后一天，-2 为倒数第二天；
    /// 月份为空表示每个月
    #[non_exhaustive]
    Monthly {
        days: BTreeSet<i32>,
        months: BTreeSet<u32>,
    },

    /// `y`：每年同月同日
    #[non_exhaustive]
    Yearly,
}

impl RecurrenceRule {
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        if text.is_empty() {
            return Err(RuleError::Empty);
        }

        let kind = text.split(' ').next().unwrap_or_default();
        match kind {
            "d" => Self::parse_daily(text),
            "w" => Self::parse_weekly(text),
            "m" => Self::parse_monthly(text),
            "y" => {
                if YEARLY_RE.is_match(text) {
                    Ok(Self::Yearly)
                } else {
                    Err(RuleError::invalid(text, RuleErrorReason::YearlyFormat))
                }
            }
            _ => Err(RuleError::invalid(text, RuleErrorReason::UnknownKind)),
        }
    }

    fn parse_daily(text: &str) -> Result<Self, RuleError> {
        let invalid = || RuleError::invalid(text, RuleErrorReason::DailyFormat);
        let caps = DAILY_RE.captures(text).ok_or_else(invalid)?;
        let step_days = caps[1].parse().map_err(|_| invalid())?;
        Ok(Self::Daily { step_days })
    }

    fn parse_weekly(text: &str) -> Result<Self, RuleError> {
        let invalid = || RuleError::invalid(text, RuleErrorReason::WeeklyFormat);
        let caps = WEEKLY_RE.captures(text).ok_or_else(invalid)?;
        let weekdays = parse_list(&caps[1]).ok_or_else(invalid)?;
        Ok(Self::Weekly { weekdays })
    }

    fn parse_monthly(text: &str) -> Result<Self, RuleError> {
        let invalid = || RuleError::invalid(text, RuleErrorReason::MonthlyFormat);
        let caps = MONTHLY_RE.captures(text).ok_or_else(invalid)?;

        let days: BTreeSet<i32> = parse_list(&caps[1]).ok_or_else(invalid)?;
        let months: BTreeSet<u32> = match caps.get(2) {
            Some(list) => parse_list(list.as_str()).ok_or_else(invalid)?,
            None => BTreeSet::new(),
        };

        if !monthly_days_reachable(&days, &months) {
            return Err(RuleError::invalid(
                text,
                RuleErrorReason::UnreachableMonthlyDays,
            ));
        }

        Ok(Self::Monthly { days, months })
    }
}

fn parse_list<T: FromStr + Ord>(list: &str) -> Option<BTreeSet<T>> {
    list.split(',').map(|item| item.parse().ok()).collect()
}

/// 至少有一个日期能在某个所选月份（按闰年计）中出现
fn monthly_days_reachable(days: &BTreeSet<i32>, months: &BTreeSet<u32>) -> bool {
    let longest = if months.is_empty() {
        31
    } else {
        months
            .iter()
            .map(|&month| max_days_in_month(month))
            .max()
            .unwrap_or(31)
    };

    days.iter()
        .any(|&day| day < 0 || u32::try_from(day).is_ok_and(|day| day <= longest))
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: ToString>(items: &BTreeSet<T>) -> String {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }

        match self {
            Self::Daily { step_days } => write!(f, "d {step_days}"),
            Self::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            Self::Monthly { days, months } if months.is_empty() => write!(f, "m {}", join(days)),
            Self::Monthly { days, months } => write!(f, "m {} {}", join(days), join(months)),
            Self::Yearly => f.write_str("y"),
        }
    }
}
