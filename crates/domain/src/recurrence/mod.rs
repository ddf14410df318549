//! 重复规则引擎
//!
//! 解析任务的 `repeat` 字段并计算下一次发生日期。支持四种规则：
//!
//! | 规则 | 含义 |
//! |---|---|
//! | `d <n>` | 每隔 n 天，n ∈ [1, 400] |
//! | `w <1-7>[,...]` | 每周指定的几天，1 为周一 |
//! | `m <days> [<months>]` | 每月指定的几天，`-1`/`-2` 为月末倒数 |
//! | `y` | 每年同月同日 |
//!
//! 引擎是纯计算，不访问存储，也不记录日志。

pub mod date;
mod occurrence;
pub mod rule;

use chrono::NaiveDate;

pub use date::{
    format_date, is_representable, parse_date, yyyymmdd, DateFormatError, DATE_LAYOUT, MAX_YEAR,
};
pub use rule::{RecurrenceRule, RuleError, RuleErrorReason};

/// 解析规则并计算不早于 `now` 的下一次发生日期
///
/// 结果年份超过 [`MAX_YEAR`] 时返回 [`RuleError::OutOfRange`]。
pub fn next_date(now: NaiveDate, anchor: NaiveDate, rule: &str) -> Result<NaiveDate, RuleError> {
    let next = RecurrenceRule::parse(rule)?.next_occurrence(now, anchor);
    if !is_representable(next) {
        return Err(RuleError::OutOfRange {
            rule: rule.to_string(),
        });
    }
    Ok(next)
}

/// 同 [`next_date`]，结果格式化为 `YYYYMMDD`
pub fn compute_next_date(
    now: NaiveDate,
    anchor: NaiveDate,
    rule: &str,
) -> Result<String, RuleError> {
    next_date(now, anchor, rule).map(format_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_next_date() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 26).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2023, 11, 6).unwrap();
        assert_eq!(compute_next_date(now, anchor, "m 13").unwrap(), "20240213");
        assert_eq!(compute_next_date(now, anchor, ""), Err(RuleError::Empty));
        assert!(matches!(
            compute_next_date(now, anchor, "l 500"),
            Err(RuleError::InvalidFormat {
                reason: RuleErrorReason::UnknownKind,
                ..
            })
        ));
    }

    #[test]
    fn test_result_beyond_year_9999_is_rejected() {
        let now = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let anchor = NaiveDate::from_ymd_opt(9999, 12, 30).unwrap();

        assert!(matches!(
            compute_next_date(now, anchor, "d 7"),
            Err(RuleError::OutOfRange { ref rule }) if rule == "d 7"
        ));
        assert!(matches!(
            next_date(now, NaiveDate::from_ymd_opt(9999, 1, 1).unwrap(), "y"),
            Err(RuleError::OutOfRange { .. })
        ));
        // 仍在范围内的结果照常返回
        assert_eq!(compute_next_date(now, anchor, "d 1").unwrap(), "99991231");
        assert_eq!(compute_next_date(now, now, "w 5").unwrap(), "99991231");
    }
}
