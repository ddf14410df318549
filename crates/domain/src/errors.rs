//! 重复规则与日期错误到统一错误类型的转换

use tracker_core::TrackerError;

use crate::recurrence::{DateFormatError, RuleError};

impl From<RuleError> for TrackerError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::Empty => TrackerError::InvalidRepeatRule {
                rule: String::new(),
                message: err.to_string(),
            },
            RuleError::InvalidFormat { ref rule, reason } => TrackerError::InvalidRepeatRule {
                rule: rule.clone(),
                message: reason.to_string(),
            },
            RuleError::OutOfRange { .. } => TrackerError::validation(err.to_string()),
        }
    }
}

impl From<DateFormatError> for TrackerError {
    fn from(err: DateFormatError) -> Self {
        TrackerError::InvalidDate(err.input)
    }
}
