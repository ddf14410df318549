//! `YYYYMMDD` 日期编解码
//!
//! 任务日期在存储层与接口层均以八位数字字符串表示。

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// chrono 格式串
pub const DATE_LAYOUT: &str = "%Y%m%d";

/// 八位格式能表示的最大年份
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("日期格式错误: '{input}'，应为 YYYYMMDD")]
pub struct DateFormatError {
    pub input: String,
}

/// 解析 `YYYYMMDD`，必须恰好八位 ASCII 数字且为真实存在的日期
pub fn parse_date(input: &str) -> Result<NaiveDate, DateFormatError> {
    let error = || DateFormatError {
        input: input.to_string(),
    };

    // `%Y` 同样接受位数不足的年份，先约束长度
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error());
    }

    NaiveDate::parse_from_str(input, DATE_LAYOUT).map_err(|_| error())
}

/// 日期能否写成八位 `YYYYMMDD`
pub fn is_representable(date: NaiveDate) -> bool {
    (0..=MAX_YEAR).contains(&date.year())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_LAYOUT).to_string()
}

/// serde 辅助模块：`#[serde(with = "yyyymmdd")]`
pub mod yyyymmdd {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}
