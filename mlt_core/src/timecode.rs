//! # 时间码运算
//!
//! 工程文件中的时间统一使用 `HH:MM:SS.mmm` 文本表示，内部以毫秒 (`u64`) 计算。
//! 差值运算的结果可能为负，因此使用 `i64`。

use std::sync::LazyLock;

use regex::Regex;

use crate::MltError;

/// 匹配 `HH:MM:SS.mmm`：小时至少两位，分和秒 00-59，毫秒固定三位。
static TIMECODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2,}):([0-5]\d):([0-5]\d)\.(\d{3})$").expect("未能编译 TIMECODE_REGEX")
});

/// 零时间码。
pub const ZERO_TIMECODE: &str = "00:00:00.000";

/// 解析 `HH:MM:SS.mmm` 格式的时间码到毫秒。
///
/// 小时部分不设上限，但超过两位时不允许有前导零，
/// 以保证 [`format_timecode`] 是它的精确逆运算。
///
/// # Errors
///
/// 格式不符合时返回 [`MltError::InvalidTimecode`]。
pub fn parse_timecode(text: &str) -> Result<u64, MltError> {
    let caps = TIMECODE_REGEX.captures(text).ok_or_else(|| {
        MltError::InvalidTimecode(format!("'{text}' 不符合 HH:MM:SS.mmm 格式"))
    })?;

    let hours_str = &caps[1];
    if hours_str.len() > 2 && hours_str.starts_with('0') {
        return Err(MltError::InvalidTimecode(format!(
            "时间码 '{text}' 的小时部分 '{hours_str}' 含有多余的前导零"
        )));
    }

    let hours = hours_str.parse::<u64>().map_err(|e| {
        MltError::InvalidTimecode(format!("在 '{text}' 中解析小时 '{hours_str}' 失败: {e}"))
    })?;
    // 以下三部分已由正则限定为定长数字
    let minutes: u64 = caps[2].parse().unwrap_or_default();
    let seconds: u64 = caps[3].parse().unwrap_or_default();
    let millis: u64 = caps[4].parse().unwrap_or_default();

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1000 + millis))
        .ok_or_else(|| MltError::InvalidTimecode(format!("时间码 '{text}' 超出可表示范围")))
}

/// 将毫秒格式化为 `HH:MM:SS.mmm`。
#[must_use]
pub fn format_timecode(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// 计算 `b - a`。
#[must_use]
pub fn difference(a: u64, b: u64) -> i64 {
    to_signed(b) - to_signed(a)
}

/// 计算 `(end - start) - fixed_out`，即预留固定片段时长之后剩余的空白长度。
///
/// 结果可能为负，这里不做截断，由调用方决定如何处理。
#[must_use]
pub fn adjusted_duration(start: u64, end: u64, fixed_out: u64) -> i64 {
    difference(start, end) - to_signed(fixed_out)
}

fn to_signed(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timecode() {
        assert_eq!(parse_timecode("00:00:00.000").unwrap(), 0);
        assert_eq!(parse_timecode("00:00:05.000").unwrap(), 5000);
        assert_eq!(parse_timecode("01:02:03.456").unwrap(), 3_723_456);
        assert_eq!(parse_timecode("99:59:59.999").unwrap(), 359_999_999);
        assert_eq!(parse_timecode("100:00:00.000").unwrap(), 360_000_000);

        for bad in [
            "",
            "abc",
            "0:00:00.000",
            "00:60:00.000",
            "00:00:60.000",
            "00:00:00.00",
            "00:00:00.0000",
            "00:00:00",
            "-01:00:00.000",
            "00:00:05,000",
            "000:00:00.000",
            " 00:00:00.000",
        ] {
            assert!(
                matches!(parse_timecode(bad), Err(MltError::InvalidTimecode(_))),
                "应当拒绝 '{bad}'"
            );
        }
    }

    #[test]
    fn test_format_is_inverse_of_parse() {
        for text in [
            "00:00:00.000",
            "00:00:00.483",
            "00:00:04.517",
            "03:59:59.960",
            "04:00:00.000",
            "23:59:59.999",
            "123:45:06.007",
        ] {
            assert_eq!(format_timecode(parse_timecode(text).unwrap()), text);
        }
    }

    #[test]
    fn test_difference_and_adjusted_duration() {
        assert_eq!(difference(5000, 10_000), 5000);
        assert_eq!(difference(10_000, 5000), -5000);
        assert_eq!(adjusted_duration(0, 5000, 483), 4517);
        assert_eq!(adjusted_duration(5000, 10_000, 483), 4517);
        assert_eq!(adjusted_duration(5000, 5200, 483), -283);
        assert_eq!(adjusted_duration(5000, 5483, 483), 0);
    }
}
