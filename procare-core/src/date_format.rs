//! Định dạng thời gian theo lựa chọn của người dùng và locale hiển thị.

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chuỗi hiển thị khi timestamp không đọc được.
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Kiểu định dạng ngày giờ cho từng mục trên timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DateFormat {
    Short,
    Long,
    Date,
    Time,
    #[default]
    MonthDdYy,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        DateFormat::Short,
        DateFormat::Long,
        DateFormat::Date,
        DateFormat::Time,
        DateFormat::MonthDdYy,
    ];

    /// Giá trị lạ được coi như `short`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "long" => Self::Long,
            "date" => Self::Date,
            "time" => Self::Time,
            "monthddyy" => Self::MonthDdYy,
            _ => Self::Short,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Date => "date",
            Self::Time => "time",
            Self::MonthDdYy => "monthddyy",
        }
    }

    /// Nhãn hiển thị trong editor.
    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Long => "Long",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::MonthDdYy => "Month dd yy",
        }
    }
}

impl From<String> for DateFormat {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Locale dùng để hiển thị tên tháng, tên thứ và thứ tự các thành phần.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DisplayLocale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "vi-VN")]
    ViVn,
}

struct LocalePatterns {
    date: &'static str,
    time: &'static str,
    short: &'static str,
    long: &'static str,
    month_dd_yy: &'static str,
}

const EN_US: LocalePatterns = LocalePatterns {
    date: "%-m/%-d/%Y",
    time: "%-I:%M:%S %p",
    short: "%-m/%-d/%Y, %-I:%M:%S %p",
    long: "%A, %B %-d at %I:%M %p",
    month_dd_yy: "%B %d, %y at %I:%M %p",
};

const EN_GB: LocalePatterns = LocalePatterns {
    date: "%d/%m/%Y",
    time: "%H:%M:%S",
    short: "%d/%m/%Y, %H:%M:%S",
    long: "%A %-d %B at %H:%M",
    month_dd_yy: "%d %B %y at %H:%M",
};

const DE_DE: LocalePatterns = LocalePatterns {
    date: "%-d.%-m.%Y",
    time: "%H:%M:%S",
    short: "%-d.%-m.%Y, %H:%M:%S",
    long: "%A, %-d. %B um %H:%M",
    month_dd_yy: "%d. %B %y um %H:%M",
};

const FR_FR: LocalePatterns = LocalePatterns {
    date: "%d/%m/%Y",
    time: "%H:%M:%S",
    short: "%d/%m/%Y %H:%M:%S",
    long: "%A %-d %B à %H:%M",
    month_dd_yy: "%d %B %y à %H:%M",
};

const VI_VN: LocalePatterns = LocalePatterns {
    date: "%-d/%-m/%Y",
    time: "%H:%M:%S",
    short: "%H:%M:%S %-d/%-m/%Y",
    long: "%H:%M %A, %-d %B",
    month_dd_yy: "%H:%M %d %B, %y",
};

impl DisplayLocale {
    /// Đọc tag kiểu `de`, `de-DE`, `de_DE`. Tag không hỗ trợ rơi về `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let mut parts = normalized.split('-');
        let language = parts.next().unwrap_or_default();
        let region = parts.next();

        match (language, region) {
            ("en", Some("gb" | "uk" | "ie" | "au" | "nz")) => Self::EnGb,
            ("en", _) => Self::EnUs,
            ("de", _) => Self::DeDe,
            ("fr", _) => Self::FrFr,
            ("vi", _) => Self::ViVn,
            _ => Self::EnUs,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
            Self::ViVn => "vi-VN",
        }
    }

    fn chrono_locale(self) -> Locale {
        match self {
            Self::EnUs => Locale::en_US,
            Self::EnGb => Locale::en_GB,
            Self::DeDe => Locale::de_DE,
            Self::FrFr => Locale::fr_FR,
            Self::ViVn => Locale::vi_VN,
        }
    }

    fn patterns(self) -> &'static LocalePatterns {
        match self {
            Self::EnUs => &EN_US,
            Self::EnGb => &EN_GB,
            Self::DeDe => &DE_DE,
            Self::FrFr => &FR_FR,
            Self::ViVn => &VI_VN,
        }
    }

    fn pattern(self, format: DateFormat) -> &'static str {
        let patterns = self.patterns();
        match format {
            DateFormat::Date => patterns.date,
            DateFormat::Time => patterns.time,
            DateFormat::Long => patterns.long,
            DateFormat::MonthDdYy => patterns.month_dd_yy,
            DateFormat::Short => patterns.short,
        }
    }
}

/// Thời điểm của một activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Có offset (hoặc epoch, coi như UTC): đổi sang múi giờ hiển thị.
    Zoned(DateTime<FixedOffset>),
    /// Không có offset: hiển thị đúng giờ đã ghi.
    Wall(NaiveDateTime),
}

/// Múi giờ dùng để hiển thị timestamp có offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Giữ offset ghi trong timestamp.
    #[default]
    Recorded,
    Named(Tz),
}

impl DisplayZone {
    /// Tên IANA, ví dụ `America/New_York`. Tên lạ trả về `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(Self::Named)
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Recorded => None,
            Self::Named(tz) => Some(tz.name()),
        }
    }
}

/// Đọc timestamp của activity: chuỗi RFC 3339, ISO không có offset, ngày ISO,
/// hoặc epoch milliseconds (số hoặc chuỗi số).
pub fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|millis| millis as i64))
            .and_then(from_epoch_millis),
        Value::String(text) => parse_timestamp_str(text),
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(Timestamp::Zoned(parsed));
    }

    for pattern in NAIVE_DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(Timestamp::Wall(naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(Timestamp::Wall);
    }

    text.parse::<i64>().ok().and_then(from_epoch_millis)
}

fn from_epoch_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis).map(|dt| Timestamp::Zoned(dt.fixed_offset()))
}

/// Định dạng timestamp theo locale và múi giờ hiển thị. `None` trả về
/// [`INVALID_DATE`].
pub fn format_timestamp(
    timestamp: Option<&Timestamp>,
    format: DateFormat,
    locale: DisplayLocale,
    zone: DisplayZone,
) -> String {
    let Some(timestamp) = timestamp else {
        return INVALID_DATE.to_string();
    };

    let pattern = locale.pattern(format);
    let chrono_locale = locale.chrono_locale();

    match (timestamp, zone) {
        (Timestamp::Zoned(at), DisplayZone::Named(tz)) => at
            .with_timezone(&tz)
            .format_localized(pattern, chrono_locale)
            .to_string(),
        (Timestamp::Zoned(at), DisplayZone::Recorded) => {
            at.format_localized(pattern, chrono_locale).to_string()
        }
        // Mẫu không in offset nên gắn UTC chỉ để mượn `format_localized`.
        (Timestamp::Wall(naive), _) => naive
            .and_utc()
            .format_localized(pattern, chrono_locale)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(text: &str) -> Timestamp {
        parse_timestamp(&json!(text)).expect("timestamp hợp lệ")
    }

    fn new_york() -> DisplayZone {
        DisplayZone::from_name("America/New_York").expect("múi giờ hợp lệ")
    }

    #[test]
    fn unknown_format_falls_back_to_short() {
        assert_eq!(DateFormat::parse("fancy"), DateFormat::Short);
        assert_eq!(DateFormat::parse(" MonthDDYY "), DateFormat::MonthDdYy);
        assert_eq!(DateFormat::from("time".to_string()), DateFormat::Time);
    }

    #[test]
    fn locale_tags_are_lenient() {
        assert_eq!(DisplayLocale::from_tag("de"), DisplayLocale::DeDe);
        assert_eq!(DisplayLocale::from_tag("en_GB"), DisplayLocale::EnGb);
        assert_eq!(DisplayLocale::from_tag("en-us"), DisplayLocale::EnUs);
        assert_eq!(DisplayLocale::from_tag("ja-JP"), DisplayLocale::EnUs);
        assert_eq!(DisplayLocale::from_tag(""), DisplayLocale::EnUs);
    }

    #[test]
    fn keeps_wall_clock_of_offset_timestamps() {
        let ts = parsed("2024-03-05T14:30:00-05:00");
        assert_eq!(
            format_timestamp(
                Some(&ts),
                DateFormat::Time,
                DisplayLocale::EnUs,
                DisplayZone::Recorded
            ),
            "2:30:00 PM"
        );
    }

    #[test]
    fn reads_epoch_millis() {
        let ts = parse_timestamp(&json!(1_709_649_000_000_i64)).expect("epoch hợp lệ");
        assert_eq!(
            format_timestamp(
                Some(&ts),
                DateFormat::Date,
                DisplayLocale::EnUs,
                DisplayZone::Recorded
            ),
            "3/5/2024"
        );
        assert_eq!(parse_timestamp(&json!("1709649000000")), Some(ts));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("yesterday-ish")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!({"at": 1})), None);
        assert_eq!(
            format_timestamp(None, DateFormat::Long, DisplayLocale::EnUs, new_york()),
            INVALID_DATE
        );
    }

    #[test]
    fn date_only_is_midnight() {
        let ts = parsed("2024-03-05");
        assert_eq!(
            format_timestamp(
                Some(&ts),
                DateFormat::Short,
                DisplayLocale::EnGb,
                DisplayZone::Recorded
            ),
            "05/03/2024, 00:00:00"
        );
    }

    #[test]
    fn utc_and_epoch_follow_display_zone() {
        let utc = parsed("2024-03-05T19:30:00Z");
        let epoch = parse_timestamp(&json!(1_709_667_000_000_i64)).expect("epoch hợp lệ");

        for ts in [utc, epoch] {
            assert_eq!(
                format_timestamp(
                    Some(&ts),
                    DateFormat::MonthDdYy,
                    DisplayLocale::EnUs,
                    new_york()
                ),
                "March 05, 24 at 02:30 PM"
            );
            assert_eq!(
                format_timestamp(
                    Some(&ts),
                    DateFormat::MonthDdYy,
                    DisplayLocale::EnUs,
                    DisplayZone::Recorded
                ),
                "March 05, 24 at 07:30 PM"
            );
        }
    }

    #[test]
    fn wall_clock_values_ignore_display_zone() {
        let ts = parsed("2024-03-05T14:30:00");
        assert_eq!(
            format_timestamp(Some(&ts), DateFormat::Time, DisplayLocale::EnUs, new_york()),
            "2:30:00 PM"
        );
    }

    #[test]
    fn zone_names_are_iana() {
        assert_eq!(new_york().name(), Some("America/New_York"));
        assert_eq!(DisplayZone::from_name("Mars/Olympus"), None);
        assert_eq!(DisplayZone::Recorded.name(), None);
    }
}
