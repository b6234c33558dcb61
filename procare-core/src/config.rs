//! Cấu hình card: đọc giá trị thô từ host và chuẩn hoá mặc định.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date_format::DateFormat;
use crate::error::CardError;

pub const DEFAULT_HEADER: &str = "Procare Activities";
/// Trần số mục hiển thị của nền tảng.
pub const MAX_EVENTS: usize = 10;
pub const MIN_EVENTS: usize = 1;

/// Cấu hình đã chuẩn hoá, bất biến sau khi tạo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardConfig {
    pub header: String,
    pub entity: String,
    pub number_of_events: usize,
    pub date_format: DateFormat,
}

/// Cấu hình thô như host gửi tới. Chấp nhận tên trường của các bản cũ
/// (`title`, `max_events`); khi có cả hai thì tên mới thắng.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCardConfig {
    #[serde(default)]
    pub header: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub entity: Option<Value>,
    #[serde(default)]
    pub number_of_events: Option<Value>,
    #[serde(default)]
    pub max_events: Option<Value>,
    #[serde(default)]
    pub date_format: Option<Value>,
}

impl RawCardConfig {
    // `null` đọc thành `None` nên tên cũ được dùng thay.
    fn header(&self) -> Option<&Value> {
        self.header.as_ref().or(self.title.as_ref())
    }

    fn event_limit(&self) -> Option<&Value> {
        self.number_of_events.as_ref().or(self.max_events.as_ref())
    }
}

impl TryFrom<RawCardConfig> for CardConfig {
    type Error = CardError;

    fn try_from(raw: RawCardConfig) -> Result<Self, Self::Error> {
        let entity = raw
            .entity
            .as_ref()
            .and_then(non_empty_text)
            .ok_or(CardError::MissingEntity)?;

        Ok(Self {
            header: normalize_header(raw.header()),
            entity,
            number_of_events: normalize_event_limit(raw.event_limit()),
            date_format: normalize_date_format(raw.date_format.as_ref()),
        })
    }
}

impl CardConfig {
    /// Đọc cấu hình từ giá trị JSON bất kỳ mà host cung cấp.
    pub fn from_value(value: &Value) -> Result<Self, CardError> {
        if !value.is_object() {
            return Err(CardError::InvalidConfig(
                "configuration must be an object".to_string(),
            ));
        }

        let raw: RawCardConfig = serde_json::from_value(value.clone())
            .map_err(|err| CardError::InvalidConfig(err.to_string()))?;
        raw.try_into()
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("header".to_string(), Value::from(self.header.clone()));
        map.insert("entity".to_string(), Value::from(self.entity.clone()));
        map.insert(
            "number_of_events".to_string(),
            Value::from(self.number_of_events as u64),
        );
        map.insert(
            "date_format".to_string(),
            Value::from(self.date_format.as_str()),
        );
        Value::Object(map)
    }
}

pub(crate) fn non_empty_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Header rỗng hoặc thiếu dùng [`DEFAULT_HEADER`].
pub fn normalize_header(value: Option<&Value>) -> String {
    value
        .and_then(|value| value.as_str())
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_HEADER)
        .to_string()
}

/// Số mục hiển thị: thiếu, bằng 0 hoặc không phải số thì dùng [`MAX_EVENTS`];
/// các giá trị khác bị kẹp vào khoảng 1..=10.
pub fn normalize_event_limit(value: Option<&Value>) -> usize {
    let requested = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match requested {
        Some(limit) if limit.is_finite() && limit != 0.0 => {
            clamp_event_limit(limit.trunc() as i64)
        }
        _ => MAX_EVENTS,
    }
}

pub fn clamp_event_limit(limit: i64) -> usize {
    limit.clamp(MIN_EVENTS as i64, MAX_EVENTS as i64) as usize
}

pub fn normalize_date_format(value: Option<&Value>) -> DateFormat {
    match value {
        Some(Value::String(text)) if !text.is_empty() => DateFormat::parse(text),
        Some(Value::Null) | None => DateFormat::default(),
        Some(Value::String(_)) => DateFormat::default(),
        Some(_) => DateFormat::Short,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_defaults() {
        let config = CardConfig::from_value(&json!({ "entity": "sensor.kid" })).unwrap();
        assert_eq!(config.header, DEFAULT_HEADER);
        assert_eq!(config.number_of_events, MAX_EVENTS);
        assert_eq!(config.date_format, DateFormat::MonthDdYy);
    }

    #[test]
    fn missing_or_blank_entity_is_rejected() {
        assert_eq!(
            CardConfig::from_value(&json!({ "header": "Kid" })),
            Err(CardError::MissingEntity)
        );
        assert_eq!(
            CardConfig::from_value(&json!({ "entity": "  " })),
            Err(CardError::MissingEntity)
        );
        assert!(matches!(
            CardConfig::from_value(&json!(null)),
            Err(CardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn event_limit_is_clamped() {
        assert_eq!(normalize_event_limit(Some(&json!(0))), 10);
        assert_eq!(normalize_event_limit(Some(&json!(25))), 10);
        assert_eq!(normalize_event_limit(Some(&json!(-3))), 1);
        assert_eq!(normalize_event_limit(Some(&json!(4.0))), 4);
        assert_eq!(normalize_event_limit(Some(&json!("5"))), 5);
        assert_eq!(normalize_event_limit(Some(&json!("many"))), 10);
        assert_eq!(normalize_event_limit(Some(&json!(true))), 10);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let config = CardConfig::from_value(&json!({
            "type": "custom:procare-timeline-card",
            "entity": "sensor.kid",
            "title": "Daycare",
            "max_events": 3,
            "date_format": "long"
        }))
        .unwrap();

        assert_eq!(config.header, "Daycare");
        assert_eq!(config.number_of_events, 3);
        assert_eq!(config.date_format, DateFormat::Long);
    }

    #[test]
    fn canonical_names_win_over_legacy_ones() {
        let config = CardConfig::from_value(&json!({
            "entity": "sensor.kid",
            "header": "Kid",
            "title": "Old",
            "number_of_events": 3,
            "max_events": 5
        }))
        .unwrap();

        assert_eq!(config.header, "Kid");
        assert_eq!(config.number_of_events, 3);

        let legacy_only = CardConfig::from_value(&json!({
            "entity": "sensor.kid",
            "header": null,
            "title": "Old",
            "max_events": 5
        }))
        .unwrap();
        assert_eq!(legacy_only.header, "Old");
        assert_eq!(legacy_only.number_of_events, 5);
    }

    #[test]
    fn unknown_date_format_is_short() {
        assert_eq!(normalize_date_format(Some(&json!("iso"))), DateFormat::Short);
        assert_eq!(normalize_date_format(Some(&json!(7))), DateFormat::Short);
        assert_eq!(normalize_date_format(None), DateFormat::MonthDdYy);
    }
}
