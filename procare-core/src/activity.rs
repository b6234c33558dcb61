//! Bản ghi activity đọc từ thuộc tính `activities` của entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date_format::{parse_timestamp, Timestamp};

pub const DEFAULT_TITLE: &str = "Activity";

/// Một sự kiện trên timeline. Dữ liệu bên ngoài, chỉ đọc, không kiểm tra hợp lệ.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub staff: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl ActivityRecord {
    /// Đọc từng trường một cách khoan dung; mục không phải object thành bản ghi rỗng.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: fields.get("id").filter(|id| !id.is_null()).cloned(),
            title: text_field(fields, "title"),
            timestamp: fields.get("timestamp").filter(|ts| !ts.is_null()).cloned(),
            details: text_field(fields, "details"),
            staff: text_field(fields, "staff"),
            photo_url: text_field(fields, "photo_url"),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn description(&self) -> &str {
        self.details.as_deref().unwrap_or_default()
    }

    pub fn staff_name(&self) -> Option<&str> {
        self.staff.as_deref().filter(|staff| !staff.is_empty())
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn occurred_at(&self) -> Option<Timestamp> {
        self.timestamp.as_ref().and_then(parse_timestamp)
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Lấy tối đa `limit` activity theo đúng thứ tự gốc. Giá trị không phải mảng
/// được coi như danh sách rỗng.
pub fn activities_from_attribute(value: Option<&Value>, limit: usize) -> Vec<ActivityRecord> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(limit)
                .map(ActivityRecord::from_value)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_missing_fields() {
        let record = ActivityRecord::from_value(&json!({ "staff": "", "photo_url": null }));
        assert_eq!(record.display_title(), DEFAULT_TITLE);
        assert_eq!(record.description(), "");
        assert_eq!(record.staff_name(), None);
        assert_eq!(record.photo(), None);
        assert_eq!(record.occurred_at(), None);
    }

    #[test]
    fn non_object_entries_become_empty_records() {
        assert_eq!(ActivityRecord::from_value(&json!("nap")), ActivityRecord::default());
        assert_eq!(ActivityRecord::from_value(&json!(42)), ActivityRecord::default());
    }

    #[test]
    fn truncates_without_reordering() {
        let list = json!([
            { "title": "c" },
            { "title": "a" },
            { "title": "b" }
        ]);
        let records = activities_from_attribute(Some(&list), 2);
        let titles: Vec<_> = records.iter().map(ActivityRecord::display_title).collect();
        assert_eq!(titles, ["c", "a"]);
    }

    #[test]
    fn non_list_attribute_is_empty() {
        assert!(activities_from_attribute(Some(&json!("oops")), 10).is_empty());
        assert!(activities_from_attribute(None, 10).is_empty());
    }
}
