//! Trạng thái entity do host cung cấp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date_format::{DisplayLocale, DisplayZone};
use crate::error::CardError;

/// Trạng thái hiện tại của một entity kèm túi thuộc tính.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityState {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute("friendly_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn activities(&self) -> Option<&Value> {
        self.attribute("activities")
    }
}

/// Khả năng đọc trạng thái entity, do host cung cấp.
pub trait EntityStateProvider {
    fn get(&self, entity_id: &str) -> Option<&EntityState>;

    /// Danh sách entity hiện có, dùng cho bộ chọn của editor.
    fn entity_ids(&self) -> Vec<String>;
}

/// Ảnh chụp `hass.states`: entity id → trạng thái.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HostState {
    states: BTreeMap<String, EntityState>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, state: EntityState) {
        self.states.insert(entity_id.into(), state);
    }

    pub fn remove(&mut self, entity_id: &str) -> Option<EntityState> {
        self.states.remove(entity_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl EntityStateProvider for HostState {
    fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    fn entity_ids(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }
}

impl FromIterator<(String, EntityState)> for HostState {
    fn from_iter<I: IntoIterator<Item = (String, EntityState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

const SERVER_TIME_ZONE: &str = "server";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostLocale {
    #[serde(default)]
    pub language: String,
    /// `local` (giờ của trình duyệt) hoặc `server`.
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Múi giờ IANA của server.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Phần của đối tượng `hass` mà card cần: `states`, locale và múi giờ.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostSnapshot {
    #[serde(default)]
    pub states: HostState,
    #[serde(default)]
    pub locale: Option<HostLocale>,
    #[serde(default)]
    pub config: Option<HostConfig>,
}

impl HostSnapshot {
    /// Đọc JSON dạng `{ "states": {...} }` hoặc trực tiếp bảng entity.
    pub fn from_json_str(input: &str) -> Result<Self, CardError> {
        let value: Value =
            serde_json::from_str(input).map_err(|err| CardError::Parse(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CardError> {
        if !value.is_object() {
            return Err(CardError::Parse(
                "host state must be a JSON object".to_string(),
            ));
        }

        let parsed = if value.get("states").is_some_and(Value::is_object) {
            serde_json::from_value(value)
        } else {
            serde_json::from_value(value).map(|states| Self {
                states,
                ..Self::default()
            })
        };

        parsed.map_err(|err| CardError::Parse(err.to_string()))
    }

    pub fn display_locale(&self) -> DisplayLocale {
        self.locale
            .as_ref()
            .map(|locale| DisplayLocale::from_tag(&locale.language))
            .unwrap_or_default()
    }

    /// Múi giờ hiển thị. `viewer` là múi giờ của người xem (trình duyệt);
    /// host chọn `server` thì dùng múi giờ server trước. Không có gì thì giữ
    /// offset của timestamp.
    pub fn display_zone(&self, viewer: Option<DisplayZone>) -> DisplayZone {
        let server = self
            .config
            .as_ref()
            .and_then(|config| config.time_zone.as_deref())
            .and_then(DisplayZone::from_name);
        let prefers_server = self
            .locale
            .as_ref()
            .and_then(|locale| locale.time_zone.as_deref())
            == Some(SERVER_TIME_ZONE);

        let zone = if prefers_server {
            server.or(viewer)
        } else {
            viewer.or(server)
        };
        zone.unwrap_or_default()
    }
}
