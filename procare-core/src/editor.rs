//! Editor cấu hình của card.
//!
//! Editor giữ cấu hình dạng object JSON để không làm mất các khoá mà host tự
//! thêm (ví dụ `type`). Mỗi lần sửa một trường sẽ sinh ra một object cấu hình
//! mới hoàn chỉnh, không bao giờ là phần chênh lệch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::{
    clamp_event_limit, normalize_date_format, normalize_event_limit, normalize_header,
    MAX_EVENTS, MIN_EVENTS,
};
use crate::date_format::DateFormat;
use crate::error::CardError;
use crate::host::{EntityState, EntityStateProvider};

pub const UNCONFIGURED_MESSAGE: &str = "Please configure the card.";
/// Chỉ entity có tiền tố này mới xuất hiện trong bộ chọn.
pub const ENTITY_PREFIX: &str = "sensor.";
pub const CONFIG_CHANGED_EVENT: &str = "config-changed";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EditorField {
    Header,
    Entity,
    NumberOfEvents,
    DateFormat,
}

impl EditorField {
    pub const ALL: [EditorField; 4] = [
        EditorField::Header,
        EditorField::Entity,
        EditorField::NumberOfEvents,
        EditorField::DateFormat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Entity => "entity",
            Self::NumberOfEvents => "number_of_events",
            Self::DateFormat => "date_format",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

struct FieldText {
    name: &'static str,
    label: &'static str,
    helper: &'static str,
}

const FIELD_TEXT: [FieldText; 4] = [
    FieldText {
        name: "header",
        label: "Header",
        helper: "Header text for the card.",
    },
    FieldText {
        name: "entity",
        label: "Procare Child Sensor Entity",
        helper: "Select the Procare child timeline entity to display.",
    },
    FieldText {
        name: "number_of_events",
        label: "Number of Events",
        helper: "Number of most recent events to display. A maximum of 10 events can be displayed.",
    },
    FieldText {
        name: "date_format",
        label: "Date Format",
        helper: "Date format for the card.",
    },
];

/// Nhãn của trường; tên lạ trả về chính nó.
pub fn field_label(name: &str) -> &str {
    FIELD_TEXT
        .iter()
        .find(|text| text.name == name)
        .map(|text| text.label)
        .unwrap_or(name)
}

pub fn field_helper(name: &str) -> Option<&'static str> {
    FIELD_TEXT
        .iter()
        .find(|text| text.name == name)
        .map(|text| text.helper)
}

/// Một lần sửa trường trong form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Header(String),
    Entity(String),
    NumberOfEvents(i64),
    DateFormat(DateFormat),
}

impl FieldEdit {
    pub fn field(&self) -> EditorField {
        match self {
            Self::Header(_) => EditorField::Header,
            Self::Entity(_) => EditorField::Entity,
            Self::NumberOfEvents(_) => EditorField::NumberOfEvents,
            Self::DateFormat(_) => EditorField::DateFormat,
        }
    }

    /// Đọc giá trị mà form gửi lên theo tên trường.
    pub fn from_form(name: &str, value: &Value) -> Result<Self, CardError> {
        let field = EditorField::from_name(name)
            .ok_or_else(|| CardError::InvalidConfig(format!("unknown field `{name}`")))?;

        let edit = match field {
            EditorField::Header => Self::Header(form_text(value)),
            EditorField::Entity => Self::Entity(form_text(value)),
            EditorField::NumberOfEvents => {
                let number = match value {
                    Value::Number(number) => number.as_f64(),
                    Value::String(text) => text.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|number| number.is_finite())
                .ok_or_else(|| {
                    CardError::InvalidConfig("number_of_events must be a number".to_string())
                })?;
                Self::NumberOfEvents(number.trunc() as i64)
            }
            EditorField::DateFormat => {
                Self::DateFormat(DateFormat::parse(value.as_str().unwrap_or_default()))
            }
        };

        Ok(edit)
    }

    fn into_value(self) -> Value {
        match self {
            Self::Header(text) | Self::Entity(text) => Value::from(text),
            Self::NumberOfEvents(limit) => Value::from(clamp_event_limit(limit) as u64),
            Self::DateFormat(format) => Value::from(format.as_str()),
        }
    }
}

fn form_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Thông báo gửi cho host: luôn mang toàn bộ cấu hình mới.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigChanged {
    pub config: Value,
}

/// Điền mặc định cho các trường đã biết, giữ nguyên khoá lạ.
///
/// Tên trường cũ (`title`, `max_events`) được chuyển sang tên chuẩn. Entity
/// thiếu được để rỗng.
pub fn with_defaults(config: &Value) -> Map<String, Value> {
    let mut map = config.as_object().cloned().unwrap_or_default();
    let legacy_header = map.remove("title");
    let legacy_limit = map.remove("max_events");

    let header = normalize_header(present(&map, "header").or(legacy_header.as_ref()));
    let entity = map
        .get("entity")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let limit =
        normalize_event_limit(present(&map, "number_of_events").or(legacy_limit.as_ref()));
    let date_format = normalize_date_format(map.get("date_format"));

    map.insert("header".to_string(), Value::from(header));
    map.insert("entity".to_string(), Value::from(entity));
    map.insert("number_of_events".to_string(), Value::from(limit as u64));
    map.insert(
        "date_format".to_string(),
        Value::from(date_format.as_str()),
    );
    map
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormLayout {
    /// Ba nhóm: General, Filters, Date Format.
    #[default]
    Grouped,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSelector {
    Text,
    Select {
        options: Vec<SelectOption>,
        dropdown: bool,
    },
    Number {
        min: i64,
        max: i64,
        step: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub helper: Option<String>,
    pub selector: FieldSelector,
    pub value: Value,
}

impl FormField {
    /// Schema theo định dạng của form cài đặt chung trên host.
    pub fn ha_schema(&self) -> Value {
        let selector = match &self.selector {
            FieldSelector::Text => json!({ "text": {} }),
            FieldSelector::Select { options, dropdown } => {
                let mut select = json!({ "options": options });
                if *dropdown {
                    select["mode"] = json!("dropdown");
                }
                json!({ "select": select })
            }
            FieldSelector::Number { min, max, step } => {
                json!({ "number": { "min": min, "max": max, "step": step } })
            }
        };

        let mut schema = json!({ "name": self.name, "selector": selector });
        if let Some(helper) = &self.helper {
            schema["description"] = json!(helper);
        }
        schema
    }

    /// Bộ chọn mà giá trị hiện tại không khớp lựa chọn nào (entity còn
    /// trống chẳng hạn) cần một dòng trống đứng đầu, để lựa chọn đầu tiên
    /// vẫn phát được sự kiện thay đổi.
    pub fn needs_placeholder(&self) -> bool {
        match &self.selector {
            FieldSelector::Select { options, .. } => {
                let current = self.value.as_str().unwrap_or_default();
                !options.iter().any(|option| option.value == current)
            }
            FieldSelector::Text | FieldSelector::Number { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormSection {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub expanded: bool,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorForm {
    pub sections: Vec<FormSection>,
}

impl EditorForm {
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields().find(|field| field.name == name)
    }

    pub fn ha_schema(&self) -> Vec<Value> {
        self.fields().map(FormField::ha_schema).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorView {
    Unconfigured { message: String },
    Form(EditorForm),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardEditor {
    config: Option<Map<String, Value>>,
    layout: FormLayout,
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: FormLayout) -> Self {
        Self {
            config: None,
            layout,
        }
    }

    /// Lưu cấu hình (đã điền mặc định). Gọi `render` sau đó để vẽ lại form.
    pub fn configure(&mut self, config: &Value) {
        let config = with_defaults(config);
        debug!(keys = config.len(), "editor nhận cấu hình");
        self.config = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref()
    }

    pub fn config_value(&self) -> Option<Value> {
        self.config.clone().map(Value::Object)
    }

    /// Thay đúng một trường và trả về toàn bộ cấu hình mới.
    pub fn apply(&mut self, edit: FieldEdit) -> ConfigChanged {
        let mut next = self
            .config
            .clone()
            .unwrap_or_else(|| with_defaults(&Value::Null));
        let field = edit.field();
        next.insert(field.name().to_string(), edit.into_value());
        debug!(field = field.name(), "editor đổi cấu hình");

        self.config = Some(next.clone());
        ConfigChanged {
            config: Value::Object(next),
        }
    }

    pub fn apply_form_value(
        &mut self,
        name: &str,
        value: &Value,
    ) -> Result<ConfigChanged, CardError> {
        let edit = FieldEdit::from_form(name, value)?;
        Ok(self.apply(edit))
    }

    /// Dựng form. Chưa có host thì danh sách entity rỗng.
    pub fn render(&self, host: Option<&dyn EntityStateProvider>) -> EditorView {
        let Some(config) = &self.config else {
            return EditorView::Unconfigured {
                message: UNCONFIGURED_MESSAGE.to_string(),
            };
        };

        let sections = match self.layout {
            FormLayout::Grouped => vec![
                section(
                    Some(("General", "mdi:cog")),
                    true,
                    &[EditorField::Header, EditorField::Entity],
                    config,
                    host,
                ),
                section(
                    Some(("Filters", "mdi:filter-variant")),
                    false,
                    &[EditorField::NumberOfEvents],
                    config,
                    host,
                ),
                section(
                    Some(("Date Format", "mdi:translate")),
                    false,
                    &[EditorField::DateFormat],
                    config,
                    host,
                ),
            ],
            FormLayout::Flat => vec![section(None, true, &EditorField::ALL, config, host)],
        };

        EditorView::Form(EditorForm { sections })
    }
}

fn section(
    heading: Option<(&str, &str)>,
    expanded: bool,
    fields: &[EditorField],
    config: &Map<String, Value>,
    host: Option<&dyn EntityStateProvider>,
) -> FormSection {
    FormSection {
        title: heading.map(|(title, _)| title.to_string()),
        icon: heading.map(|(_, icon)| icon.to_string()),
        expanded,
        fields: fields
            .iter()
            .map(|field| form_field(*field, config, host))
            .collect(),
    }
}

fn form_field(
    field: EditorField,
    config: &Map<String, Value>,
    host: Option<&dyn EntityStateProvider>,
) -> FormField {
    let selector = match field {
        EditorField::Header => FieldSelector::Text,
        EditorField::Entity => FieldSelector::Select {
            options: entity_options(host),
            dropdown: true,
        },
        EditorField::NumberOfEvents => FieldSelector::Number {
            min: MIN_EVENTS as i64,
            max: MAX_EVENTS as i64,
            step: 1,
        },
        EditorField::DateFormat => FieldSelector::Select {
            options: DateFormat::ALL
                .into_iter()
                .map(|format| SelectOption {
                    value: format.as_str().to_string(),
                    label: format.label().to_string(),
                })
                .collect(),
            dropdown: false,
        },
    };

    FormField {
        name: field.name().to_string(),
        label: field_label(field.name()).to_string(),
        helper: field_helper(field.name()).map(str::to_string),
        selector,
        value: config.get(field.name()).cloned().unwrap_or(Value::Null),
    }
}

/// Ứng viên cho bộ chọn entity, sắp theo id, nhãn là `friendly_name` nếu có.
pub fn entity_options(host: Option<&dyn EntityStateProvider>) -> Vec<SelectOption> {
    let Some(host) = host else {
        return Vec::new();
    };

    let mut ids: Vec<String> = host
        .entity_ids()
        .into_iter()
        .filter(|id| id.starts_with(ENTITY_PREFIX))
        .collect();
    ids.sort();

    ids.into_iter()
        .map(|id| {
            let label = host
                .get(&id)
                .and_then(EntityState::friendly_name)
                .map(str::to_string)
                .unwrap_or_else(|| id.clone());
            SelectOption { value: id, label }
        })
        .collect()
}
