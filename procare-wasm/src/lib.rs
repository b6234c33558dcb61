//! Bridge WASM <-> JavaScript cho card timeline và editor cấu hình.
//!
//! Lớp custom element phía JS chỉ cần chuyển tiếp `setConfig`, `hass` và sự
//! kiện của form sang các handle ở đây.

use procare_core::{
    markup, CardEditor, CardError, DisplayZone, EntityStateProvider, FormLayout, HostSnapshot,
    HostState, TimelineCard, EDITOR_ELEMENT,
};
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod registry;

#[cfg(target_arch = "wasm32")]
pub use registry::register_card;

/// Đăng ký card khi module được nạp.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    register_card()
}

#[wasm_bindgen(js_name = ProcareTimelineCard)]
pub struct TimelineCardHandle {
    card: TimelineCard,
}

#[wasm_bindgen(js_class = ProcareTimelineCard)]
impl TimelineCardHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TimelineCardHandle {
        Self {
            card: TimelineCard::new(),
        }
    }

    /// Ném lỗi cho host khi cấu hình thiếu entity.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let raw = read_json(config, "config")?;
        self.card
            .configure(&raw)
            .map(|_| ())
            .map_err(|err| JsValue::from_str(&format_card_error(err)))
    }

    /// Nhận đối tượng `hass`, trả về HTML mới cho shadow root
    /// (`undefined` khi card chưa được cấu hình).
    #[wasm_bindgen(js_name = setHass)]
    pub fn set_hass(&mut self, hass: JsValue) -> Result<Option<String>, JsValue> {
        let snapshot = read_snapshot(hass)?;
        self.card.set_locale(snapshot.display_locale());
        self.card.set_zone(snapshot.display_zone(viewer_zone()));
        Ok(self.card.update(&snapshot.states).map(markup::render_html))
    }

    #[wasm_bindgen(js_name = getView)]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.card.view())
    }

    #[wasm_bindgen(js_name = getCardSize)]
    pub fn card_size(&self) -> u32 {
        self.card.card_size()
    }

    #[wasm_bindgen(js_name = getStubConfig)]
    pub fn stub_config() -> Result<JsValue, JsValue> {
        to_js(&TimelineCard::stub_config())
    }

    #[wasm_bindgen(js_name = getConfigElement)]
    pub fn config_element() -> String {
        EDITOR_ELEMENT.to_string()
    }
}

impl Default for TimelineCardHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_name = ProcareTimelineCardEditor)]
pub struct CardEditorHandle {
    editor: CardEditor,
    host: Option<HostState>,
}

#[wasm_bindgen(js_class = ProcareTimelineCardEditor)]
impl CardEditorHandle {
    /// `flat = true` dùng form phẳng thay vì ba nhóm.
    #[wasm_bindgen(constructor)]
    pub fn new(flat: Option<bool>) -> CardEditorHandle {
        let layout = if flat.unwrap_or(false) {
            FormLayout::Flat
        } else {
            FormLayout::Grouped
        };
        Self {
            editor: CardEditor::with_layout(layout),
            host: None,
        }
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let raw = if config.is_undefined() || config.is_null() {
            Value::Null
        } else {
            read_json(config, "config")?
        };
        self.editor.configure(&raw);
        Ok(())
    }

    #[wasm_bindgen(js_name = setHass)]
    pub fn set_hass(&mut self, hass: JsValue) -> Result<(), JsValue> {
        self.host = Some(read_snapshot(hass)?.states);
        Ok(())
    }

    /// Mô hình form (các nhóm, trường, lựa chọn) để vẽ lại editor.
    pub fn render(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.render(self.provider()))
    }

    /// Schema phẳng cho form cài đặt của host; rỗng khi chưa cấu hình.
    pub fn schema(&self) -> Result<JsValue, JsValue> {
        let schema = match self.editor.render(self.provider()) {
            procare_core::EditorView::Form(form) => form.ha_schema(),
            procare_core::EditorView::Unconfigured { .. } => Vec::new(),
        };
        to_js(&schema)
    }

    /// Áp dụng một thay đổi, trả về `detail` cho sự kiện `config-changed`.
    #[wasm_bindgen(js_name = valueChanged)]
    pub fn value_changed(&mut self, name: &str, value: JsValue) -> Result<JsValue, JsValue> {
        let value = read_json(value, name)?;
        let changed = self
            .editor
            .apply_form_value(name, &value)
            .map_err(|err| JsValue::from_str(&format_card_error(err)))?;
        to_js(&changed)
    }

    fn provider(&self) -> Option<&dyn EntityStateProvider> {
        self.host
            .as_ref()
            .map(|host| host as &dyn EntityStateProvider)
    }
}

/// Múi giờ của trình duyệt, theo `Intl.DateTimeFormat().resolvedOptions()`.
#[cfg(target_arch = "wasm32")]
fn viewer_zone() -> Option<DisplayZone> {
    let format =
        js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new());
    js_sys::Reflect::get(&format.resolved_options(), &JsValue::from_str("timeZone"))
        .ok()?
        .as_string()
        .and_then(|name| DisplayZone::from_name(&name))
}

#[cfg(not(target_arch = "wasm32"))]
fn viewer_zone() -> Option<DisplayZone> {
    None
}

fn read_json(value: JsValue, what: &str) -> Result<Value, JsValue> {
    from_value::<Value>(value)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được {what}: {err}")))
}

fn read_snapshot(hass: JsValue) -> Result<HostSnapshot, JsValue> {
    from_value::<HostSnapshot>(hass)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được hass: {err}")))
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize được: {err}")))
}

fn format_card_error(err: CardError) -> String {
    err.to_string()
}
