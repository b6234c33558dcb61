use js_sys::{Array, Reflect};
use procare_core::{CardDescriptor, CardRegistry, Registration};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::to_js;

const CUSTOM_CARDS_KEY: &str = "customCards";

/// Thêm mô tả card vào `window.customCards`. Gọi lại nhiều lần không tạo bản sao.
#[wasm_bindgen(js_name = registerCard)]
pub fn register_card() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
    let key = JsValue::from_str(CUSTOM_CARDS_KEY);

    let existing = Reflect::get(&window, &key)?;
    let cards: Array = if Array::is_array(&existing) {
        existing.unchecked_into()
    } else {
        let fresh = Array::new();
        Reflect::set(&window, &key, &fresh)?;
        fresh
    };

    let mut registry = CardRegistry::new();
    for entry in cards.iter() {
        if let Ok(descriptor) = from_value::<CardDescriptor>(entry) {
            registry.register(descriptor);
        }
    }

    let descriptor = CardDescriptor::procare_timeline();
    match registry.register(descriptor.clone()) {
        Registration::Unchanged => {}
        Registration::Added => {
            cards.push(&to_js(&descriptor)?);
        }
        Registration::Replaced => {
            let index = cards.find_index(&mut |entry, _, _| {
                entry_type(&entry).as_deref() == Some(descriptor.card_type.as_str())
            });
            if index >= 0 {
                cards.set(index as u32, to_js(&descriptor)?);
            }
        }
    }

    Ok(())
}

fn entry_type(entry: &JsValue) -> Option<String> {
    Reflect::get(entry, &JsValue::from_str("type"))
        .ok()
        .and_then(|value| value.as_string())
}
