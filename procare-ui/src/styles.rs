#![cfg(target_arch = "wasm32")]

use procare_core::markup::{CARD_STYLES, ERROR_STYLES};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-procare-card]";

/// CSS cho editor, kèm design token dễ ghi đè.
pub const EDITOR_STYLES: &str = r#"
:root {
  --procare-editor-gap: 16px;
  --procare-editor-radius: var(--ha-card-border-radius, 20px);
  --procare-editor-divider: var(--divider-color, #eeeeee);
  --procare-editor-muted: var(--secondary-text-color, #52606d);
}

.procare-editor {
  display: flex;
  flex-direction: column;
  gap: var(--procare-editor-gap);
}

.procare-editor details {
  border: 1px solid var(--procare-editor-divider);
  border-radius: var(--procare-editor-radius);
  overflow: hidden;
}

.procare-editor summary {
  font-weight: 500;
  font-size: 1rem;
  padding: 12px 16px;
  cursor: pointer;
  user-select: none;
  display: flex;
  align-items: center;
}

.procare-editor .section-icon {
  margin-right: 8px;
  color: var(--primary-text-color);
}

.procare-editor .section-content {
  display: flex;
  flex-direction: column;
  gap: 12px;
  padding: 16px;
}

.procare-editor .editor-field {
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.procare-editor .field-label {
  font-weight: 500;
}

.procare-editor .field-helper {
  font-size: 0.85em;
  color: var(--procare-editor-muted);
}

.procare-editor .editor-placeholder {
  padding: 16px;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-procare-card", "v1")?;
    style_el.set_text_content(Some(&format!(
        "{CARD_STYLES}\n{ERROR_STYLES}\n{EDITOR_STYLES}"
    )));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
