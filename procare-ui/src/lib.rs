//! Thành phần giao diện card timeline và editor cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::styles;
    use procare_core::{
        CardEditor, CardView, ConfigChanged, DisplayZone, EditorView, EntityStateProvider,
        FieldSelector, FormField, FormSection, HostSnapshot, HostState, TimelineCard, TimelineItem,
        CONFIG_CHANGED_EVENT, EMPTY_MESSAGE, ERROR_HEADER, PHOTO_ALT,
    };
    use serde::Serialize;
    use serde_json::Value;
    use serde_wasm_bindgen::{from_value, Serializer};
    use wasm_bindgen::prelude::*;
    use web_sys::{
        console, CustomEvent, CustomEventInit, Document, Element, HtmlInputElement,
        HtmlSelectElement, Window,
    };
    use yew::events::{Event, InputEvent};
    use yew::prelude::*;
    use yew::TargetCast;

    #[hook]
    fn use_card_styles() {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });
    }

    #[derive(Properties, PartialEq)]
    pub struct TimelineCardProps {
        pub view: CardView,
    }

    #[function_component(TimelineCardView)]
    fn timeline_card_view(props: &TimelineCardProps) -> Html {
        use_card_styles();

        match &props.view {
            CardView::Error { message } => html! {
                <ha-card header={ERROR_HEADER}>
                    <div class="error">{ message.clone() }</div>
                </ha-card>
            },
            CardView::Empty { header } => html! {
                <ha-card header={header.clone()}>
                    <div id="timeline-container">
                        <div class="no-activities">{ EMPTY_MESSAGE }</div>
                    </div>
                </ha-card>
            },
            CardView::Timeline { header, items } => html! {
                <ha-card header={header.clone()}>
                    <div id="timeline-container">
                        <div class="timeline">
                            { for items.iter().map(render_item) }
                        </div>
                    </div>
                </ha-card>
            },
        }
    }

    fn render_item(item: &TimelineItem) -> Html {
        html! {
            <div class="timeline-item">
                <div class="timeline-icon">
                    <ha-icon icon={item.icon.clone()}></ha-icon>
                </div>
                <div class="timeline-content">
                    <div class="title">{ item.title.clone() }</div>
                    <div class="time">{ item.time.clone() }</div>
                    <div class="description">{ item.description.clone() }</div>
                    { item.staff_line().map(render_staff).unwrap_or_default() }
                    { item.photo_url.as_ref().map(render_photo).unwrap_or_default() }
                </div>
            </div>
        }
    }

    fn render_staff(line: String) -> Html {
        html! { <div class="staff">{ line }</div> }
    }

    fn render_photo(url: &String) -> Html {
        html! { <img src={url.clone()} alt={PHOTO_ALT} /> }
    }

    #[derive(Properties, PartialEq)]
    pub struct CardEditorProps {
        pub editor: CardEditor,
        pub host: Option<HostState>,
    }

    #[function_component(CardEditorForm)]
    fn card_editor_form(props: &CardEditorProps) -> Html {
        use_card_styles();

        let editor = use_state(|| props.editor.clone());
        let root = use_node_ref();

        let on_edit = {
            let editor = editor.clone();
            let root = root.clone();
            Callback::from(move |(name, value): (String, Value)| {
                let mut next = (*editor).clone();
                match next.apply_form_value(&name, &value) {
                    Ok(changed) => {
                        dispatch_config_changed(&root, &changed);
                        editor.set(next);
                    }
                    Err(err) => console::error_1(&JsValue::from_str(&err.to_string())),
                }
            })
        };

        let host = props
            .host
            .as_ref()
            .map(|host| host as &dyn EntityStateProvider);

        html! {
            <div class="procare-editor" ref={root}>
                {
                    match editor.render(host) {
                        EditorView::Unconfigured { message } => html! {
                            <div class="editor-placeholder">{ message }</div>
                        },
                        EditorView::Form(form) => html! {
                            for form.sections.iter().map(|section| render_section(section, &on_edit))
                        },
                    }
                }
            </div>
        }
    }

    fn render_section(section: &FormSection, on_edit: &Callback<(String, Value)>) -> Html {
        let fields = html! {
            for section.fields.iter().map(|field| render_field(field, on_edit))
        };

        match &section.title {
            Some(title) => html! {
                <details open={section.expanded}>
                    <summary>
                        {
                            section
                                .icon
                                .as_ref()
                                .map(|icon| html! { <ha-icon class="section-icon" icon={icon.clone()}></ha-icon> })
                                .unwrap_or_default()
                        }
                        { title.clone() }
                    </summary>
                    <div class="section-content">{ fields }</div>
                </details>
            },
            None => html! { <div class="section-content">{ fields }</div> },
        }
    }

    fn render_field(field: &FormField, on_edit: &Callback<(String, Value)>) -> Html {
        let name = field.name.clone();
        let current = text_value(&field.value);

        let control = match &field.selector {
            FieldSelector::Text => {
                let on_edit = on_edit.clone();
                let oninput = Callback::from(move |event: InputEvent| {
                    let input: HtmlInputElement = event.target_unchecked_into();
                    on_edit.emit((name.clone(), Value::from(input.value())));
                });
                html! { <input type="text" value={current} oninput={oninput} /> }
            }
            FieldSelector::Number { min, max, step } => {
                let on_edit = on_edit.clone();
                let onchange = Callback::from(move |event: Event| {
                    let input: HtmlInputElement = event.target_unchecked_into();
                    on_edit.emit((name.clone(), Value::from(input.value())));
                });
                html! {
                    <input
                        type="number"
                        min={min.to_string()}
                        max={max.to_string()}
                        step={step.to_string()}
                        value={current}
                        onchange={onchange}
                    />
                }
            }
            FieldSelector::Select { options, .. } => {
                let placeholder = field.needs_placeholder();
                let on_edit = on_edit.clone();
                let onchange = Callback::from(move |event: Event| {
                    let select: HtmlSelectElement = event.target_unchecked_into();
                    on_edit.emit((name.clone(), Value::from(select.value())));
                });
                html! {
                    <select onchange={onchange}>
                        if placeholder {
                            <option value="" selected=true></option>
                        }
                        {
                            for options.iter().map(|option| html! {
                                <option
                                    value={option.value.clone()}
                                    selected={option.value == current}
                                >
                                    { option.label.clone() }
                                </option>
                            })
                        }
                    </select>
                }
            }
        };

        html! {
            <label class="editor-field">
                <span class="field-label">{ field.label.clone() }</span>
                { control }
                {
                    field
                        .helper
                        .as_ref()
                        .map(|helper| html! { <span class="field-helper">{ helper.clone() }</span> })
                        .unwrap_or_default()
                }
            </label>
        }
    }

    fn text_value(value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    fn dispatch_config_changed(root: &NodeRef, changed: &ConfigChanged) {
        let Some(element) = root.cast::<Element>() else {
            return;
        };

        let detail = match changed.serialize(&Serializer::json_compatible()) {
            Ok(detail) => detail,
            Err(err) => {
                console::error_1(&JsValue::from_str(&format!("Không serialize cấu hình: {err}")));
                return;
            }
        };

        let init = CustomEventInit::new();
        init.set_detail(&detail);
        init.set_bubbles(true);
        init.set_composed(true);

        match CustomEvent::new_with_event_init_dict(CONFIG_CHANGED_EVENT, &init) {
            Ok(event) => {
                if let Err(err) = element.dispatch_event(&event) {
                    console::error_1(&err);
                }
            }
            Err(err) => console::error_1(&err),
        }
    }

    fn viewer_zone() -> Option<DisplayZone> {
        let format =
            js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new());
        js_sys::Reflect::get(&format.resolved_options(), &JsValue::from_str("timeZone"))
            .ok()?
            .as_string()
            .and_then(|name| DisplayZone::from_name(&name))
    }

    fn find_target(selector: &str) -> Result<Element, JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))
    }

    #[wasm_bindgen]
    pub fn mount_timeline_card(
        selector: &str,
        config: JsValue,
        hass: JsValue,
    ) -> Result<(), JsValue> {
        let target = find_target(selector)?;
        let config: Value = from_value(config)?;
        let snapshot: HostSnapshot = from_value(hass)?;

        let mut card = TimelineCard::from_config(&config)
            .map_err(|err| JsValue::from_str(&err.to_string()))?
            .with_locale(snapshot.display_locale())
            .with_zone(snapshot.display_zone(viewer_zone()));
        let view = card
            .update(&snapshot.states)
            .cloned()
            .ok_or_else(|| JsValue::from_str("Card chưa được cấu hình"))?;

        yew::Renderer::<TimelineCardView>::with_root_and_props(
            target,
            TimelineCardProps { view },
        )
        .render();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn mount_card_editor(
        selector: &str,
        config: JsValue,
        hass: JsValue,
    ) -> Result<(), JsValue> {
        let target = find_target(selector)?;

        let mut editor = CardEditor::new();
        if !config.is_undefined() && !config.is_null() {
            editor.configure(&from_value::<Value>(config)?);
        }
        let host = if hass.is_undefined() || hass.is_null() {
            None
        } else {
            Some(from_value::<HostSnapshot>(hass)?.states)
        };

        yew::Renderer::<CardEditorForm>::with_root_and_props(
            target,
            CardEditorProps { editor, host },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_card_editor, mount_timeline_card};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline_card(
    _: &str,
    _: wasm_bindgen::JsValue,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "procare-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_card_editor(
    _: &str,
    _: wasm_bindgen::JsValue,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "procare-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
