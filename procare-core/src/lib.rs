//! Logic lõi của card timeline Procare: cấu hình, chọn icon, định dạng thời
//! gian, dựng view và editor cấu hình.

mod activity;
mod card;
mod config;
mod date_format;
mod editor;
mod error;
mod host;
mod icon;
pub mod markup;
mod registry;
mod view;

pub use activity::{activities_from_attribute, ActivityRecord, DEFAULT_TITLE};
pub use card::{CardStatus, TimelineCard, CARD_SIZE, CARD_TYPE, EDITOR_ELEMENT};
pub use config::{
    clamp_event_limit, normalize_event_limit, CardConfig, RawCardConfig, DEFAULT_HEADER,
    MAX_EVENTS, MIN_EVENTS,
};
pub use date_format::{
    format_timestamp, parse_timestamp, DateFormat, DisplayLocale, DisplayZone, Timestamp,
    INVALID_DATE,
};
pub use editor::{
    entity_options, field_helper, field_label, with_defaults, CardEditor, ConfigChanged,
    EditorField, EditorForm, EditorView, FieldEdit, FieldSelector, FormField, FormLayout,
    FormSection, SelectOption, CONFIG_CHANGED_EVENT, ENTITY_PREFIX, UNCONFIGURED_MESSAGE,
};
pub use error::CardError;
pub use host::{
    EntityState, EntityStateProvider, HostConfig, HostLocale, HostSnapshot, HostState,
};
pub use icon::{icon_for_title, DEFAULT_ICON};
pub use registry::{CardDescriptor, CardRegistry, Registration};
pub use view::{render_view, CardView, TimelineItem, EMPTY_MESSAGE, ERROR_HEADER, PHOTO_ALT};
