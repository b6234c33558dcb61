//! Card timeline: giữ cấu hình, nhận trạng thái host và dựng lại view.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::CardConfig;
use crate::date_format::{DisplayLocale, DisplayZone};
use crate::error::CardError;
use crate::host::EntityStateProvider;
use crate::markup::render_html;
use crate::view::{render_view, CardView};

pub const CARD_TYPE: &str = "procare-timeline-card";
pub const EDITOR_ELEMENT: &str = "procare-timeline-card-editor";
/// Gợi ý chiều cao cho host khi xếp layout.
pub const CARD_SIZE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Unconfigured,
    EntityPresent,
    EntityMissing,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineCard {
    config: Option<CardConfig>,
    locale: DisplayLocale,
    zone: DisplayZone,
    view: Option<CardView>,
}

impl TimelineCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tạo card từ cấu hình thô. Lỗi thì không có card nào được tạo.
    pub fn from_config(raw: &Value) -> Result<Self, CardError> {
        let mut card = Self::new();
        card.configure(raw)?;
        Ok(card)
    }

    pub fn with_locale(mut self, locale: DisplayLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn set_locale(&mut self, locale: DisplayLocale) {
        self.locale = locale;
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Múi giờ của người xem; timestamp có offset được đổi sang múi này.
    pub fn set_zone(&mut self, zone: DisplayZone) {
        self.zone = zone;
    }

    /// Chuẩn hoá và lưu cấu hình. Khi lỗi, trạng thái cũ giữ nguyên.
    pub fn configure(&mut self, raw: &Value) -> Result<&CardConfig, CardError> {
        let config = CardConfig::from_value(raw)?;
        debug!(
            entity = %config.entity,
            limit = config.number_of_events,
            date_format = config.date_format.as_str(),
            "đã nhận cấu hình card"
        );
        self.view = None;
        Ok(&*self.config.insert(config))
    }

    /// Dựng lại view từ trạng thái host. Chưa cấu hình thì bỏ qua.
    pub fn update<P>(&mut self, provider: &P) -> Option<&CardView>
    where
        P: EntityStateProvider + ?Sized,
    {
        let config = self.config.as_ref()?;
        let previous = self.status();

        let entity = provider.get(&config.entity);
        let view = render_view(config, entity, self.locale, self.zone);

        match (previous, view.is_error()) {
            (CardStatus::EntityMissing, false) => {
                info!(entity = %config.entity, "entity đã xuất hiện lại");
            }
            (CardStatus::EntityMissing, true) => {}
            (_, true) => warn!(entity = %config.entity, "không tìm thấy entity"),
            (_, false) => {}
        }
        debug!(items = view.items().len(), "đã render timeline");

        Some(&*self.view.insert(view))
    }

    pub fn status(&self) -> CardStatus {
        match (&self.config, &self.view) {
            (None, _) => CardStatus::Unconfigured,
            (Some(_), Some(view)) if view.is_error() => CardStatus::EntityMissing,
            (Some(_), _) => CardStatus::EntityPresent,
        }
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn locale(&self) -> DisplayLocale {
        self.locale
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    /// View của lần cập nhật gần nhất.
    pub fn view(&self) -> Option<&CardView> {
        self.view.as_ref()
    }

    /// HTML của lần cập nhật gần nhất.
    pub fn html(&self) -> Option<String> {
        self.view.as_ref().map(render_html)
    }

    pub fn card_size(&self) -> u32 {
        CARD_SIZE
    }

    /// Cấu hình mẫu cho bộ chọn card, không có entity mặc định.
    pub fn stub_config() -> Value {
        json!({})
    }
}
