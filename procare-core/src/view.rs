//! Mô hình hiển thị dẫn xuất từ cấu hình và danh sách activity.

use serde::{Deserialize, Serialize};

use crate::activity::{activities_from_attribute, ActivityRecord};
use crate::config::CardConfig;
use crate::date_format::{format_timestamp, DisplayLocale, DisplayZone};
use crate::host::EntityState;
use crate::icon::icon_for_title;

pub const ERROR_HEADER: &str = "Timeline Card Error";
pub const EMPTY_MESSAGE: &str = "No activities to display.";
pub const PHOTO_ALT: &str = "Activity photo";

/// Kết quả render của card. Tính lại toàn bộ ở mỗi lần cập nhật.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardView {
    /// Entity cấu hình không có trong trạng thái host.
    Error { message: String },
    Empty { header: String },
    Timeline {
        header: String,
        items: Vec<TimelineItem>,
    },
}

/// Một mục trên timeline, đã chọn icon và định dạng thời gian.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineItem {
    pub icon: String,
    pub title: String,
    pub time: String,
    pub description: String,
    pub staff: Option<String>,
    pub photo_url: Option<String>,
}

impl TimelineItem {
    pub fn from_record(
        record: &ActivityRecord,
        config: &CardConfig,
        locale: DisplayLocale,
        zone: DisplayZone,
    ) -> Self {
        let title = record.display_title();
        Self {
            icon: icon_for_title(title).to_string(),
            title: title.to_string(),
            time: format_timestamp(
                record.occurred_at().as_ref(),
                config.date_format,
                locale,
                zone,
            ),
            description: record.description().to_string(),
            staff: record.staff_name().map(str::to_string),
            photo_url: record.photo().map(str::to_string),
        }
    }

    /// Dòng ghi công nhân viên, ví dụ `by Ms. Ana`.
    pub fn staff_line(&self) -> Option<String> {
        self.staff.as_ref().map(|staff| format!("by {staff}"))
    }
}

impl CardView {
    pub fn entity_not_found(entity_id: &str) -> Self {
        Self::Error {
            message: format!("Entity not found: {entity_id}"),
        }
    }

    pub fn header(&self) -> &str {
        match self {
            Self::Error { .. } => ERROR_HEADER,
            Self::Empty { header } | Self::Timeline { header, .. } => header,
        }
    }

    pub fn items(&self) -> &[TimelineItem] {
        match self {
            Self::Timeline { items, .. } => items,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Dựng view từ cấu hình và entity (nếu có). Hàm thuần, không giữ trạng thái.
pub fn render_view(
    config: &CardConfig,
    entity: Option<&EntityState>,
    locale: DisplayLocale,
    zone: DisplayZone,
) -> CardView {
    let Some(entity) = entity else {
        return CardView::entity_not_found(&config.entity);
    };

    let records = activities_from_attribute(entity.activities(), config.number_of_events);
    if records.is_empty() {
        return CardView::Empty {
            header: config.header.clone(),
        };
    }

    CardView::Timeline {
        header: config.header.clone(),
        items: records
            .iter()
            .map(|record| TimelineItem::from_record(record, config, locale, zone))
            .collect(),
    }
}
