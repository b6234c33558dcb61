//! Chọn icon cho activity dựa trên tiêu đề.

/// Icon khi không từ khoá nào khớp.
pub const DEFAULT_ICON: &str = "mdi:child-toy";

struct IconRule {
    keywords: &'static [&'static str],
    icon: &'static str,
}

// Thứ tự là thứ tự ưu tiên: luật đầu tiên khớp sẽ thắng.
const ICON_RULES: &[IconRule] = &[
    IconRule {
        keywords: &["meal", "snack", "breakfast"],
        icon: "mdi:silverware-fork-knife",
    },
    IconRule {
        keywords: &["nap"],
        icon: "mdi:power-sleep",
    },
    IconRule {
        keywords: &["diaper"],
        icon: "mdi:baby-carriage",
    },
    IconRule {
        keywords: &["health"],
        icon: "mdi:heart-pulse",
    },
    IconRule {
        keywords: &["incident"],
        icon: "mdi:alert-circle-outline",
    },
    IconRule {
        keywords: &["potty"],
        icon: "mdi:human-male-female",
    },
    IconRule {
        keywords: &["learning"],
        icon: "mdi:school",
    },
    IconRule {
        keywords: &["meds"],
        icon: "mdi:pill",
    },
    IconRule {
        keywords: &["signed in"],
        icon: "mdi:login",
    },
    IconRule {
        keywords: &["signed out"],
        icon: "mdi:logout",
    },
    IconRule {
        keywords: &["note"],
        icon: "mdi:note-text-outline",
    },
];

/// So khớp chuỗi con không phân biệt hoa thường theo bảng ưu tiên cố định.
pub fn icon_for_title(title: &str) -> &'static str {
    let title = title.to_lowercase();
    ICON_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|rule| rule.icon)
        .unwrap_or(DEFAULT_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_beats_position_in_title() {
        assert_eq!(icon_for_title("Meal note"), "mdi:silverware-fork-knife");
        assert_eq!(icon_for_title("Note about nap"), "mdi:power-sleep");
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(icon_for_title("SIGNED IN"), "mdi:login");
        assert_eq!(icon_for_title("Signed Out"), "mdi:logout");
        assert_eq!(icon_for_title("Meal: Breakfast"), "mdi:silverware-fork-knife");
        assert_eq!(icon_for_title("Diaper: wet"), "mdi:baby-carriage");
    }

    #[test]
    fn substring_matches_inside_words() {
        // "snapshot" chứa "nap".
        assert_eq!(icon_for_title("Snapshot"), "mdi:power-sleep");
        assert_eq!(icon_for_title("Homemeds"), "mdi:pill");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(icon_for_title("Activity"), DEFAULT_ICON);
        assert_eq!(icon_for_title(""), DEFAULT_ICON);
    }
}
