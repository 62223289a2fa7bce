use stance_shared::StanceKind;

pub const CONTAINER: &str = "bg-gray-900 container mx-auto px-4 py-6 max-w-md rounded-xl shadow-lg";

pub const CARD_SECTION: &str = "bg-gray-800 border border-gray-700 p-3 rounded-lg shadow-sm";
pub const ALERT_CARD: &str = "p-3 rounded-lg shadow-md mb-4";
pub const POPUP: &str = "absolute z-50 mt-2 w-64 bg-gray-800 border border-gray-600 rounded-lg shadow-xl p-3";

pub const BUTTON_BASE: &str = "px-4 py-2 rounded-lg font-medium text-white transition-all duration-150 disabled:opacity-50 disabled:cursor-not-allowed";
pub const BUTTON_PRIMARY: &str = "bg-blue-600 hover:bg-blue-700 focus:ring-2 focus:ring-blue-400 focus:outline-none";
pub const BUTTON_TRIGGER: &str = "w-7 h-7 rounded-full bg-gray-700 hover:bg-gray-600 text-gray-200 text-sm font-bold";

pub const TEXT_LABEL: &str = "block text-sm font-semibold text-gray-200";
pub const TEXT_ERROR: &str = "text-sm text-red-500 font-semibold";
pub const TEXT_MUTED: &str = "text-sm text-gray-400";
pub const HEADING_MD: &str = "text-2xl font-bold mb-5 text-gray-100";

pub const FLEX_BETWEEN: &str = "flex justify-between items-center";
pub const GRID_STATS: &str = "grid grid-cols-4 gap-1 text-xs text-center mb-3";
pub const SPACE_Y_BASE: &str = "space-y-3";

pub fn combine_classes(base: &str, additional: &str) -> String {
    format!("{} {}", base, additional)
}

pub fn button_primary() -> String {
    combine_classes(BUTTON_BASE, BUTTON_PRIMARY)
}

pub fn alert_style(style: &str) -> String {
    match style {
        "error" => combine_classes(ALERT_CARD, "bg-red-500 text-white shadow-lg"),
        "success" => combine_classes(ALERT_CARD, "bg-green-500 text-white shadow-lg"),
        _ => combine_classes(ALERT_CARD, "bg-blue-500 text-white shadow-lg"),
    }
}

pub fn stance_color(stance: StanceKind) -> &'static str {
    match stance {
        StanceKind::Left => "bg-red-400",
        StanceKind::Right => "bg-teal-400",
        StanceKind::Neutral => "bg-gray-400",
        StanceKind::Antiwar => "bg-purple-500",
    }
}

pub fn stance_badge(stance: StanceKind) -> String {
    combine_classes("px-2 py-0.5 rounded text-xs font-semibold text-white", stance_color(stance))
}

pub fn stance_text(stance: StanceKind) -> &'static str {
    match stance {
        StanceKind::Left => "Left",
        StanceKind::Right => "Right",
        StanceKind::Neutral => "Neutral",
        StanceKind::Antiwar => "Anti-war",
    }
}
