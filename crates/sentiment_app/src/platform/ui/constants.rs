/// Width in cells of the progress, distribution and gauge bars.
pub const BAR_WIDTH: usize = 30;
/// Longest source preview shown in the list before it is cut.
pub const PREVIEW_WIDTH: usize = 80;
/// Longest source URL shown before it is cut.
pub const URL_WIDTH: usize = 100;
/// Longest KPI card value or company name shown before it is cut.
pub const VALUE_WIDTH: usize = 40;

pub const HEADING_PROGRESS: &str = "Progress";
pub const HEADING_SOURCES: &str = "Sources";
pub const HEADING_CHARTS: &str = "Sentiment overview";
pub const HEADING_KPIS: &str = "KPI dashboard";
pub const HEADING_EVIDENCE: &str = "Evidence";

pub const BAR_FILLED: char = '#';
pub const BAR_EMPTY: char = '-';
