//! Colors and fonts shared by the charts.
use plotters::style::RGBColor;

pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const LIGHT_SALMON: RGBColor = RGBColor(255, 160, 122);
pub const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
pub const DARK_GRAY: RGBColor = RGBColor(169, 169, 169);
pub const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

/// Default cycle for categorical series.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub const FONT: &str = "sans-serif";
