use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const ACCENT: Color = Color::Yellow;
pub const GOOD: Color = Color::Green;
pub const BAD: Color = Color::Red;
