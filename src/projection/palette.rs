use ratatui::style::Color;

/// Series colors, indexed by the FNV-1a hash of a group key.
pub const SERIES_COLORS: [Color; 16] = [
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Rgb(240, 248, 255), // alice blue
    Color::Rgb(255, 248, 220), // cornsilk
    Color::Rgb(220, 20, 60),   // crimson
    Color::Rgb(148, 0, 211),   // dark violet
    Color::Rgb(255, 20, 147),  // deep pink
    Color::Rgb(255, 215, 0),   // gold
    Color::Rgb(75, 0, 130),    // indigo
    Color::Rgb(230, 230, 250), // lavender
    Color::Rgb(240, 128, 128), // light coral
    Color::Rgb(255, 160, 122), // light salmon
];

/// Color of series that are not the highlighted group (slate gray).
pub const DIMMED: Color = Color::Rgb(112, 128, 144);

/// Splash banner colors, one per pulse step.
pub const PULSE_STEP_COLORS: [Color; 10] = [
    Color::Rgb(0x43, 0x21, 0x55),
    Color::Rgb(0x4e, 0x26, 0x67),
    Color::Rgb(0x5f, 0x2d, 0x84),
    Color::Rgb(0x79, 0x38, 0xb2),
    Color::Rgb(0x8e, 0x4e, 0xc6),
    Color::Rgb(0x9d, 0x5b, 0xd2),
    Color::Rgb(0x8e, 0x4e, 0xc6),
    Color::Rgb(0x79, 0x38, 0xb2),
    Color::Rgb(0x5f, 0x2d, 0x84),
    Color::Rgb(0x4e, 0x26, 0x67),
];

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

pub fn fnv1a32(input: &str) -> u32 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

pub fn color_for_group(group_key: &str) -> Color {
    SERIES_COLORS[fnv1a32(group_key) as usize % SERIES_COLORS.len()]
}

pub fn pulse_color(step: usize) -> Color {
    PULSE_STEP_COLORS[step % PULSE_STEP_COLORS.len()]
}
