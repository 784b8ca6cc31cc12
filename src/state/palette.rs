/// Named bar colors offered in the appearance controls.
pub const COLOR_PALETTE: [(&str, [u8; 4]); 14] = [
    ("Dark Blue", [0x20, 0x66, 0xa8, 255]),
    ("Med Blue", [0x8e, 0xcd, 0xda, 255]),
    ("Light Blue", [0xcd, 0xe1, 0xec, 255]),
    ("Gray", [0xed, 0xed, 0xed, 255]),
    ("Light Red", [0xf6, 0xd6, 0xc2, 255]),
    ("Med Red", [0xd4, 0x72, 0x64, 255]),
    ("Dark Red", [0xae, 0x28, 0x2c, 255]),
    ("Dark Teal", [0x1f, 0x6f, 0x6f, 255]),
    ("Med Teal", [0x54, 0xa1, 0xa1, 255]),
    ("Light Teal", [0x9f, 0xc8, 0xc8, 255]),
    ("Soft Peach", [0xfe, 0xe8, 0xc8, 255]),
    ("Orange Mid", [0xfd, 0xbb, 0x84, 255]),
    ("Strong Orange", [0xe3, 0x4a, 0x33, 255]),
    ("Black", [0, 0, 0, 255]),
];

pub const COMBINED_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Default color for the file at `index` in upload order.
/// Wraps around once there are more files than palette entries.
pub fn color_for_index(index: usize) -> [u8; 4] {
    COLOR_PALETTE[index % COLOR_PALETTE.len()].1
}

/// Palette name of a color, if it is one of the named entries.
pub fn name_of(color: [u8; 4]) -> Option<&'static str> {
    COLOR_PALETTE
        .iter()
        .find(|(_, c)| *c == color)
        .map(|(name, _)| *name)
}

pub fn color32(color: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}
