//! Color types: the packed ARGB value the host thinks in, the RGBA byte
//! layout the native window buffer expects, and the palette cycled by draws.

use bytemuck::{Pod, Zeroable};

/// A 32-bit color packed as `0xAARRGGBB`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

// Channel extraction keeps only the low byte after shifting.
#[expect(clippy::cast_possible_truncation)]
impl Argb {
    /// Fully transparent black, used to blank a surface on teardown.
    pub const TRANSPARENT: Self = Self(0);

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Reorder into the byte layout of an `R8G8B8A8_UNORM` buffer.
    #[must_use]
    pub const fn to_rgba8(self) -> Rgba8 {
        Rgba8 {
            r: self.red(),
            g: self.green(),
            b: self.blue(),
            a: self.alpha(),
        }
    }

    /// Channels as `[r, g, b, a]` for `glClearColor`.
    ///
    /// Each channel is divided by 256 in floating point, so a full channel
    /// maps to `255 / 256`.
    #[must_use]
    pub fn to_gl(self) -> [f32; 4] {
        let channel = |value: u8| f32::from(value) / 256.0;
        [
            channel(self.red()),
            channel(self.green()),
            channel(self.blue()),
            channel(self.alpha()),
        ]
    }
}

impl std::fmt::LowerHex for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.0, f)
    }
}

/// One pixel of an `R8G8B8A8_UNORM` buffer, laid out byte for byte.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

/// The colors cycled through by successive draws.
pub const DEFAULT_PALETTE: [Argb; 6] = [
    Argb(0x88bf_360c),
    Argb(0xcc3e_2723),
    Argb(0xaaff_d600),
    Argb(0x6664_dd17),
    Argb(0x8802_77bd),
    Argb(0xff88_0e4f),
];

/// A fixed, ordered list of colors with a cursor that wraps around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Argb>,
    cursor: usize,
}

impl Palette {
    /// Create a palette. An empty list falls back to [`DEFAULT_PALETTE`].
    #[must_use]
    pub fn new(colors: Vec<Argb>) -> Self {
        let colors = if colors.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            colors
        };
        Self { colors, cursor: 0 }
    }

    /// The color the next draw will use.
    #[must_use]
    pub fn current(&self) -> Argb {
        self.colors[self.cursor]
    }

    /// Move to the next color, wrapping after the last one.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.colors.len();
    }

    /// Index of [`current`](Self::current) in the palette.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; an empty palette is replaced by the default one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_reorders_to_rgba_bytes() {
        let pixel = Argb(0x88bf_360c).to_rgba8();
        assert_eq!(bytemuck::bytes_of(&pixel), &[0xbf, 0x36, 0x0c, 0x88]);
    }

    #[test]
    fn gl_channels_divide_by_256() {
        let [r, g, b, a] = Argb(0x8000_ff40).to_gl();
        assert!((r - 0.0).abs() < f32::EPSILON);
        assert!((g - 255.0 / 256.0).abs() < f32::EPSILON);
        assert!((b - 0.25).abs() < f32::EPSILON);
        assert!((a - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn transparent_is_all_zero() {
        assert_eq!(Argb::TRANSPARENT.to_gl(), [0.0; 4]);
        assert_eq!(Argb::TRANSPARENT.to_rgba8(), Rgba8::zeroed());
    }

    #[test]
    fn hex_formatting_pads_like_the_log_line() {
        assert_eq!(format!("{:08x}", Argb(0x0277_bd)), "000277bd");
    }

    #[test]
    fn palette_wraps_after_last_color() {
        let mut palette = Palette::default();
        for _ in 0..palette.len() {
            palette.advance();
        }
        assert_eq!(palette.cursor(), 0);
        assert_eq!(palette.current(), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn empty_palette_uses_default() {
        let palette = Palette::new(Vec::new());
        assert_eq!(palette.len(), DEFAULT_PALETTE.len());
        assert!(!palette.is_empty());
    }
}
