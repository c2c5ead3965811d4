//! RGB colors, palettes and the math that turns them into PWM duties.

use crate::error::PanelError;

/// Maximum number of entries a [`Palette`] can hold.
pub const MAX_PALETTE_LEN: usize = 16;

/// An 8-bit-per-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red level.
    pub r: u8,
    /// Green level.
    pub g: u8,
    /// Blue level.
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Full red.
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    /// Full green.
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    /// Full blue.
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    /// Red + green.
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    /// Green + blue.
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    /// Red + blue.
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);

    /// Creates a color from its channel levels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other`.
    ///
    /// `fraction` is clamped to 0.0-1.0. Channel values are truncated toward
    /// zero, so a fraction of exactly 1.0 always yields `other`.
    ///
    /// ```rust
    /// use rs_rgbknob::color::Rgb;
    ///
    /// let mid = Rgb::RED.lerp(Rgb::GREEN, 0.25);
    /// assert_eq!(mid, Rgb::new(191, 63, 0));
    /// ```
    pub fn lerp(self, other: Rgb, fraction: f32) -> Rgb {
        let t = fraction.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let a = a as f32;
            (a + (b as f32 - a) * t) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Scale all channels by `intensity / 255`.
    ///
    /// ```rust
    /// use rs_rgbknob::color::Rgb;
    ///
    /// assert_eq!(Rgb::new(255, 128, 0).scaled(128), Rgb::new(128, 64, 0));
    /// assert_eq!(Rgb::CYAN.scaled(0), Rgb::BLACK);
    /// ```
    pub const fn scaled(self, intensity: u8) -> Rgb {
        const fn scale(c: u8, i: u8) -> u8 {
            ((c as u16 * i as u16) / 255) as u8
        }
        Rgb::new(
            scale(self.r, intensity),
            scale(self.g, intensity),
            scale(self.b, intensity),
        )
    }

    /// Channel levels as PWM duty fractions (0.0 to 1.0), red first.
    pub fn duty_fractions(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// The colors the default palette cycles through.
pub const DEFAULT_COLORS: [Rgb; 6] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::BLUE,
    Rgb::YELLOW,
    Rgb::CYAN,
    Rgb::MAGENTA,
];

/// Ordered, read-only ring of colors selected by the encoder.
///
/// Indices wrap in both directions.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::color::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::RED, Rgb::GREEN, Rgb::BLUE]).unwrap();
/// assert_eq!(palette.len(), 3);
/// assert_eq!(palette.wrap(0, -1), 2);
/// assert_eq!(palette.wrap(2, 1), 0);
/// assert_eq!(palette.get(1), Rgb::GREEN);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    colors: heapless::Vec<Rgb, MAX_PALETTE_LEN>,
}

impl Palette {
    /// Build a palette from 1 to [`MAX_PALETTE_LEN`] colors.
    pub fn new(colors: &[Rgb]) -> Result<Self, PanelError> {
        if colors.is_empty() {
            return Err(PanelError::Configuration("palette is empty"));
        }
        let colors = heapless::Vec::from_slice(colors)
            .map_err(|_| PanelError::Configuration("palette has more than 16 colors"))?;
        Ok(Self { colors })
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a palette holds at least one color.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapped into range.
    pub fn get(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    /// Move `index` by `offset` positions, wrapping both ways.
    pub fn wrap(&self, index: usize, offset: i32) -> usize {
        let len = self.colors.len() as i64;
        (index as i64 + offset as i64).rem_euclid(len) as usize
    }

    /// Whether `index` names a color of this palette.
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.colors.len()
    }

    /// Iterate over the colors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: heapless::Vec::from_slice(&DEFAULT_COLORS).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, 0.0), Rgb::RED);
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, 1.0), Rgb::BLUE);
    }

    #[test]
    fn lerp_clamps_fraction() {
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, 1.5), Rgb::BLUE);
        assert_eq!(Rgb::RED.lerp(Rgb::BLUE, -0.5), Rgb::RED);
    }

    #[test]
    fn lerp_halfway() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::new(200, 100, 50), 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn scaled_full_intensity_is_identity() {
        for color in DEFAULT_COLORS {
            assert_eq!(color.scaled(255), color);
        }
    }

    #[test]
    fn duty_fractions_full_and_off() {
        assert_eq!(Rgb::MAGENTA.duty_fractions(), [1.0, 0.0, 1.0]);
        assert_eq!(Rgb::BLACK.duty_fractions(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn palette_rejects_empty() {
        assert_eq!(
            Palette::new(&[]),
            Err(PanelError::Configuration("palette is empty"))
        );
    }

    #[test]
    fn palette_rejects_oversized() {
        let colors = [Rgb::RED; MAX_PALETTE_LEN + 1];
        assert!(Palette::new(&colors).is_err());
    }

    #[test]
    fn default_palette_matches_constants() {
        let palette = Palette::default();
        assert_eq!(palette.len(), DEFAULT_COLORS.len());
        assert!(palette.iter().copied().eq(DEFAULT_COLORS));
    }

    #[test]
    fn wrap_handles_large_offsets() {
        let palette = Palette::default();
        assert_eq!(palette.wrap(0, -7), 5);
        assert_eq!(palette.wrap(5, 13), 0);
        assert!(palette.contains_index(5));
        assert!(!palette.contains_index(6));
    }
}
