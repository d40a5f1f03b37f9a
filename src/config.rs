/// All extraction parameters in one struct.
///
/// The colour convention itself is fixed (black axes, red curve, blue
/// ticks and labels); these only tune how strictly it is matched and how
/// far the detectors look.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    // -- Classification --
    /// Per-channel tolerance when matching the reference colours.
    /// A channel that should be 0 may be up to this value, a channel that
    /// should be 255 may be down to `255 - color_tolerance`.
    pub color_tolerance: u8,

    // -- Axis detection --
    /// Minimum fraction of the image width (height) that a row (column)
    /// must cover with axis pixels to count as the horizontal (vertical) axis.
    pub min_axis_fraction: f64,

    // -- Tick detection --
    /// Half-width of the band around an axis line in which tick pixels
    /// are searched, in pixels.
    pub tick_band: u32,
    /// Largest gap along the axis between two tick pieces that still
    /// belong to the same tick mark, in pixels.
    pub tick_gap: u32,
    /// Maximum distance between a tick (or its label) and a label glyph.
    /// `None` derives it from the image size.
    pub label_search_radius: Option<f64>,

    // -- Label reading --
    /// Minimum fraction of matching template cells to accept a digit.
    pub min_digit_score: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            color_tolerance: 60,
            min_axis_fraction: 0.1,
            tick_band: 3,
            tick_gap: 1,
            label_search_radius: None,
            min_digit_score: 0.8,
        }
    }
}

impl ExtractConfig {
    /// Label search radius for an image of the given size.
    pub fn label_radius(&self, width: u32, height: u32) -> f64 {
        self.label_search_radius
            .unwrap_or_else(|| (0.15 * width.max(height) as f64).max(6.0))
    }
}

/// Parameters for the truncated Fourier reconstruction.
#[derive(Debug, Clone)]
pub struct FourierConfig {
    /// Number of harmonics kept (indices 0..harmonics).
    pub harmonics: usize,
    /// Pad both ends with linear ramps before transforming so that the
    /// periodic extension has no jump (suppresses Gibbs ringing at the edges).
    pub suppress_gibbs: bool,
}

impl Default for FourierConfig {
    fn default() -> Self {
        Self {
            harmonics: 10,
            suppress_gibbs: false,
        }
    }
}
