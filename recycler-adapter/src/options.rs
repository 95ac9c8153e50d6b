use crate::Easing;

/// Geometry and snapping configuration for [`crate::Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollOptions {
    /// Row size in the scroll axis. Values below `1` are treated as `1`.
    pub row_size: u32,
    /// Viewport size in the scroll axis.
    pub viewport: u32,
    /// How long the list takes to ease onto a row boundary after a drag.
    pub snap_duration_ms: u64,
    pub easing: Easing,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            row_size: 1,
            viewport: 0,
            snap_duration_ms: 150,
            easing: Easing::SmoothStep,
        }
    }
}

impl ScrollOptions {
    pub fn new(row_size: u32, viewport: u32) -> Self {
        Self {
            row_size,
            viewport,
            ..Self::default()
        }
    }

    pub fn with_snap_duration_ms(mut self, snap_duration_ms: u64) -> Self {
        self.snap_duration_ms = snap_duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}
