/// A pixel scroll offset over rows of a fixed size.
///
/// This is the offset provider a [`recycler::Recycler`] expects: it turns the scroll position
/// into a data offset and a row budget. Between row boundaries the partly hidden leading row
/// lands at position `-1` and the partly visible trailing row inside the budget. The offset is
/// not clamped, so a drag may overscroll in either direction; [`RowScroll::snap_target`] brings
/// it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowScroll {
    offset: i64,
    row_size: u32,
    viewport: u32,
}

impl RowScroll {
    pub fn new(row_size: u32, viewport: u32) -> Self {
        Self {
            offset: 0,
            row_size: row_size.max(1),
            viewport,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    pub fn scroll_by(&mut self, delta: i64) {
        self.offset = self.offset.saturating_add(delta);
    }

    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    pub fn set_row_size(&mut self, row_size: u32) {
        self.row_size = row_size.max(1);
    }

    pub fn viewport(&self) -> u32 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: u32) {
        self.viewport = viewport;
    }

    /// Offset to add to a row's dataset position to get its position in the viewport.
    ///
    /// This is `-ceil(offset / row_size)`: the first row whose top edge is at or below the top
    /// of the viewport sits at position `0`.
    pub fn data_offset(&self) -> i64 {
        let size = self.row_size as i64;
        let floor = self.offset.div_euclid(size);
        let ceil = if self.offset.rem_euclid(size) == 0 {
            floor
        } else {
            floor + 1
        };
        ceil.saturating_neg()
    }

    /// Rows the viewport touches when it starts on a row boundary, counting a partial last row.
    pub fn num_rows(&self) -> usize {
        self.viewport.div_ceil(self.row_size) as usize
    }

    /// The largest resting offset for a dataset of `len` rows.
    ///
    /// At rest the last row is fully visible, so only whole rows count here.
    pub fn max_offset(&self, len: usize) -> i64 {
        let whole = (self.viewport / self.row_size) as i64;
        let hidden = (len as i64).saturating_sub(whole).max(0);
        hidden.saturating_mul(self.row_size as i64)
    }

    /// The resting offset that puts `row` at the top of the viewport, clamped to the content.
    pub fn row_offset(&self, row: usize, len: usize) -> i64 {
        (row as i64)
            .saturating_mul(self.row_size as i64)
            .clamp(0, self.max_offset(len))
    }

    /// The nearest row boundary to the current offset, clamped to the content.
    pub fn snap_target(&self, len: usize) -> i64 {
        let size = self.row_size as i64;
        let nearest = self
            .offset
            .saturating_add(size / 2)
            .div_euclid(size)
            .saturating_mul(size);
        nearest.clamp(0, self.max_offset(len))
    }
}
