use alloc::vec::Vec;

use recycler::{ItemData, ItemHost, PassStats, Recycler};

use crate::{RowScroll, ScrollOptions, Tween};

/// A framework-neutral controller that wraps a [`Recycler`] and feeds it from a scroll offset.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `begin_drag` / `drag_by` / `end_drag` for gesture input
/// - `tick(now_ms)` once per frame, which runs one visibility pass
///
/// A drag starts settling. When the drag ends the offset eases onto the nearest row boundary,
/// and the list keeps settling until the snap has finished and a pass finds nothing left to do.
pub struct Controller<D: ItemData, H: ItemHost<D>> {
    list: Recycler<D, H>,
    scroll: RowScroll,
    options: ScrollOptions,
    tween: Option<Tween>,
    dragging: bool,
}

impl<D: ItemData, H: ItemHost<D>> Controller<D, H> {
    pub fn new(list: Recycler<D, H>, options: ScrollOptions) -> Self {
        Self {
            list,
            scroll: RowScroll::new(options.row_size, options.viewport),
            options,
            tween: None,
            dragging: false,
        }
    }

    pub fn recycler(&self) -> &Recycler<D, H> {
        &self.list
    }

    pub fn recycler_mut(&mut self) -> &mut Recycler<D, H> {
        &mut self.list
    }

    pub fn into_recycler(self) -> Recycler<D, H> {
        self.list
    }

    pub fn scroll(&self) -> &RowScroll {
        &self.scroll
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Replaces the dataset and scrolls back to the top.
    pub fn set_data(&mut self, data: Option<Vec<D>>) -> Option<Vec<D>> {
        self.cancel_animation();
        self.scroll.set_offset(0);
        self.list.set_data(data)
    }

    pub fn on_viewport_size(&mut self, viewport: u32) {
        self.options.viewport = viewport;
        self.scroll.set_viewport(viewport);
    }

    /// Call this when a drag gesture starts. Cancels any snap in progress.
    pub fn begin_drag(&mut self) {
        self.cancel_animation();
        self.dragging = true;
        atrace!(offset = self.scroll.offset(), "begin_drag");
        self.list.start_settling();
    }

    pub fn drag_by(&mut self, delta: i64) {
        self.scroll.scroll_by(delta);
    }

    /// Call this when the drag gesture ends. Starts easing onto the nearest row boundary.
    ///
    /// Returns the target offset.
    pub fn end_drag(&mut self, now_ms: u64) -> i64 {
        self.dragging = false;
        let to = self.scroll.snap_target(self.list.data_len());
        adebug!(from = self.scroll.offset(), to, "end_drag");
        self.start_tween(to, now_ms)
    }

    /// Eases `row` to the top of the viewport (clamped to the content).
    ///
    /// Returns the target offset.
    pub fn scroll_to_row(&mut self, row: usize, now_ms: u64) -> i64 {
        let to = self.scroll.row_offset(row, self.list.data_len());
        adebug!(row, to, "scroll_to_row");
        self.list.start_settling();
        self.start_tween(to, now_ms)
    }

    fn start_tween(&mut self, to: i64, now_ms: u64) -> i64 {
        let from = self.scroll.offset();
        self.tween = Some(Tween::new(
            from,
            to,
            now_ms,
            self.options.snap_duration_ms,
            self.options.easing,
        ));
        to
    }

    /// Advances the snap animation and runs one visibility pass.
    pub fn tick(&mut self, now_ms: u64) -> PassStats {
        if let Some(tween) = self.tween {
            self.scroll.set_offset(tween.sample(now_ms));
            if tween.is_done(now_ms) {
                self.tween = None;
            }
        }
        if self.dragging || self.tween.is_some() {
            self.list.signal_motion();
        }

        self.list
            .set_window(self.scroll.data_offset(), self.scroll.num_rows());
        let stats = self.list.update_items();
        atrace!(
            offset = self.scroll.offset(),
            dragging = self.dragging,
            animating = self.tween.is_some(),
            settled = stats.settled,
            "tick"
        );
        stats
    }
}
