use crate::SettleState;

/// `Idle` → `Settling` → `Idle`, closed by the first pass that nothing touched.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SettleMachine {
    state: SettleState,
    in_pass: bool,
    // Cleared by any work that keeps the transition going.
    untouched: bool,
    motion_pending: bool,
}

impl SettleMachine {
    pub(crate) fn state(&self) -> SettleState {
        self.state
    }

    /// Returns `true` on an actual `Idle` → `Settling` transition.
    pub(crate) fn start(&mut self) -> bool {
        if self.state == SettleState::Settling {
            return false;
        }
        self.state = SettleState::Settling;
        true
    }

    /// Returns `true` on an actual `Settling` → `Idle` transition.
    pub(crate) fn end(&mut self) -> bool {
        if self.state == SettleState::Idle {
            return false;
        }
        self.state = SettleState::Idle;
        true
    }

    pub(crate) fn begin_pass(&mut self) {
        self.in_pass = true;
        self.untouched = !core::mem::take(&mut self.motion_pending);
    }

    pub(crate) fn touch(&mut self) {
        self.untouched = false;
    }

    /// Outside a pass, the signal carries over to the next one.
    pub(crate) fn signal_motion(&mut self) {
        if self.in_pass {
            self.untouched = false;
        } else {
            self.motion_pending = true;
        }
    }

    /// Closes the pass. Returns `true` when settling ended.
    pub(crate) fn finish_pass(&mut self) -> bool {
        self.in_pass = false;
        self.state == SettleState::Settling && self.untouched && self.end()
    }
}
