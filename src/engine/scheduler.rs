/// Coalesces redraw requests: any number of `schedule` calls between frames
/// collapse into a single rebuild when the frame consumes the flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    pub fn schedule(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending flag. Returns true at most once per burst of
    /// schedule calls.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
