//! Frame coalescing.

/// Dirty flag polled once per host tick.
///
/// Any number of `request` calls between two `take` calls yield a single redraw.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    dirty: bool,
    frames: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn take(&mut self) -> bool {
        let due = std::mem::take(&mut self.dirty);
        if due {
            self.frames += 1;
        }
        due
    }

    /// Number of redraws handed out so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesces_requests() {
        let mut scheduler = RedrawScheduler::new();
        assert!(!scheduler.take());
        scheduler.request();
        scheduler.request();
        scheduler.request();
        assert!(scheduler.take());
        assert!(!scheduler.take());
        assert_eq!(scheduler.frames(), 1);
    }
}
