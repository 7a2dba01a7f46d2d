/// Commands the host UI sends to a mechanism view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// Jump to a step. Out-of-range indices clamp to the last step.
    SetStep(usize),
    NextStep,
    PrevStep,
    SetAutoRotate(bool),
    ToggleAutoRotate,
    /// Manual rotation (e.g. a drag), in radians. Applies even when paused.
    Rotate(f32),
    ResetRotation,
}

/// A queue of view events.
/// The host pushes events; the view drains them at the start of each frame.
pub struct InputQueue {
    events: Vec<ViewEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: ViewEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(ViewEvent::NextStep);
        q.push(ViewEvent::SetAutoRotate(false));
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events, vec![ViewEvent::NextStep, ViewEvent::SetAutoRotate(false)]);
        assert!(q.is_empty());
    }
}
