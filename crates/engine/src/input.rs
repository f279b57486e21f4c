//! Input module - decoded host input and the per-step queue

use serde::{Deserialize, Serialize};

use blockfall_types::{InputAction, InputPhase};

/// One decoded input entry from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEvent {
    pub action: InputAction,
    pub phase: InputPhase,
    /// Host clock in milliseconds. Informational only; ordering is queue order.
    #[serde(default)]
    pub timestamp: f64,
}

impl InputEvent {
    pub fn new(action: InputAction, phase: InputPhase, timestamp: f64) -> Self {
        Self {
            action,
            phase,
            timestamp,
        }
    }

    pub fn press(action: InputAction) -> Self {
        Self::new(action, InputPhase::Press, 0.0)
    }
}

/// A queue of input events.
/// The host pushes entries as they arrive; the engine drains them once per
/// logic step.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Discard pending events without handling them.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
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
    fn test_push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::press(InputAction::Left));
        q.push(InputEvent::new(InputAction::Drop, InputPhase::Release, 12.5));
        assert_eq!(q.len(), 2);

        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, InputAction::Left);
        assert!(q.is_empty());
    }

    #[test]
    fn test_decodes_host_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"action":"rotateCcw","phase":"repeat","timestamp":1520.25}"#)
                .unwrap();
        assert_eq!(event.action, InputAction::RotateCcw);
        assert_eq!(event.phase, InputPhase::Repeat);
        assert_eq!(event.timestamp, 1520.25);

        // Touch hosts report start/end instead of press/release.
        let start: InputEvent =
            serde_json::from_str(r#"{"action":"left","phase":"start","timestamp":3.0}"#).unwrap();
        assert_eq!(start.phase, InputPhase::Press);
        let end: InputEvent =
            serde_json::from_str(r#"{"action":"left","phase":"end","timestamp":4.0}"#).unwrap();
        assert_eq!(end.phase, InputPhase::Release);

        // Aliases only apply on input; output keeps the canonical names.
        let json = serde_json::to_string(&start).unwrap();
        assert!(json.contains(r#""phase":"press""#));
    }

    #[test]
    fn test_timestamp_is_optional() {
        let event: InputEvent = serde_json::from_str(r#"{"action":"hold","phase":"press"}"#).unwrap();
        assert_eq!(event, InputEvent::press(InputAction::Hold));
    }
}
