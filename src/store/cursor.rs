//! Replay position within an engine's recorded history.
//!
//! The cursor advances one cycle per poll tick. Past the last recorded cycle
//! it rewinds a fixed distance instead of stopping, so the dataset keeps
//! replaying near its end.

/// Simulated cycle counter, always within `[0, max_cycle]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationCursor {
    current: u32,
    max_cycle: u32,
    rewind: u32,
}

impl SimulationCursor {
    /// Start `lead_in` cycles before `max_cycle` (floored at zero).
    pub fn new(max_cycle: u32, lead_in: u32, rewind: u32) -> Self {
        SimulationCursor {
            current: max_cycle.saturating_sub(lead_in),
            max_cycle,
            rewind,
        }
    }

    /// Step one cycle and return the new position.
    pub fn advance(&mut self) -> u32 {
        self.current = self.current.saturating_add(1);
        if self.current > self.max_cycle {
            self.current = self.max_cycle.saturating_sub(self.rewind);
        }
        self.current
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max_cycle(&self) -> u32 {
        self.max_cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_lead_in_before_end() {
        let cursor = SimulationCursor::new(192, 100, 50);
        assert_eq!(cursor.current(), 92);
    }

    #[test]
    fn test_short_history_starts_at_zero() {
        let cursor = SimulationCursor::new(40, 100, 50);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_wraps_back_past_max() {
        let mut cursor = SimulationCursor::new(200, 1, 50);
        assert_eq!(cursor.current(), 199);
        assert_eq!(cursor.advance(), 200);
        assert_eq!(cursor.advance(), 150);
        assert_eq!(cursor.advance(), 151);
    }

    #[test]
    fn test_wrap_on_tiny_history_floors_at_zero() {
        let mut cursor = SimulationCursor::new(3, 0, 50);
        assert_eq!(cursor.current(), 3);
        assert_eq!(cursor.advance(), 0);
    }

    #[test]
    fn test_zero_max_cycle_stays_at_zero() {
        let mut cursor = SimulationCursor::new(0, 100, 50);
        for _ in 0..5 {
            assert_eq!(cursor.advance(), 0);
        }
    }
}
