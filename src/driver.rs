use std::time::Instant;

/// Monotonic millisecond clock, one reading per display refresh.
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Permission for one frame, valid only for the driver generation that issued
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// Owns start/stop of the frame loop. Stopping bumps the generation, so a
/// frame requested before the stop is refused even if the driver has been
/// armed again by the time it arrives.
#[derive(Debug, Default)]
pub struct Driver {
    generation: u64,
    armed: bool,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn stop(&mut self) {
        if self.armed {
            self.generation += 1;
        }
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn request_frame(&self) -> Option<FrameTicket> {
        self.armed.then_some(FrameTicket {
            generation: self.generation,
        })
    }

    pub fn accepts(&self, ticket: FrameTicket) -> bool {
        self.armed && ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_driver_issues_no_tickets() {
        let driver = Driver::new();
        assert!(driver.request_frame().is_none());
    }

    #[test]
    fn ticket_from_before_stop_is_stale_after_rearm() {
        let mut driver = Driver::new();
        driver.arm();
        let stale = driver.request_frame().unwrap();
        assert!(driver.accepts(stale));

        driver.stop();
        assert!(!driver.accepts(stale));

        driver.arm();
        assert!(!driver.accepts(stale));
        let fresh = driver.request_frame().unwrap();
        assert!(driver.accepts(fresh));
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
