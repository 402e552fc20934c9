// This file is part of run_joint_controller.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::thread::sleep;
use std::time::{Duration, Instant};

/// Time source of the control loop. The loop only suspends through this
/// trait so that the simulation and the tests can replace the wall clock.
pub trait Clock {
    /// Get the elapsed time since the clock was created.
    ///
    /// # Returns
    /// Elapsed time.
    fn now(&self) -> Duration;

    /// Suspend the control loop.
    ///
    /// # Arguments
    /// * `duration` - Time to sleep.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by the monotonic system clock.
pub struct SystemClock {
    _start: Instant,
}

impl SystemClock {
    /// Create a new system clock.
    ///
    /// # Returns
    /// A new system clock.
    pub fn new() -> Self {
        Self {
            _start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self._start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let mut clock = SystemClock::new();

        let before = clock.now();
        clock.sleep(Duration::from_millis(10));

        assert!(clock.now() - before >= Duration::from_millis(10));
    }

    #[test]
    fn test_system_clock_default() {
        let clock = SystemClock::default();

        assert!(clock.now() < Duration::from_secs(60));
    }
}
