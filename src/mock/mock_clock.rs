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

use std::time::Duration;

use crate::clock::Clock;

/// Simulated clock. Time only passes when the control loop sleeps.
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    _now: Duration,
    // Sleeps requested by the control loop in order.
    pub sleeps: Vec<Duration>,
}

impl MockClock {
    /// Create a new mock clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the time without sleeping.
    ///
    /// # Arguments
    /// * `duration` - Time to advance.
    pub fn advance(&mut self, duration: Duration) {
        self._now += duration;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self._now
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self._now += duration;
    }
}
