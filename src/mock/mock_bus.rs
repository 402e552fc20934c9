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

use std::collections::{BTreeMap, HashSet};

use crate::enums::ParameterName;
use crate::interface::actuator_port::{ActuatorPort, AxisId, BusError};
use crate::mock::mock_actuator::MockActuator;
use crate::mock::mock_constants::MOCK_TIME_STEP;

/// Transaction that went through the bus.
#[derive(Debug, PartialEq, Clone)]
pub enum BusTransaction {
    Read(AxisId, ParameterName),
    Write(AxisId, ParameterName, f64),
    Enable(AxisId),
    Disable(AxisId),
}

/// Simulated field bus shared by the mock actuators.
pub struct MockBus {
    _actuators: BTreeMap<AxisId, MockActuator>,
    // Actuators that do not respond.
    _offline: HashSet<AxisId>,
    _is_reachable: bool,
    // Successful transactions in order. Only kept when recording.
    _transactions: Vec<BusTransaction>,
    _is_recording: bool,
}

impl MockBus {
    /// Create the bus with the actuators at the zero position.
    ///
    /// # Arguments
    /// * `axis_ids` - Actuator identifiers.
    ///
    /// # Returns
    /// A new mock bus.
    pub fn new(axis_ids: &[AxisId]) -> Self {
        let positions: Vec<(AxisId, f64)> = axis_ids.iter().map(|id| (*id, 0.0)).collect();
        Self::with_positions(&positions, MOCK_TIME_STEP)
    }

    /// Create the bus with the actuators at the initial positions.
    ///
    /// # Arguments
    /// * `positions` - Pairs of the actuator identifier and the initial
    /// mechanical position in radian.
    /// * `time_step` - Simulated time in second that passes on an actuator
    /// every time its position is read.
    ///
    /// # Returns
    /// A new mock bus.
    pub fn with_positions(positions: &[(AxisId, f64)], time_step: f64) -> Self {
        Self {
            _actuators: positions
                .iter()
                .map(|(id, position)| (*id, MockActuator::new(*position, time_step)))
                .collect(),
            _offline: HashSet::new(),
            _is_reachable: true,
            _transactions: Vec::new(),
            _is_recording: false,
        }
    }

    /// Record the successful transactions. The record is unbounded, so only
    /// use it in the short runs.
    ///
    /// # Returns
    /// The mock bus that records the transactions.
    pub fn with_recording(mut self) -> Self {
        self._is_recording = true;
        self
    }

    /// Get the actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    ///
    /// # Returns
    /// Actuator if it is on the bus.
    pub fn actuator(&self, axis_id: AxisId) -> Option<&MockActuator> {
        self._actuators.get(&axis_id)
    }

    /// Get the mutable actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    ///
    /// # Returns
    /// Actuator if it is on the bus.
    pub fn actuator_mut(&mut self, axis_id: AxisId) -> Option<&mut MockActuator> {
        self._actuators.get_mut(&axis_id)
    }

    /// Set the actuator to be offline or not.
    pub fn set_offline(&mut self, axis_id: AxisId, is_offline: bool) {
        if is_offline {
            self._offline.insert(axis_id);
        } else {
            self._offline.remove(&axis_id);
        }
    }

    /// Set the actuator to be stalled or not.
    pub fn set_stalled(&mut self, axis_id: AxisId, is_stalled: bool) {
        if let Some(actuator) = self._actuators.get_mut(&axis_id) {
            actuator.is_stalled = is_stalled;
        }
    }

    /// Set the bus to be reachable or not.
    pub fn set_reachable(&mut self, is_reachable: bool) {
        self._is_reachable = is_reachable;
    }

    /// Get the transactions.
    pub fn transactions(&self) -> &[BusTransaction] {
        &self._transactions
    }

    /// Get the transactions and clear the internal record.
    ///
    /// # Returns
    /// Transactions.
    pub fn get_transactions_and_clear(&mut self) -> Vec<BusTransaction> {
        std::mem::take(&mut self._transactions)
    }

    /// Record the transaction if the recording is on.
    fn record(&mut self, transaction: BusTransaction) {
        if self._is_recording {
            self._transactions.push(transaction);
        }
    }

    /// Get the responding actuator.
    ///
    /// # Arguments
    /// * `axis_id` - Actuator identifier.
    ///
    /// # Returns
    /// Actuator.
    ///
    /// # Errors
    /// If the bus is unreachable or the actuator does not respond.
    fn get_responding_actuator(&mut self, axis_id: AxisId) -> Result<&mut MockActuator, BusError> {
        if !self._is_reachable {
            return Err(BusError::Unreachable);
        }

        if self._offline.contains(&axis_id) {
            return Err(BusError::NoResponse { axis_id });
        }

        self._actuators
            .get_mut(&axis_id)
            .ok_or(BusError::NoResponse { axis_id })
    }
}

impl ActuatorPort for MockBus {
    fn read_param(&mut self, axis_id: AxisId, name: ParameterName) -> Result<f64, BusError> {
        let value = self.get_responding_actuator(axis_id)?.read_param(name);
        self.record(BusTransaction::Read(axis_id, name));

        Ok(value)
    }

    fn write_param(
        &mut self,
        axis_id: AxisId,
        name: ParameterName,
        value: f64,
    ) -> Result<(), BusError> {
        if !self.get_responding_actuator(axis_id)?.write_param(name, value) {
            return Err(BusError::MalformedReply {
                axis_id,
                name: String::from(name.as_ref()),
            });
        }
        self.record(BusTransaction::Write(axis_id, name, value));

        Ok(())
    }

    fn enable(&mut self, axis_id: AxisId) -> Result<(), BusError> {
        self.get_responding_actuator(axis_id)?.is_enabled = true;
        self.record(BusTransaction::Enable(axis_id));

        Ok(())
    }

    fn disable(&mut self, axis_id: AxisId) -> Result<(), BusError> {
        self.get_responding_actuator(axis_id)?.is_enabled = false;
        self.record(BusTransaction::Disable(axis_id));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_param() {
        let mut bus = MockBus::with_positions(&[(127, 0.5), (17, -0.5)], 0.1).with_recording();

        assert_eq!(
            bus.read_param(17, ParameterName::MechanicalPosition),
            Ok(-0.5)
        );
        assert!(bus
            .write_param(127, ParameterName::ReferencePosition, 1.0)
            .is_ok());
        assert_eq!(bus.actuator(127).unwrap().reference_position, 1.0);

        assert_eq!(
            bus.get_transactions_and_clear(),
            vec![
                BusTransaction::Read(17, ParameterName::MechanicalPosition),
                BusTransaction::Write(127, ParameterName::ReferencePosition, 1.0),
            ]
        );
        assert!(bus.transactions().is_empty());
    }

    #[test]
    fn test_no_recording() {
        let mut bus = MockBus::new(&[127]);

        for _ in 0..100 {
            assert!(bus.enable(127).is_ok());
            assert!(bus
                .write_param(127, ParameterName::ReferencePosition, 1.0)
                .is_ok());
            assert!(bus.read_param(127, ParameterName::MechanicalPosition).is_ok());
            assert!(bus.disable(127).is_ok());
        }

        assert!(bus.transactions().is_empty());
        assert_eq!(bus.actuator(127).unwrap().reference_position, 1.0);
    }

    #[test]
    fn test_malformed_reply() {
        let mut bus = MockBus::new(&[16]).with_recording();

        assert_eq!(
            bus.write_param(16, ParameterName::MechanicalPosition, 1.0),
            Err(BusError::MalformedReply {
                axis_id: 16,
                name: String::from("mechpos")
            })
        );
        assert!(bus.transactions().is_empty());
    }

    #[test]
    fn test_no_response() {
        let mut bus = MockBus::new(&[16]).with_recording();

        assert_eq!(
            bus.read_param(99, ParameterName::MechanicalPosition),
            Err(BusError::NoResponse { axis_id: 99 })
        );

        bus.set_offline(16, true);
        assert_eq!(bus.enable(16), Err(BusError::NoResponse { axis_id: 16 }));

        bus.set_offline(16, false);
        assert!(bus.enable(16).is_ok());
    }

    #[test]
    fn test_unreachable() {
        let mut bus = MockBus::new(&[16]).with_recording();
        bus.set_reachable(false);

        assert_eq!(bus.disable(16), Err(BusError::Unreachable));
        assert_eq!(
            bus.read_param(16, ParameterName::ReferencePosition),
            Err(BusError::Unreachable)
        );
    }

    #[test]
    fn test_enable_disable() {
        let mut bus = MockBus::new(&[16]).with_recording();

        // Disable is idempotent
        assert!(bus.disable(16).is_ok());
        assert!(bus.disable(16).is_ok());

        assert!(bus.enable(16).is_ok());
        assert!(bus.actuator(16).unwrap().is_enabled);

        assert!(bus.disable(16).is_ok());
        assert!(!bus.actuator(16).unwrap().is_enabled);
    }

    #[test]
    fn test_set_stalled() {
        let mut bus = MockBus::new(&[16]).with_recording();
        bus.set_stalled(16, true);

        assert!(bus.actuator(16).unwrap().is_stalled);

        bus.actuator_mut(16).unwrap().is_stalled = false;
        assert!(!bus.actuator(16).unwrap().is_stalled);
    }
}
