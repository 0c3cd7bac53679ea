//! Inbound commands to the scan engine.
//!
//! Mode changes requested by the outside world (panel keys, a service
//! console).  They are applied synchronously between scan ticks by
//! [`ScanEngine::handle_command`](super::service::ScanEngine::handle_command).

use crate::sensors::SensorId;
use crate::zones::ZoneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Arm or disarm a single zone.
    Arm { zone: ZoneId, armed: bool },
    /// Arm or disarm every configured zone.
    ArmAll(bool),
    /// Clear one sensor's sticky trigger indication.
    ResetSensor(SensorId),
    /// Run the long lamp test, even if the boot test already finished.
    LampTest,
}
