//! The module facade: one method per supported command.
//!
//! Methods build the matching [`Command`], run it through the dispatcher
//! and unwrap the matching [`Response`] variant. No protocol logic lives
//! here beyond that mapping.

use std::thread;
use std::time::Duration;

use schunk_protocol::{
    Command, ConfigParam, ConfigValue, DetailedErrorInfo, FaultClass, ModuleInfo, ModuleState,
    MotionProfile, ProtocolError, Response, TimedMotionProfile,
};
use tracing::{debug, warn};

use crate::blocking::{ArrivalWatch, PollOutcome};
use crate::dispatcher::exchange;
use crate::error::ClientError;
use crate::transport::Transport;

/// Default pause between status polls during a blocking move.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A Schunk motion module on the bus.
///
/// Owns the module ID and a transport; every method performs one or more
/// complete request/response exchanges, each on a fresh transport session.
/// Calls block the calling thread until they finish; the facade adds no
/// internal concurrency or locking.
pub struct Module<T: Transport> {
    address: u8,
    transport: T,
    poll_interval: Duration,
}

impl<T: Transport> Module<T> {
    /// Create a facade for the module with the given ID.
    pub fn new(address: u8, transport: T) -> Self {
        Module {
            address,
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the pause between status polls during blocking moves.
    ///
    /// A shorter interval reacts faster at the price of more bus traffic.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The module ID this facade addresses.
    pub fn address(&self) -> u8 {
        self.address
    }

    fn exchange(&self, command: &Command) -> Result<Response, ClientError> {
        exchange(&self.transport, self.address, command)
    }

    fn expect_ok(&self, command: Command) -> Result<(), ClientError> {
        match self.exchange(&command)? {
            Response::Ok => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    fn expect_estimated_time(&self, command: Command) -> Result<f32, ClientError> {
        match self.exchange(&command)? {
            Response::EstimatedTime(time) => Ok(time),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.1.1 CMD REFERENCE: perform a reference movement.
    pub fn reference(&self) -> Result<(), ClientError> {
        self.expect_ok(Command::Reference)
    }

    /// 2.1.3 MOVE POS: move to an absolute position.
    ///
    /// Returns the estimated time to reach the target, 0.0 if the module
    /// cannot estimate it.
    pub fn move_pos(&self, position: f32, profile: MotionProfile) -> Result<f32, ClientError> {
        self.expect_estimated_time(Command::MovePos { position, profile })
    }

    /// 2.1.4 MOVE POS REL: move by a relative distance.
    pub fn move_pos_rel(&self, position: f32, profile: MotionProfile) -> Result<f32, ClientError> {
        self.expect_estimated_time(Command::MovePosRel { position, profile })
    }

    /// 2.1.5 MOVE POS TIME: absolute move within a given time.
    pub fn move_pos_time(
        &self,
        position: f32,
        profile: TimedMotionProfile,
    ) -> Result<f32, ClientError> {
        self.expect_estimated_time(Command::MovePosTime { position, profile })
    }

    /// 2.1.6 MOVE POS TIME REL: relative move within a given time.
    pub fn move_pos_time_rel(
        &self,
        position: f32,
        profile: TimedMotionProfile,
    ) -> Result<f32, ClientError> {
        self.expect_estimated_time(Command::MovePosTimeRel { position, profile })
    }

    /// Like [`Module::move_pos`], but do not return until the module
    /// reports the position reached or a fault.
    ///
    /// Returns the final position.
    pub fn move_pos_blocking(
        &self,
        position: f32,
        profile: MotionProfile,
    ) -> Result<f32, ClientError> {
        let estimated = self.move_pos(position, profile)?;
        debug!(estimated, "move accepted, waiting for arrival");
        self.wait_until_position_reached()
    }

    /// Like [`Module::move_pos_rel`], but wait for arrival.
    pub fn move_pos_rel_blocking(
        &self,
        position: f32,
        profile: MotionProfile,
    ) -> Result<f32, ClientError> {
        let estimated = self.move_pos_rel(position, profile)?;
        debug!(estimated, "relative move accepted, waiting for arrival");
        self.wait_until_position_reached()
    }

    /// Like [`Module::move_pos_time`], but wait for arrival.
    pub fn move_pos_time_blocking(
        &self,
        position: f32,
        profile: TimedMotionProfile,
    ) -> Result<f32, ClientError> {
        let estimated = self.move_pos_time(position, profile)?;
        debug!(estimated, "timed move accepted, waiting for arrival");
        self.wait_until_position_reached()
    }

    /// Like [`Module::move_pos_time_rel`], but wait for arrival.
    pub fn move_pos_time_rel_blocking(
        &self,
        position: f32,
        profile: TimedMotionProfile,
    ) -> Result<f32, ClientError> {
        let estimated = self.move_pos_time_rel(position, profile)?;
        debug!(estimated, "timed relative move accepted, waiting for arrival");
        self.wait_until_position_reached()
    }

    /// Poll the module state until the position-reached flag is set.
    ///
    /// Each poll is a full exchange on its own transport session. A fault
    /// reported in any snapshot ends the wait with the vendor error code; a
    /// dispatcher timeout propagates immediately. Returns the final
    /// position.
    pub fn wait_until_position_reached(&self) -> Result<f32, ClientError> {
        let mut watch = ArrivalWatch::new();
        loop {
            let state = self.get_state()?;
            match watch.observe(&state) {
                PollOutcome::Reached(position) => {
                    debug!(position, "position reached");
                    return Ok(position);
                }
                PollOutcome::Fault(code) => {
                    warn!(%code, "module fault while waiting for arrival");
                    return Err(ProtocolError::Fault {
                        class: FaultClass::Error,
                        code,
                    }
                    .into());
                }
                PollOutcome::InProgress => thread::sleep(self.poll_interval),
            }
        }
    }

    /// 2.1.14 SET TARGET VEL.
    ///
    /// Initially, the target velocity is set to 10% of the maximum.
    pub fn set_target_vel(&self, velocity: f32) -> Result<(), ClientError> {
        self.expect_ok(Command::SetTargetVel { velocity })
    }

    /// 2.1.15 SET TARGET ACC.
    ///
    /// Initially, the target acceleration is set to 10% of the maximum.
    pub fn set_target_acc(&self, acceleration: f32) -> Result<(), ClientError> {
        self.expect_ok(Command::SetTargetAcc { acceleration })
    }

    /// 2.1.16 SET TARGET JERK.
    ///
    /// Initially, the target jerk is set to 50% of the maximum.
    pub fn set_target_jerk(&self, jerk: f32) -> Result<(), ClientError> {
        self.expect_ok(Command::SetTargetJerk { jerk })
    }

    /// 2.1.17 SET TARGET CUR.
    ///
    /// Initially, the target current is set to the nominal current.
    pub fn set_target_cur(&self, current: f32) -> Result<(), ClientError> {
        self.expect_ok(Command::SetTargetCur { current })
    }

    /// 2.1.18 SET TARGET TIME.
    pub fn set_target_time(&self, time: f32) -> Result<(), ClientError> {
        self.expect_ok(Command::SetTargetTime { time })
    }

    /// 2.1.19 CMD STOP.
    pub fn stop(&self) -> Result<(), ClientError> {
        self.expect_ok(Command::Stop)
    }

    /// 2.2.6 CMD TOGGLE IMPULSE MESSAGE.
    ///
    /// Returns whether impulse messages are enabled afterwards.
    pub fn toggle_impulse_message(&self) -> Result<bool, ClientError> {
        match self.exchange(&Command::ToggleImpulseMessage)? {
            Response::ImpulseMessages(enabled) => Ok(enabled),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.3.2 GET CONFIG without a parameter: the identification block.
    pub fn get_module_info(&self) -> Result<ModuleInfo, ClientError> {
        match self.exchange(&Command::GetModuleInfo)? {
            Response::ModuleInfo(info) => Ok(info),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.3.2 GET CONFIG: read a scalar configuration parameter.
    pub fn get_config(&self, param: ConfigParam) -> Result<ConfigValue, ClientError> {
        match self.exchange(&Command::GetConfig(param))? {
            Response::Config(value) => Ok(value),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.3.1 SET CONFIG: write a scalar configuration parameter.
    ///
    /// The value width must match the parameter.
    pub fn set_config(&self, param: ConfigParam, value: ConfigValue) -> Result<(), ClientError> {
        self.expect_ok(Command::SetConfig { param, value })
    }

    /// 2.5.1 GET STATE: position, velocity, current, status and error code.
    pub fn get_state(&self) -> Result<ModuleState, ClientError> {
        match self.exchange(&Command::GetState)? {
            Response::State(state) => Ok(state),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.5.2 CMD REBOOT.
    pub fn reboot(&self) -> Result<(), ClientError> {
        self.expect_ok(Command::Reboot)
    }

    /// 2.8.1.4 CMD ACK: acknowledge a pending error.
    pub fn ack(&self) -> Result<(), ClientError> {
        self.expect_ok(Command::Ack)
    }

    /// 2.5.7 CHECK MC PC COMMUNICATION: the module sends the vendor test
    /// pattern and this client verifies it.
    pub fn check_mc_pc_communication(&self) -> Result<(), ClientError> {
        match self.exchange(&Command::CheckMcPcCommunication)? {
            Response::CommunicationOk => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.5.8 CHECK PC MC COMMUNICATION: this client sends the vendor test
    /// pattern and the module verifies it.
    pub fn check_pc_mc_communication(&self) -> Result<(), ClientError> {
        match self.exchange(&Command::CheckPcMcCommunication)? {
            Response::CommunicationOk => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// 2.8.1.5 GET DETAILED ERROR INFO.
    ///
    /// When no error is active or no details are available, the module
    /// answers with an INFO FAILED fault.
    pub fn get_detailed_error_info(&self) -> Result<DetailedErrorInfo, ClientError> {
        match self.exchange(&Command::GetDetailedErrorInfo)? {
            Response::DetailedError(info) => Ok(info),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &Response) -> ClientError {
    ProtocolError::UnexpectedPayload(format!("unexpected response variant: {response:?}")).into()
}
