//! 执行器线程与有界确认等待
//!
//! 执行器写入在独立线程中完成，控制器通过通道下发命令并等待确认。
//! 执行器卡住时，控制器在 `ack_timeout` 后得到 `ArmError::Timeout`，
//! 而不是永久阻塞。
//!
//! 每条命令带序号和截止时间：超时后迟到的确认会在下一次等待时被丢弃，
//! 执行器线程取出已过截止时间的命令时直接丢弃，不写入硬件。
//! 超时那一刻已经在写入中的命令无法撤回。

use crate::actuator::ServoActuator;
use crate::error::{ActuatorError, ArmError};
use crossbeam_channel::{
    Receiver, RecvTimeoutError, SendTimeoutError, Sender, bounded, unbounded,
};
use dofbot_protocol::ServoCommand;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

/// Drop 时等待执行器线程退出的时长
const WORKER_JOIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Extension trait for timeout-capable thread joins
trait JoinTimeout {
    fn join_timeout(self, timeout: Duration) -> thread::Result<()>;
}

impl<T: Send + 'static> JoinTimeout for JoinHandle<T> {
    fn join_timeout(self, timeout: Duration) -> thread::Result<()> {
        let (tx, rx) = bounded(1);

        // 看门狗线程负责 join，主线程只等待有限时间
        thread::spawn(move || {
            let result = self.join().map(|_| ());
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(join_result) => join_result,
            Err(RecvTimeoutError::Timeout) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Thread join timeout",
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "Thread panicked during join",
            ))),
        }
    }
}

struct Request {
    seq: u64,
    command: ServoCommand,
    /// 控制器放弃等待的时刻，之后取出的命令不再执行
    deadline: Instant,
}

struct Ack {
    seq: u64,
    result: Result<(), ActuatorError>,
}

/// 控制器与执行器线程之间的链路
pub(crate) struct ActuatorLink {
    /// 命令通道（容量 1），Drop 时先关闭，执行器线程随之退出
    cmd_tx: Option<Sender<Request>>,
    ack_rx: Receiver<Ack>,
    worker: Option<JoinHandle<()>>,
    next_seq: u64,
    ack_timeout: Duration,
}

impl ActuatorLink {
    /// 启动执行器线程
    pub(crate) fn spawn<A>(actuator: A, ack_timeout: Duration) -> Result<Self, ArmError>
    where
        A: ServoActuator + 'static,
    {
        let (cmd_tx, cmd_rx) = bounded::<Request>(1);
        let (ack_tx, ack_rx) = unbounded::<Ack>();

        let worker = thread::Builder::new()
            .name("dofbot-actuator".to_string())
            .spawn(move || actuator_loop(actuator, cmd_rx, ack_tx))
            .map_err(ArmError::WorkerSpawn)?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            ack_rx,
            worker: Some(worker),
            next_seq: 0,
            ack_timeout,
        })
    }

    /// 下发命令并等待执行器确认（入队加确认共最多 `ack_timeout`）
    pub(crate) fn dispatch(&mut self, command: ServoCommand) -> Result<(), ArmError> {
        let cmd_tx = self.cmd_tx.as_ref().ok_or(ArmError::LinkClosed)?;

        let seq = self.next_seq;
        self.next_seq += 1;

        let deadline = Instant::now() + self.ack_timeout;
        let request = Request {
            seq,
            command,
            deadline,
        };
        match cmd_tx.send_deadline(request, deadline) {
            Ok(()) => {},
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(seq, "Actuator busy, command not accepted in time");
                return Err(ArmError::Timeout(self.ack_timeout));
            },
            Err(SendTimeoutError::Disconnected(_)) => return Err(ArmError::LinkClosed),
        }

        loop {
            match self.ack_rx.recv_deadline(deadline) {
                Ok(ack) if ack.seq == seq => return ack.result.map_err(ArmError::from),
                Ok(stale) => {
                    debug!(seq = stale.seq, "Discarding stale actuator acknowledgment");
                },
                Err(RecvTimeoutError::Timeout) => {
                    warn!(seq, "Actuator did not acknowledge in time");
                    return Err(ArmError::Timeout(self.ack_timeout));
                },
                Err(RecvTimeoutError::Disconnected) => return Err(ArmError::LinkClosed),
            }
        }
    }
}

impl Drop for ActuatorLink {
    fn drop(&mut self) {
        // 先关闭命令通道，否则执行器线程收不到 Disconnected
        drop(self.cmd_tx.take());

        if let Some(worker) = self.worker.take()
            && worker.join_timeout(WORKER_JOIN_TIMEOUT).is_err()
        {
            warn!(
                "Actuator worker did not exit within {:?}, detaching",
                WORKER_JOIN_TIMEOUT
            );
        }
    }
}

fn actuator_loop<A: ServoActuator>(mut actuator: A, cmd_rx: Receiver<Request>, ack_tx: Sender<Ack>) {
    while let Ok(Request {
        seq,
        command,
        deadline,
    }) = cmd_rx.recv()
    {
        if Instant::now() >= deadline {
            warn!(seq, ?command, "Dropping expired actuator command");
            continue;
        }

        trace!(seq, ?command, "Actuator write");
        let result = actuator.execute(&command);
        if let Err(e) = &result {
            error!(seq, "Actuator write failed: {}", e);
        }
        if ack_tx.send(Ack { seq, result }).is_err() {
            break;
        }
    }
    debug!("Actuator worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockActuator;
    use dofbot_protocol::ServoChannel;

    fn gripper_command() -> ServoCommand {
        ServoCommand::Single {
            channel: ServoChannel::Gripper,
            angle: 170.0,
            duration: Duration::from_millis(2000),
        }
    }

    #[test]
    fn test_dispatch_reaches_actuator() {
        let mock = MockActuator::new();
        let mut link = ActuatorLink::spawn(mock.clone(), Duration::from_millis(500)).unwrap();

        link.dispatch(gripper_command()).unwrap();
        link.dispatch(gripper_command()).unwrap();

        assert_eq!(mock.command_count(), 2);
    }

    #[test]
    fn test_dispatch_reports_actuator_error() {
        let mock = MockActuator::new();
        mock.set_failure(Some(ActuatorError::Bus("nack".to_string())));
        let mut link = ActuatorLink::spawn(mock, Duration::from_millis(500)).unwrap();

        let result = link.dispatch(gripper_command());
        assert!(matches!(result, Err(ArmError::Actuator(ActuatorError::Bus(_)))));
    }

    #[test]
    fn test_dispatch_times_out_and_recovers() {
        let mock = MockActuator::new();
        mock.set_latency(Duration::from_millis(200));
        let mut link = ActuatorLink::spawn(mock.clone(), Duration::from_millis(50)).unwrap();

        let result = link.dispatch(gripper_command());
        assert!(matches!(result, Err(ArmError::Timeout(_))));

        // 执行器恢复后，迟到的确认被丢弃，新命令正常确认
        mock.set_latency(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(250));
        link.dispatch(gripper_command()).unwrap();
        assert_eq!(mock.command_count(), 2);
    }

    #[test]
    fn test_expired_command_never_reaches_actuator() {
        let mock = MockActuator::new();
        mock.set_latency(Duration::from_millis(300));
        let mut link = ActuatorLink::spawn(mock.clone(), Duration::from_millis(50)).unwrap();

        let first = ServoCommand::Single {
            channel: ServoChannel::Base,
            angle: 10.0,
            duration: Duration::from_millis(2000),
        };
        let second = ServoCommand::Single {
            channel: ServoChannel::Base,
            angle: 170.0,
            duration: Duration::from_millis(2000),
        };
        assert!(matches!(link.dispatch(first), Err(ArmError::Timeout(_))));
        assert!(matches!(link.dispatch(second), Err(ArmError::Timeout(_))));

        // 第一条在超时前已开始写入；第二条排队期间过了截止时间，被丢弃
        mock.set_latency(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(500));
        assert_eq!(mock.commands(), vec![first]);

        link.dispatch(gripper_command()).unwrap();
        assert_eq!(mock.command_count(), 2);
    }
}
