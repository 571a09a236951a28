//! Client side of the distant transport.
use crate::{
    config::Config,
    errors::{ReapyError, ReapyResult},
    server::{Request, Response},
    socket::{spawn_client, SocketHandle},
    Call, Host, Program, ProgramOutput, Value,
};
use log::{debug, info, warn};
use std::{
    fmt::{Debug, Formatter},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

/// Host living in another process, reached through the reapy server
/// extension.
///
/// Every [Host::run] is one round trip, whatever the program size.
pub struct DistantHost {
    socket: Mutex<SocketHandle<Response, Request>>,
    next_id: AtomicU64,
    request_timeout: Duration,
    url: String,
}
impl Debug for DistantHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistantHost")
            .field("url", &self.url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
impl DistantHost {
    pub fn connect(config: &Config) -> ReapyResult<Self> {
        let url = config.server.url();
        info!("connecting to {}", url);
        let socket = spawn_client(url.as_str(), config.connect_timeout())?;
        Ok(Self {
            socket: Mutex::new(socket),
            next_id: AtomicU64::new(0),
            request_timeout: config.request_timeout(),
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
impl Host for DistantHost {
    fn call(&self, call: Call) -> ReapyResult<Value> {
        let mut program = Program::new();
        let output = program.call(call);
        self.run(&program)?.take(output)
    }

    fn run(&self, program: &Program) -> ReapyResult<ProgramOutput> {
        let socket = self
            .socket
            .lock()
            .map_err(|e| ReapyError::Socket(e.to_string()))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("send request {} ({} steps)", id, program.steps().len());
        socket.send(Request {
            id,
            program: program.clone(),
        })?;
        let deadline = Instant::now() + self.request_timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Err(ReapyError::Timeout);
            }
            let response = socket.recv_timeout(left)?;
            if response.id != id {
                warn!("skip response {}, waiting for {}", response.id, id);
                continue;
            }
            return response
                .result
                .map(ProgramOutput::new)
                .map_err(ReapyError::Host);
        }
    }
}
impl Drop for DistantHost {
    fn drop(&mut self) {
        if let Ok(socket) = self.socket.get_mut() {
            if let Err(e) = socket.shutdown() {
                debug!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock::MockHost, server::Dispatcher, ProjectId};
    use std::{
        sync::{atomic::AtomicBool, Arc},
        thread::{sleep, spawn},
    };

    fn connect_with_retries(config: &Config) -> DistantHost {
        for _ in 0..50 {
            if let Ok(host) = DistantHost::connect(config) {
                return host;
            }
            sleep(Duration::from_millis(50));
        }
        panic!("can not connect to {}", config.server.url());
    }

    #[test]
    fn program_round_trip_through_dispatcher() {
        let mut config = Config::default();
        config.server.port = 23961;
        config.connect_timeout_ms = 300;
        let dispatcher = Dispatcher::spawn(&config.server).unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_cl = stop.clone();
        let mock = MockHost::new();
        mock.push_value(Value::Str("remote song".to_string()));
        mock.push_error("boom");
        let worker = spawn(move || {
            while !stop_cl.load(Ordering::Relaxed) {
                dispatcher.tick(&mock).unwrap();
                sleep(Duration::from_millis(2));
            }
        });

        let host = connect_with_retries(&config);
        let project = ProjectId::new(1).unwrap();
        let name = host.call(Call::GetProjectName { project }).unwrap();
        assert_eq!(name, Value::Str("remote song".to_string()));
        let err = host.call(Call::GetProjectName { project }).unwrap_err();
        assert!(matches!(err, ReapyError::Host(msg) if msg.contains("boom")));

        stop.store(true, Ordering::Relaxed);
        worker.join().unwrap();
    }
}
