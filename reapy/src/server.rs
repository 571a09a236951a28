//! Host side of the distant transport.
//!
//! Sockets live on their own thread, but REAPER API may only be touched
//! from the main thread. So incoming requests are queued, and the
//! [Dispatcher] answers them from a timer.
use crate::{
    config::ServerConfig,
    errors::{ReapyError, ReapyResult},
    socket::{spawn_server, Clients},
    Host, Program, Value,
};
use log::{debug, info, warn};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub program: Program,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    /// Step results, or the message of the error that aborted the program.
    pub result: Result<Vec<Value>, String>,
}

/// Run the requested program and wrap its outcome.
pub fn handle_request(host: &dyn Host, request: Request) -> Response {
    debug!(
        "request {}: {} steps",
        request.id,
        request.program.steps().len()
    );
    let result = host
        .run(&request.program)
        .map(|output| output.into_values())
        .map_err(|e| e.to_string());
    if let Err(e) = &result {
        warn!("request {} failed: {}", request.id, e);
    }
    Response {
        id: request.id,
        result,
    }
}

/// Answers queued requests of all connected clients.
#[derive(Debug)]
pub struct Dispatcher {
    clients: Clients<Request, Response>,
}
impl Dispatcher {
    /// Start listening on the configured address.
    pub fn spawn(config: &ServerConfig) -> ReapyResult<Self> {
        let clients = spawn_server(config.address())?;
        info!("reapy server listening on {}", config.address());
        Ok(Self { clients })
    }

    /// Handle everything queued so far and return the number of answered
    /// requests. Closed connections are dropped.
    pub fn tick(&self, host: &dyn Host) -> ReapyResult<usize> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|e| ReapyError::Socket(e.to_string()))?;
        let mut answered = 0;
        clients.retain(|client| loop {
            match client.try_recv() {
                Ok(Some(request)) => {
                    let response = handle_request(host, request);
                    if let Err(e) = client.send(response) {
                        warn!("can not answer: {}", e);
                    }
                    answered += 1;
                }
                Ok(None) => break true,
                Err(_) => {
                    debug!("client disconnected");
                    break false;
                }
            }
        });
        Ok(answered)
    }

    pub fn clients_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }
}
