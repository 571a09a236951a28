//! JSON messages over websocket.
//!
//! Each connection gets a [SocketHandle]: outgoing messages are written to
//! the socket directly, incoming ones are parsed on the socket thread and
//! queued into a channel.
use crate::errors::{ReapyError, ReapyResult};
use log::{debug, error, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_derive::{
    Deserialize as DeriveDeserialize, Serialize as DeriveSerialize,
};
use std::{
    marker::PhantomData,
    sync::{
        mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError},
        Arc, Mutex,
    },
    thread::{sleep, spawn},
    time::{Duration, Instant},
};
use ws::connect;

/// Envelope of every frame.
#[derive(Debug, DeriveSerialize, DeriveDeserialize)]
pub enum Message<T> {
    Shutdown,
    Message(T),
}

pub type Clients<In, Out> = Arc<Mutex<Vec<SocketHandle<In, Out>>>>;

/// Bind the socket server and spawn its event loop thread.
///
/// New connections are appended to the returned vector. Fails if the
/// address can not be bound.
pub fn spawn_server<In, Out>(
    address: impl Into<String>,
) -> ReapyResult<Clients<In, Out>>
where
    In: DeserializeOwned + Send + 'static,
    Out: Serialize + Send + 'static,
{
    let address = address.into();
    let clients: Clients<In, Out> = Arc::new(Mutex::new(Vec::new()));
    let clients_cl = clients.clone();
    let (bound_send, bound_recv) = channel::<Result<(), String>>();
    spawn(move || {
        let factory = move |socket: ws::Sender| {
            let (send, recv) = channel::<In>();
            debug!("client connected: {}", socket.connection_id());
            match clients_cl.lock() {
                Ok(mut clients) => {
                    clients.push(SocketHandle::new(socket.clone(), recv))
                }
                Err(e) => error!("can not register client: {}", e),
            }
            move |msg| message_handler(msg, &socket, &send)
        };
        let server = match ws::Builder::new()
            .build(factory)
            .and_then(|server| server.bind(address.as_str()))
        {
            Ok(server) => server,
            Err(e) => {
                let _ = bound_send.send(Err(e.to_string()));
                return;
            }
        };
        let _ = bound_send.send(Ok(()));
        if let Err(e) = server.run() {
            error!("server on {} stopped: {}", address, e);
        }
    });
    match bound_recv.recv() {
        Ok(Ok(())) => Ok(clients),
        Ok(Err(e)) => Err(ReapyError::Socket(format!("can not bind: {}", e))),
        Err(_) => Err(ReapyError::Socket("server thread died".to_string())),
    }
}

/// Spawn the thread with the client socket and get its handle.
///
/// Waits for the connection at most `timeout`.
pub fn spawn_client<In, Out>(
    url: impl Into<String>,
    timeout: Duration,
) -> ReapyResult<SocketHandle<In, Out>>
where
    In: DeserializeOwned + Send + 'static,
    Out: Serialize,
{
    let (send, recv) = channel::<In>();
    let url = url.into();
    let connection: Connection = Arc::new(Mutex::new(None));
    let connection_cl = connection.clone();
    spawn(move || {
        let result = connect(url, |socket| ClientHandler {
            socket,
            send: send.clone(),
            connection: connection_cl.clone(),
        });
        if let Err(e) = result {
            set_connection(&connection_cl, Err(e.to_string()));
        }
    });
    let start = Instant::now();
    loop {
        {
            let guard = connection
                .lock()
                .map_err(|e| ReapyError::Socket(e.to_string()))?;
            match guard.as_ref() {
                Some(Ok(socket)) => {
                    return Ok(SocketHandle::new(socket.clone(), recv))
                }
                Some(Err(e)) => return Err(ReapyError::Socket(e.clone())),
                None => (),
            }
        }
        if start.elapsed() > timeout {
            return Err(ReapyError::Socket("connection timeout".to_string()));
        }
        sleep(Duration::from_millis(5));
    }
}

type Connection = Arc<Mutex<Option<Result<ws::Sender, String>>>>;

fn set_connection(
    connection: &Connection,
    state: Result<ws::Sender, String>,
) {
    if let Ok(mut c) = connection.lock() {
        if c.is_none() {
            *c = Some(state);
        }
    }
}

/// Reports the connection only after the handshake.
struct ClientHandler<In> {
    socket: ws::Sender,
    send: Sender<In>,
    connection: Connection,
}
impl<In: DeserializeOwned> ws::Handler for ClientHandler<In> {
    fn on_open(&mut self, _: ws::Handshake) -> ws::Result<()> {
        set_connection(&self.connection, Ok(self.socket.clone()));
        Ok(())
    }

    fn on_message(&mut self, msg: ws::Message) -> ws::Result<()> {
        message_handler(msg, &self.socket, &self.send)
    }

    fn on_error(&mut self, err: ws::Error) {
        set_connection(&self.connection, Err(err.to_string()));
    }
}

fn message_handler<In: DeserializeOwned>(
    msg: ws::Message,
    socket: &ws::Sender,
    send: &Sender<In>,
) -> ws::Result<()> {
    let ws::Message::Text(text) = msg else {
        warn!("binary frame ignored");
        return Ok(());
    };
    match serde_json::from_str::<Message<In>>(&text) {
        Err(e) => Err(ws::Error::new(
            ws::ErrorKind::Custom(Box::new(e)),
            "can not parse message",
        )),
        Ok(Message::Shutdown) => socket.shutdown(),
        Ok(Message::Message(m)) => {
            if send.send(m).is_err() {
                warn!("message dropped: receiver is gone");
            }
            Ok(())
        }
    }
}

/// Sending and receiving end of one connection.
///
/// Works the same for server and client.
#[derive(Debug)]
pub struct SocketHandle<In, Out> {
    socket: ws::Sender,
    receiver: Receiver<In>,
    out: PhantomData<fn(Out)>,
}
impl<In, Out: Serialize> SocketHandle<In, Out> {
    fn new(socket: ws::Sender, receiver: Receiver<In>) -> Self {
        Self {
            socket,
            receiver,
            out: PhantomData,
        }
    }

    fn send_frame(&self, msg: &Message<Out>) -> ReapyResult<()> {
        let text = serde_json::to_string(msg)?;
        self.socket
            .send(text)
            .map_err(|e| ReapyError::Socket(format!("send error: {}", e)))
    }

    /// Send message to the other end.
    pub fn send(&self, msg: Out) -> ReapyResult<()> {
        self.send_frame(&Message::Message(msg))
    }

    /// Next queued message, if any.
    ///
    /// `Err` means the connection is closed.
    pub fn try_recv(&self) -> ReapyResult<Option<In>> {
        match self.receiver.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(ReapyError::Socket("connection closed".to_string()))
            }
        }
    }

    /// Wait for message.
    pub fn recv_timeout(&self, timeout: Duration) -> ReapyResult<In> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => ReapyError::Timeout,
            RecvTimeoutError::Disconnected => {
                ReapyError::Socket("connection closed".to_string())
            }
        })
    }

    /// Ask the other end to close, then close own socket.
    pub fn shutdown_all(&self) -> ReapyResult<()> {
        self.send_frame(&Message::Shutdown)?;
        self.shutdown()
    }

    pub fn shutdown(&self) -> ReapyResult<()> {
        self.socket
            .shutdown()
            .map_err(|e| ReapyError::Socket(format!("shutdown error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_externally_tagged() {
        let text = serde_json::to_string(&Message::Message(5)).unwrap();
        assert_eq!(text, r#"{"Message":5}"#);
        let text = serde_json::to_string(&Message::<i32>::Shutdown).unwrap();
        assert_eq!(text, r#""Shutdown""#);
    }

    #[test]
    fn refused_connection_is_socket_error() {
        let result = spawn_client::<i32, i32>(
            "ws://127.0.0.1:1",
            Duration::from_millis(500),
        );
        assert!(matches!(result, Err(ReapyError::Socket(_))));
    }
}
