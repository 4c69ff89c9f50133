//! Serial link lifecycle and I/O.
//!
//! The link owns the serial port exclusively. A background reader thread
//! reassembles inbound frames and hands parsed responses to an event
//! channel; the owner drains that channel from its own loop. The writer
//! half lives behind a mutex, so sends are serialized even when callers
//! are multi-threaded.
//!
//! Lifecycle: closed -> opening -> open -> closing -> closed. Port loss
//! surfaces as a read error in the reader thread, which emits a single
//! [`LinkEvent::Closed`]; any in-flight send is lost silently.

use crate::constants::BAUD_RATE;
use crate::transport::framing::LineFramer;
use crate::transport::protocol::{Request, Response};
use serialport::SerialPort;
use std::io;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Read timeout of the reader thread; bounds shutdown latency.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Connection state of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No port is attached.
    Closed,
    /// The port is being opened.
    Opening,
    /// The receive loop is running and sends are accepted.
    Open,
    /// The port is being shut down.
    Closing,
}

/// Events the link delivers to its owner, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The link came up.
    Opened,
    /// The link went down (closed or port lost).
    Closed,
    /// One complete, parsed frame.
    Frame(Response),
    /// A frame failed to parse and was dropped. The stream continues.
    DecodeError(String),
}

/// Transport failures the caller must distinguish.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Opening the port failed.
    #[error("failed to open {port}: {source}")]
    Open {
        /// Port name as given by the caller
        port: String,
        /// Underlying serial error
        source: serialport::Error,
    },
    /// A send was attempted while the link is not open.
    #[error("link is not open")]
    NotOpen,
    /// Writing to the port failed.
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

/// The serial link to the device.
pub struct SerialLink {
    state: LinkState,
    writer: Option<Arc<Mutex<Box<dyn SerialPort>>>>,
    events: Option<Receiver<LinkEvent>>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SerialLink {
    /// Creates a closed link.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LinkState::Closed,
            writer: None,
            events: None,
            stop: Arc::new(AtomicBool::new(false)),
            reader: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Whether sends are currently accepted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, LinkState::Open)
    }

    /// Opens `port_name` at the fixed baud rate and starts the receive
    /// loop. An already-open link is closed first.
    pub fn open(&mut self, port_name: &str) -> Result<(), TransportError> {
        if self.state != LinkState::Closed {
            self.close();
        }
        self.state = LinkState::Opening;
        debug!(port = port_name, "opening serial link");

        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| {
                self.state = LinkState::Closed;
                TransportError::Open {
                    port: port_name.to_string(),
                    source,
                }
            })?;
        let reader_port = port.try_clone().map_err(|source| {
            self.state = LinkState::Closed;
            TransportError::Open {
                port: port_name.to_string(),
                source,
            }
        })?;

        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let _ = tx.send(LinkEvent::Opened);

        let reader_stop = Arc::clone(&stop);
        let reader = std::thread::spawn(move || run_reader(reader_port, &tx, &reader_stop));

        self.writer = Some(Arc::new(Mutex::new(port)));
        self.events = Some(rx);
        self.stop = stop;
        self.reader = Some(reader);
        self.state = LinkState::Open;
        Ok(())
    }

    /// Flushes the writer, cancels the reader, and closes the port.
    /// Partial failures during cancellation are swallowed.
    pub fn close(&mut self) {
        if self.state == LinkState::Closed {
            return;
        }
        self.state = LinkState::Closing;
        debug!("closing serial link");

        self.stop.store(true, Ordering::Relaxed);
        if let Some(writer) = self.writer.take() {
            if let Ok(mut port) = writer.lock() {
                let _ = port.flush();
            }
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        self.events = None;
        self.state = LinkState::Closed;
    }

    /// Sends one request frame. Returns once the port accepted the bytes;
    /// never waits for a matching response.
    pub fn send(&self, request: &Request) -> Result<(), TransportError> {
        let writer = self.writer.as_ref().ok_or(TransportError::NotOpen)?;
        let frame = request
            .to_frame()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        let mut port = writer.lock().map_err(|_| TransportError::NotOpen)?;
        port.write_all(&frame)?;
        port.flush()?;
        debug!(command = %request.command, "sent request");
        Ok(())
    }

    /// Drains pending link events without blocking.
    ///
    /// A [`LinkEvent::Closed`] transitions the link to closed as a side
    /// effect, so callers observe port loss as a single state change.
    pub fn poll(&mut self) -> Vec<LinkEvent> {
        let mut events = Vec::new();
        let mut lost = false;

        if let Some(rx) = &self.events {
            loop {
                match rx.try_recv() {
                    Ok(event) => {
                        if event == LinkEvent::Closed {
                            lost = true;
                        }
                        events.push(event);
                    }
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }
        }

        if lost && self.state == LinkState::Open {
            warn!("serial link lost");
            self.writer = None;
            self.stop.store(true, Ordering::Relaxed);
            if let Some(reader) = self.reader.take() {
                let _ = reader.join();
            }
            self.state = LinkState::Closed;
        }
        events
    }
}

impl Default for SerialLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.close();
    }
}

/// The receive loop: read, reframe, parse, forward.
fn run_reader(mut port: Box<dyn SerialPort>, tx: &Sender<LinkEvent>, stop: &Arc<AtomicBool>) {
    let mut framer = LineFramer::new();
    let mut buf = [0_u8; 512];

    while !stop.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                for line in framer.push(&buf[..n]) {
                    if line.is_empty() {
                        continue;
                    }
                    match Response::parse(&line) {
                        Ok(response) => {
                            let _ = tx.send(LinkEvent::Frame(response));
                        }
                        Err(e) => {
                            warn!(error = %e, "dropping unparseable frame");
                            let _ = tx.send(LinkEvent::DecodeError(e.to_string()));
                        }
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                warn!(error = %e, "serial read failed, closing link");
                let _ = tx.send(LinkEvent::Closed);
                return;
            }
        }
    }
}
