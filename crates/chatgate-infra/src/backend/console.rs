//! Line-oriented console backend.
//!
//! Reads one inbound `message` event per input line and writes replies as
//! `[thread] text` lines. A line of the form `@sender text` is delivered as
//! coming from `sender`, which makes admin and self-message paths easy to
//! exercise by hand.
//!
//! Provides:
//! - `ConsoleBackend` -- `ChatBackend` over an async or blocking reader
//! - `ConsoleTransport` -- the outbound half, a `ChatTransport`

use std::io::{self, BufRead};
use std::pin::Pin;
use std::sync::Arc;

use chatgate_core::backend::{BackendSession, BoxChatTransport, ChatBackend, ChatTransport};
use chatgate_types::error::{BackendError, SendError};
use chatgate_types::event::InboundEvent;
use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::{Mutex, mpsc};

/// Default sender id for console input.
pub const DEFAULT_SENDER_ID: &str = "console-user";

/// Default thread id for console input.
pub const DEFAULT_THREAD_ID: &str = "console";

/// Default account id of the bot on the console.
pub const DEFAULT_SELF_ID: &str = "chatgate";

// ---------------------------------------------------------------------------
// ConsoleTransport
// ---------------------------------------------------------------------------

/// Writes replies to an async writer, one line per message.
pub struct ConsoleTransport<W> {
    out: Arc<Mutex<W>>,
}

impl<W> Clone for ConsoleTransport<W> {
    fn clone(&self) -> Self {
        Self {
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> ChatTransport for ConsoleTransport<W> {
    async fn send_text(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        let mut out = self.out.lock().await;
        let line = format!("[{thread_id}] {text}\n");
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Line input
// ---------------------------------------------------------------------------

/// Lines waiting in the channel between the blocking reader thread and the
/// event stream.
const LINE_BUFFER: usize = 16;

type LineStream = Pin<Box<dyn Stream<Item = io::Result<String>> + Send + 'static>>;

/// Where console lines come from.
enum LineInput {
    /// Any async reader; read on the runtime.
    Async(Pin<Box<dyn AsyncBufRead + Send>>),
    /// A blocking reader; read on a dedicated OS thread that the runtime
    /// never joins, so shutdown does not wait for the next line.
    Blocking(Box<dyn BufRead + Send>),
}

impl LineInput {
    fn into_lines(self) -> io::Result<LineStream> {
        let lines: LineStream = match self {
            Self::Async(reader) => Box::pin(async_stream::stream! {
                let mut lines = reader.lines();
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => yield Ok(line),
                        Ok(None) => break,
                        Err(e) => {
                            yield Err(e);
                            break;
                        }
                    }
                }
            }),
            Self::Blocking(reader) => {
                let mut rx = spawn_line_reader(reader)?;
                Box::pin(async_stream::stream! {
                    while let Some(line) = rx.recv().await {
                        let failed = line.is_err();
                        yield line;
                        if failed {
                            break;
                        }
                    }
                })
            }
        };
        Ok(lines)
    }
}

/// Read `reader` line by line on a detached thread.
///
/// The thread exits on EOF, on a read error or once the receiver is gone.
fn spawn_line_reader(
    reader: Box<dyn BufRead + Send>,
) -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

// ---------------------------------------------------------------------------
// ConsoleBackend
// ---------------------------------------------------------------------------

/// A backend that reads lines from an input and writes replies to `W`.
pub struct ConsoleBackend<W> {
    input: LineInput,
    output: W,
    self_id: String,
    sender_id: String,
    thread_id: String,
}

impl ConsoleBackend<Stdout> {
    /// Console backend on the process's stdin and stdout.
    ///
    /// Stdin is read on its own thread: an idle terminal or pipe must not
    /// keep the process alive after shutdown.
    pub fn stdio() -> Self {
        Self::blocking(io::BufReader::new(io::stdin()), tokio::io::stdout())
    }
}

impl<W> ConsoleBackend<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Console backend over an async reader.
    pub fn new(input: impl AsyncBufRead + Send + 'static, output: W) -> Self {
        Self::with_input(LineInput::Async(Box::pin(input)), output)
    }

    /// Console backend over a blocking reader, read on a dedicated thread.
    pub fn blocking(input: impl BufRead + Send + 'static, output: W) -> Self {
        Self::with_input(LineInput::Blocking(Box::new(input)), output)
    }

    fn with_input(input: LineInput, output: W) -> Self {
        Self {
            input,
            output,
            self_id: DEFAULT_SELF_ID.to_string(),
            sender_id: DEFAULT_SENDER_ID.to_string(),
            thread_id: DEFAULT_THREAD_ID.to_string(),
        }
    }

    pub fn with_self_id(mut self, self_id: impl Into<String>) -> Self {
        self.self_id = self_id.into();
        self
    }

    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = sender_id.into();
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }
}

/// Split an `@sender text` line. Other lines come from `default_sender`.
fn parse_line<'a>(line: &'a str, default_sender: &'a str) -> (&'a str, &'a str) {
    if let Some(rest) = line.strip_prefix('@') {
        let (sender, body) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if !sender.is_empty() {
            return (sender, body.trim_start());
        }
    }
    (default_sender, line)
}

impl<W> ChatBackend for ConsoleBackend<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "console"
    }

    async fn connect(self) -> Result<BackendSession, BackendError> {
        if self.self_id.trim().is_empty() {
            return Err(BackendError::AuthFailed("self id must not be empty".to_string()));
        }

        let Self {
            input,
            output,
            self_id,
            sender_id,
            thread_id,
        } = self;

        let lines = input
            .into_lines()
            .map_err(|e| BackendError::Listen(format!("cannot start console reader: {e}")))?;

        tracing::info!(%self_id, %sender_id, %thread_id, "console backend connected");

        let events = Box::pin(lines.map(move |line| match line {
            Ok(line) => {
                let (sender, body) = parse_line(&line, &sender_id);
                Ok(InboundEvent::message(sender, thread_id.as_str(), body))
            }
            Err(e) => Err(BackendError::Listen(e.to_string())),
        }));

        Ok(BackendSession {
            self_id,
            transport: BoxChatTransport::new(ConsoleTransport::new(output)),
            events,
        })
    }
}
