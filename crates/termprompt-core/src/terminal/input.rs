//! Background keystroke reader

use crate::key::{KeyDecoder, KeyEvent};
use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};
use std::sync::{Arc, OnceLock};
use std::thread;
use tokio::sync::{mpsc, Mutex};

/// What the reader thread hands back for one read request
enum Chunk {
    Keys(Vec<KeyEvent>),
    End,
}

/// Reads input on its own thread and delivers decoded keys.
///
/// Reads block, so they run on a plain thread rather than the async
/// runtime. The thread only reads when a consumer asks for a key, so input
/// typed after a run has finished stays in the stream for the next one.
/// Clones share the same thread and buffered keys; the thread exits once
/// every clone is gone.
#[derive(Clone)]
pub struct KeyReader {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    requests: mpsc::UnboundedSender<()>,
    chunks: mpsc::UnboundedReceiver<Chunk>,
    pending: VecDeque<KeyEvent>,
    /// A read was requested and its chunk has not arrived yet
    outstanding: bool,
    ended: bool,
}

impl KeyReader {
    pub fn spawn<R>(mut input: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let (requests, mut wanted) = mpsc::unbounded_channel::<()>();
        let (tx, chunks) = mpsc::unbounded_channel();

        thread::spawn(move || {
            let mut decoder = KeyDecoder::new();
            let mut buf = [0u8; 256];
            while wanted.blocking_recv().is_some() {
                let keys = loop {
                    match input.read(&mut buf) {
                        Ok(0) => {
                            let _ = tx.send(Chunk::Keys(decoder.finish()));
                            let _ = tx.send(Chunk::End);
                            return;
                        }
                        Ok(n) => {
                            let keys = decoder.feed(&buf[..n]);
                            if !keys.is_empty() {
                                break keys;
                            }
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(_) => {
                            let _ = tx.send(Chunk::End);
                            return;
                        }
                    }
                };
                if tx.send(Chunk::Keys(keys)).is_err() {
                    return;
                }
            }
        });

        Self {
            inner: Arc::new(Mutex::new(Inner {
                requests,
                chunks,
                pending: VecDeque::new(),
                outstanding: false,
                ended: false,
            })),
        }
    }

    /// The process-wide reader for stdin, shared by every run
    pub fn stdin() -> Self {
        static STDIN: OnceLock<KeyReader> = OnceLock::new();
        STDIN.get_or_init(|| KeyReader::spawn(io::stdin())).clone()
    }

    /// Next key, or `None` once the input has ended.
    ///
    /// Cancel safe: a key whose read was already requested is kept for the
    /// next call.
    pub async fn next(&self) -> Option<KeyEvent> {
        self.inner.lock().await.next().await
    }
}

impl Inner {
    async fn next(&mut self) -> Option<KeyEvent> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Some(key);
            }
            if self.ended {
                return None;
            }
            if !self.outstanding {
                if self.requests.send(()).is_err() {
                    self.ended = true;
                    continue;
                }
                self.outstanding = true;
            }
            match self.chunks.recv().await {
                Some(Chunk::Keys(keys)) => {
                    self.outstanding = false;
                    self.pending.extend(keys);
                }
                Some(Chunk::End) | None => {
                    self.outstanding = false;
                    self.ended = true;
                }
            }
        }
    }
}
