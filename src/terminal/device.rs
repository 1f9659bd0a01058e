//! Tag sources.
//!
//! The reader sends one tag id per line, terminated by `\r` (the reader's
//! default) or `\n`. Reading happens on a helper thread that only forwards
//! trimmed lines over a channel, so the terminal can wait with a timeout.

use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read as _};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Read {
    Tag(String),
    /// Nothing arrived within the timeout.
    Timeout,
    /// The source is exhausted for good.
    Closed,
}

pub trait TagSource {
    fn read(&mut self, timeout: Duration) -> AppResult<Read>;

    /// Called after a device error, before reading again.
    fn reconnect(&mut self) -> AppResult<()> {
        Ok(())
    }
}

type Lines = Receiver<io::Result<String>>;

#[derive(Debug, Clone)]
enum Origin {
    Stdin,
    Path(PathBuf),
}

/// Line-oriented reader over stdin or a device node / FIFO.
pub struct LineReader {
    origin: Origin,
    rx: Lines,
}

impl LineReader {
    pub fn stdin() -> Self {
        Self {
            origin: Origin::Stdin,
            rx: spawn_lines(io::stdin()),
        }
    }

    /// Opening happens on the reader thread; a missing device shows up as a
    /// device error on the first read.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            rx: spawn_path(path.clone()),
            origin: Origin::Path(path),
        }
    }

    /// `-` means stdin.
    pub fn from_device(device: &str) -> Self {
        if device == "-" {
            Self::stdin()
        } else {
            Self::open(expand_tilde(device))
        }
    }
}

impl TagSource for LineReader {
    fn read(&mut self, timeout: Duration) -> AppResult<Read> {
        match self.rx.recv_timeout(timeout) {
            Ok(Ok(tag)) => Ok(Read::Tag(tag)),
            Ok(Err(e)) => Err(AppError::Device(e.to_string())),
            Err(RecvTimeoutError::Timeout) => Ok(Read::Timeout),
            Err(RecvTimeoutError::Disconnected) => match &self.origin {
                Origin::Stdin => Ok(Read::Closed),
                // unplugged reader or FIFO writer gone
                Origin::Path(p) => Err(AppError::Device(format!(
                    "{} was closed",
                    p.display()
                ))),
            },
        }
    }

    fn reconnect(&mut self) -> AppResult<()> {
        match &self.origin {
            Origin::Stdin => Ok(()),
            Origin::Path(p) => {
                tracing::info!(device = %p.display(), "reopening reader device");
                self.rx = spawn_path(p.clone());
                Ok(())
            }
        }
    }
}

fn spawn_path(path: PathBuf) -> Lines {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || match File::open(&path) {
        Ok(file) => forward_lines(file, &tx),
        Err(e) => {
            let _ = tx.send(Err(io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            )));
        }
    });
    rx
}

fn spawn_lines<R: io::Read + Send + 'static>(input: R) -> Lines {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || forward_lines(input, &tx));
    rx
}

fn forward_lines<R: io::Read>(input: R, tx: &Sender<io::Result<String>>) {
    let mut line = Vec::new();

    for byte in BufReader::new(input).bytes() {
        match byte {
            Ok(b'\r' | b'\n') => {
                if let Some(tag) = take_tag(&mut line)
                    && tx.send(Ok(tag)).is_err()
                {
                    return;
                }
            }
            Ok(b) => line.push(b),
            Err(e) => {
                let _ = tx.send(Err(e));
                return;
            }
        }
    }

    if let Some(tag) = take_tag(&mut line) {
        let _ = tx.send(Ok(tag));
    }
}

fn take_tag(line: &mut Vec<u8>) -> Option<String> {
    let raw = std::mem::take(line);
    let tag = String::from_utf8_lossy(&raw).trim().to_string();
    (!tag.is_empty()).then_some(tag)
}

/// Replays a fixed sequence of reads, then reports `Closed`.
#[derive(Default)]
pub struct ScriptedSource {
    script: VecDeque<AppResult<Read>>,
    pub reconnects: usize,
}

impl ScriptedSource {
    pub fn new(reads: impl IntoIterator<Item = Read>) -> Self {
        Self {
            script: reads.into_iter().map(Ok).collect(),
            reconnects: 0,
        }
    }

    pub fn push(&mut self, read: Read) {
        self.script.push_back(Ok(read));
    }

    pub fn push_error(&mut self, e: AppError) {
        self.script.push_back(Err(e));
    }

    pub fn tags(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(|t| Read::Tag(t.to_string())))
    }
}

impl TagSource for ScriptedSource {
    fn read(&mut self, _timeout: Duration) -> AppResult<Read> {
        self.script.pop_front().unwrap_or(Ok(Read::Closed))
    }

    fn reconnect(&mut self) -> AppResult<()> {
        self.reconnects += 1;
        Ok(())
    }
}
