//! Output side of the terminal: structured message fragments, rendered by
//! whatever sink the terminal was built with.

use ansi_term::{Colour, Style};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    /// A person's name.
    Name,
    /// A date or time.
    Time,
    Success,
    Warning,
    Error,
    /// Banners: closing time, good night.
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub emphasis: Emphasis,
    pub text: String,
}

impl Message {
    pub fn new(emphasis: Emphasis, text: impl Into<String>) -> Self {
        Self {
            emphasis,
            text: text.into(),
        }
    }
}

pub trait Sink {
    /// Fragments are emitted in order; line breaks are part of the text.
    fn emit(&mut self, msg: Message);

    /// Wipe whatever is on screen.
    fn clear(&mut self) {}

    fn say(&mut self, emphasis: Emphasis, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(Message::new(emphasis, text));
    }
}

/// Colored output on stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn style(emphasis: Emphasis) -> Style {
        match emphasis {
            Emphasis::Normal => Style::new(),
            Emphasis::Name => Colour::Yellow.bold(),
            Emphasis::Time => Colour::Cyan.normal(),
            Emphasis::Success => Colour::Green.normal(),
            // plain yellow reads as brown on most reader screens
            Emphasis::Warning => Colour::Fixed(226).normal(),
            Emphasis::Error => Colour::Red.normal(),
            Emphasis::Highlight => Colour::Blue.bold(),
        }
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, msg: Message) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{}", Self::style(msg.emphasis).paint(msg.text));
        let _ = out.flush();
    }

    fn clear(&mut self) {
        // clear screen + scrollback, cursor home
        let mut out = io::stdout().lock();
        let _ = write!(out, "\x1b[2J\x1b[3J\x1b[H");
        let _ = out.flush();
    }
}

/// Keeps every fragment; used when the output is inspected rather than shown.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub messages: Vec<Message>,
    pub clears: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text emitted so far, without emphasis.
    pub fn text(&self) -> String {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    /// Number of fragments containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.text.contains(needle))
            .count()
    }

    pub fn with_emphasis(&self, emphasis: Emphasis) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.emphasis == emphasis)
            .collect()
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
