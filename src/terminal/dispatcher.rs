//! The terminal loop: wait for a tag, process it completely, repeat.
//! Read timeouts drive housekeeping (screen reset, closing sweep).

use crate::config::Config;
use crate::core::attendance::AttendanceEngine;
use crate::core::sweep::ClosingSweep;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult, ErrorCategory};
use crate::terminal::clock::Clock;
use crate::terminal::device::{Read, TagSource};
use crate::ui::report::{render_outside_hours, render_start, render_sweep, render_toggle};
use crate::ui::sink::{Emphasis, Sink};
use std::time::Duration;

/// What one `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A tag was read and processed.
    Handled,
    /// Read timed out; housekeeping ran.
    Idle,
    /// Tag read outside opening hours.
    Rejected,
    /// The source is exhausted.
    Closed,
}

/// Exponential retry delay, doubled per failure up to `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            current: initial,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Duration::from_secs(cfg.retry_delay_secs),
            Duration::from_secs(cfg.max_retry_delay_secs),
        )
    }

    /// Delay to wait now; the following one is doubled.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

pub struct Terminal<S: TagSource, K: Sink, C: Clock> {
    pool: DbPool,
    source: S,
    sink: K,
    clock: C,
    engine: AttendanceEngine,
    sweep: ClosingSweep,
    read_timeout: Duration,
    backoff: Backoff,
}

impl<S: TagSource, K: Sink, C: Clock> Terminal<S, K, C> {
    pub fn new(cfg: &Config, pool: DbPool, source: S, sink: K, clock: C) -> Self {
        Self {
            pool,
            source,
            sink,
            clock,
            engine: AttendanceEngine::new(cfg),
            sweep: ClosingSweep::new(cfg),
            read_timeout: Duration::from_millis(cfg.read_timeout_ms),
            backoff: Backoff::from_config(cfg),
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn pool(&mut self) -> &mut DbPool {
        &mut self.pool
    }

    pub fn is_closed_for_the_night(&self) -> bool {
        self.sweep.is_closed()
    }

    pub fn reset_screen(&mut self) {
        self.sink.clear();
        render_start(&mut self.sink, self.clock.now());
    }

    /// Wait for one read and act on it.
    pub fn step(&mut self) -> AppResult<Step> {
        match self.source.read(self.read_timeout)? {
            Read::Tag(tag) => {
                let now = self.clock.now();
                if !self.engine.accepts_logins_at(now) {
                    tracing::info!(%tag, "tag read outside opening hours");
                    render_outside_hours(&mut self.sink);
                    return Ok(Step::Rejected);
                }

                self.sink.clear();
                let outcome = self.engine.toggle(&mut self.pool, &tag, now)?;
                render_toggle(&mut self.sink, &outcome);
                Ok(Step::Handled)
            }
            Read::Timeout => {
                self.on_idle()?;
                Ok(Step::Idle)
            }
            Read::Closed => Ok(Step::Closed),
        }
    }

    fn on_idle(&mut self) -> AppResult<()> {
        // keep the sweep result on screen through the night
        if !self.sweep.is_closed() {
            self.reset_screen();
        }

        if let Some(report) = self.sweep.on_idle(&mut self.pool, self.clock.now())? {
            tracing::info!(logged_out = report.logged_out.len(), "closing sweep done");
            self.sink.clear();
            render_sweep(&mut self.sink, &report);
        }
        Ok(())
    }

    /// Run until the source closes. Transient failures are retried with
    /// backoff, integrity and configuration failures are reported and the
    /// loop continues. Fatal errors end the loop.
    pub fn run(&mut self) -> AppResult<()> {
        self.reset_screen();

        loop {
            match self.step() {
                Ok(Step::Closed) => {
                    tracing::info!("tag source closed, stopping");
                    return Ok(());
                }
                Ok(_) => self.backoff.reset(),
                Err(e) => self.handle_error(e)?,
            }
        }
    }

    fn handle_error(&mut self, e: AppError) -> AppResult<()> {
        match e.category() {
            ErrorCategory::Transient => {
                let delay = self.backoff.next_delay();
                tracing::warn!(error = %e, delay_secs = delay.as_secs(), "transient failure, retrying");
                self.report_transient(&e);
                self.clock.sleep(delay);
                if matches!(e, AppError::Device(_) | AppError::Io(_))
                    && let Err(re) = self.source.reconnect()
                {
                    tracing::warn!(error = %re, "reconnect failed");
                }
                Ok(())
            }
            ErrorCategory::Integrity => {
                tracing::error!(error = %e, "data integrity problem, event skipped");
                self.sink.say(Emphasis::Error, format!("\n{e}\n"));
                self.sink.say(Emphasis::Error, "Better luck next time?\n");
                Ok(())
            }
            ErrorCategory::Configuration => {
                tracing::warn!(error = %e, "configuration problem");
                self.sink.say(Emphasis::Warning, format!("\n{e}\n"));
                Ok(())
            }
            ErrorCategory::Fatal => {
                tracing::error!(error = %e, "fatal error, stopping");
                self.sink
                    .say(Emphasis::Error, "\nAn unforeseen exception happened!\nTILT!\n\n");
                Err(e)
            }
        }
    }

    fn report_transient(&mut self, e: &AppError) {
        match e {
            AppError::Device(_) | AppError::Io(_) => {
                self.sink.say(
                    Emphasis::Error,
                    "\nSeems that there was probably a problem with the RFID reader.\n\
                     Make sure the reader is plugged in.\n",
                );
            }
            _ => {
                self.sink.say(
                    Emphasis::Error,
                    format!("\nThe database is not available right now: {e}\n"),
                );
            }
        }
    }
}
