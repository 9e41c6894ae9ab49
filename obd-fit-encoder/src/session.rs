//! Encoding session state machine
//!
//! A session owns the container encoder for one output file and enforces
//! the `Unopened -> Opened -> Closed` lifecycle, with a terminal `Failed`
//! state reachable from any step. Opening writes the file identification
//! record; every subsequent row appends its records in translation order;
//! closing finalizes the container. There is no repair, retry, or partial
//! recovery: the first failure poisons the session.

use crate::fit::FitEncoder;
use crate::translate::RowTranslator;
use crate::types::{EncodeError, FileIdRecord, InputRow, Record, Result};
use std::fmt;
use std::io::Write;

/// Observable lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unopened,
    Opened,
    Closed,
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Unopened => write!(f, "unopened"),
            SessionPhase::Opened => write!(f, "opened"),
            SessionPhase::Closed => write!(f, "closed"),
            SessionPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Internal state, carrying the writer or encoder for the live phases
enum State<W: Write> {
    Unopened(W),
    Opened(FitEncoder<W>),
    Closed,
    Failed,
}

/// One encoding session over a writer
pub struct Session<W: Write> {
    state: State<W>,
}

impl<W: Write> Session<W> {
    /// Create a session over the given output writer. Nothing is written
    /// until [`Session::open`].
    pub fn new(writer: W) -> Self {
        Self {
            state: State::Unopened(writer),
        }
    }

    /// The session's current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Unopened(_) => SessionPhase::Unopened,
            State::Opened(_) => SessionPhase::Opened,
            State::Closed => SessionPhase::Closed,
            State::Failed => SessionPhase::Failed,
        }
    }

    /// Open the container and write the file identification record.
    pub fn open(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Failed) {
            State::Unopened(writer) => {
                let mut encoder = FitEncoder::open(writer);
                match encoder.write_record(&Record::FileId(FileIdRecord::activity())) {
                    Ok(()) => {
                        log::debug!("session opened, file identification written");
                        self.state = State::Opened(encoder);
                        Ok(())
                    }
                    Err(e) => Err(EncodeError::OutputOpen(e.to_string())),
                }
            }
            state => {
                let phase = Self::phase_of(&state);
                self.state = state;
                Err(EncodeError::InvalidState(format!(
                    "cannot open a {} session",
                    phase
                )))
            }
        }
    }

    /// Translate one input row and write its records in produced order.
    ///
    /// Returns the number of records written for the row. A write failure
    /// moves the session to `Failed`; calling on a session that is not open
    /// is rejected without changing its phase.
    pub fn write_row(&mut self, row: &InputRow) -> Result<usize> {
        let phase = self.phase();
        let State::Opened(encoder) = &mut self.state else {
            return Err(EncodeError::InvalidState(format!(
                "cannot write to a {} session",
                phase
            )));
        };

        let records = RowTranslator::translate(row);
        let mut failure = None;
        for record in &records {
            if let Err(e) = encoder.write_record(record) {
                failure = Some(e);
                break;
            }
        }

        match failure {
            Some(e) => {
                self.state = State::Failed;
                Err(EncodeError::RecordWrite(e.to_string()))
            }
            None => Ok(records.len()),
        }
    }

    /// Finalize the container and return the underlying writer.
    pub fn close(&mut self) -> Result<W> {
        match std::mem::replace(&mut self.state, State::Failed) {
            State::Opened(encoder) => match encoder.close() {
                Ok(writer) => {
                    log::debug!("session closed");
                    self.state = State::Closed;
                    Ok(writer)
                }
                Err(e) => Err(EncodeError::OutputFinalize(e.to_string())),
            },
            state => {
                let phase = Self::phase_of(&state);
                self.state = state;
                Err(EncodeError::InvalidState(format!(
                    "cannot close a {} session",
                    phase
                )))
            }
        }
    }

    fn phase_of(state: &State<W>) -> SessionPhase {
        match state {
            State::Unopened(_) => SessionPhase::Unopened,
            State::Opened(_) => SessionPhase::Opened,
            State::Closed => SessionPhase::Closed,
            State::Failed => SessionPhase::Failed,
        }
    }
}
