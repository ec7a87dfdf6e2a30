//! Scan session state machine
//!
//! `Idle` (camera running) → `Stopping` (decode claimed, waiting for the
//! camera to stop) → `Decoded` (active record) → back to `Idle` on
//! "scan another".

use crate::models::{Checklist, Flag, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Stopping { code: String },
    Decoded(Record),
}

/// Proof that a decode was claimed in a given session generation.
#[derive(Debug, PartialEq, Eq)]
pub struct DecodeTicket {
    generation: u64,
    code: String,
}

impl DecodeTicket {
    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Debug)]
pub struct ScanSession {
    phase: ScanPhase,
    generation: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Active record, once decoded
    pub fn active(&self) -> Option<&Record> {
        match &self.phase {
            ScanPhase::Decoded(record) => Some(record),
            _ => None,
        }
    }

    /// Claim a decode result. Only the first non-empty decode while `Idle`
    /// wins; everything after it is ignored until the session is reset.
    pub fn claim(&mut self, decoded: &str) -> Option<DecodeTicket> {
        if decoded.is_empty() || self.phase != ScanPhase::Idle {
            return None;
        }
        self.phase = ScanPhase::Stopping {
            code: decoded.to_string(),
        };
        Some(DecodeTicket {
            generation: self.generation,
            code: decoded.to_string(),
        })
    }

    /// Enter `Decoded` with `checklist` for the ticket's code.
    ///
    /// Returns `None` if the ticket is stale (the session was reset after
    /// the claim).
    pub fn commit(&mut self, ticket: DecodeTicket, checklist: Checklist) -> Option<&Record> {
        let current = matches!(&self.phase, ScanPhase::Stopping { code } if *code == ticket.code);
        if ticket.generation != self.generation || !current {
            return None;
        }
        self.phase = ScanPhase::Decoded(Record::new(ticket.code, checklist));
        self.active()
    }

    /// Set `flag` on the active record; returns the updated record.
    pub fn toggle(&mut self, flag: Flag, checked: bool) -> Option<&Record> {
        match &mut self.phase {
            ScanPhase::Decoded(record) => {
                record.checklist.set(flag, checked);
                Some(&*record)
            }
            _ => None,
        }
    }

    /// Drop the active record and invalidate outstanding tickets.
    pub fn reset(&mut self) {
        self.phase = ScanPhase::Idle;
        self.generation += 1;
    }
}
