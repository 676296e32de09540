//! Voltage input management for the 21-cell reading vector

use sohmon_core::{CELL_COUNT, Error, PredictionProvider, PredictionResponse, Result};

/// Default cell voltage pre-filled into every slot, in volts
pub const DEFAULT_CELL_VOLTAGE: f64 = 3.5;

/// Owns the fixed-size voltage vector and the submission lifecycle.
///
/// A slot holds `f64::NAN` while its raw text does not parse; editing never
/// fails, validation happens at submission time. The vector is mutated in
/// place and never resized.
#[derive(Debug, Clone)]
pub struct VoltageInputManager {
    cells: [f64; CELL_COUNT],
    in_flight: bool,
    next_seq: u64,
}

/// A validated submission handed out by [`VoltageInputManager::begin_submit`].
/// `seq` increases monotonically so late responses can be told apart from
/// fresh ones.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub seq: u64,
    pub cells: [f64; CELL_COUNT],
}

impl Default for VoltageInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl VoltageInputManager {
    pub fn new() -> Self {
        Self {
            cells: [DEFAULT_CELL_VOLTAGE; CELL_COUNT],
            in_flight: false,
            next_seq: 0,
        }
    }

    /// Store a raw reading at `index` (0-based). Unparseable input is kept
    /// as a NaN sentinel rather than rejected.
    pub fn set_reading(&mut self, index: usize, raw: &str) -> Result<()> {
        if index >= CELL_COUNT {
            return Err(Error::IndexOutOfRange {
                index,
                len: CELL_COUNT,
            });
        }
        self.cells[index] = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
        Ok(())
    }

    /// Current vector; invalid slots show up as NaN
    pub fn vector(&self) -> &[f64; CELL_COUNT] {
        &self.cells
    }

    /// Indices of slots that would fail validation (0-based)
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_finite())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validate and reserve a submission.
    ///
    /// Fails with [`Error::Validation`] naming every non-finite slot (and
    /// sends nothing), or with [`Error::RequestInProgress`] while an earlier
    /// submission is still outstanding. On success the manager is marked
    /// in-flight and the ticket carries the next sequence number.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket> {
        if self.in_flight {
            return Err(Error::RequestInProgress);
        }

        let invalid = self.invalid_indices();
        if !invalid.is_empty() {
            return Err(Error::Validation(invalid));
        }

        self.in_flight = true;
        self.next_seq += 1;
        Ok(SubmitTicket {
            seq: self.next_seq,
            cells: self.cells,
        })
    }

    /// Release the reservation once the response (or failure) for the
    /// current ticket has arrived.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }

    /// Validate, send exactly one prediction request, and release the
    /// reservation whichever way the request ends.
    pub async fn submit<P: PredictionProvider>(
        &mut self,
        provider: &P,
    ) -> Result<(u64, PredictionResponse)> {
        let ticket = self.begin_submit()?;
        let outcome = provider.predict(&ticket.cells).await;
        self.finish_submit();
        Ok((ticket.seq, outcome?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vector_is_filled_with_default() {
        let manager = VoltageInputManager::new();
        assert!(manager.vector().iter().all(|&v| v == DEFAULT_CELL_VOLTAGE));
        assert!(manager.invalid_indices().is_empty());
    }

    #[test]
    fn test_set_reading_parses_in_place() {
        let mut manager = VoltageInputManager::new();
        manager.set_reading(3, "3.72").unwrap();
        assert_eq!(manager.vector()[3], 3.72);
        manager.set_reading(3, "  3.8 ").unwrap();
        assert_eq!(manager.vector()[3], 3.8);
    }

    #[test]
    fn test_unparseable_reading_becomes_nan_sentinel() {
        let mut manager = VoltageInputManager::new();
        manager.set_reading(5, "abc").unwrap();
        assert!(manager.vector()[5].is_nan());
        assert_eq!(manager.invalid_indices(), vec![5]);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut manager = VoltageInputManager::new();
        let err = manager.set_reading(CELL_COUNT, "3.5").unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange { index, len } if index == CELL_COUNT && len == CELL_COUNT
        ));
    }

    #[test]
    fn test_begin_submit_names_every_invalid_slot() {
        let mut manager = VoltageInputManager::new();
        manager.set_reading(2, "x").unwrap();
        manager.set_reading(10, "").unwrap();
        manager.set_reading(20, "nope").unwrap();

        let err = manager.begin_submit().unwrap_err();
        match err {
            Error::Validation(indices) => assert_eq!(indices, vec![2, 10, 20]),
            other => panic!("expected Validation, got {other:?}"),
        }
        // Nothing was reserved
        assert!(!manager.is_in_flight());
    }

    #[test]
    fn test_second_submit_while_outstanding_is_rejected() {
        let mut manager = VoltageInputManager::new();
        let ticket = manager.begin_submit().unwrap();
        assert_eq!(ticket.seq, 1);
        assert!(manager.is_in_flight());

        assert!(matches!(
            manager.begin_submit().unwrap_err(),
            Error::RequestInProgress
        ));

        manager.finish_submit();
        let ticket = manager.begin_submit().unwrap();
        assert_eq!(ticket.seq, 2);
    }

    #[test]
    fn test_sequence_numbers_increase_monotonically() {
        let mut manager = VoltageInputManager::new();
        let mut last = 0;
        for _ in 0..5 {
            let ticket = manager.begin_submit().unwrap();
            assert!(ticket.seq > last);
            last = ticket.seq;
            manager.finish_submit();
        }
    }
}
