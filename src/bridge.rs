//! Propagation of ledger totals to the container that owns them.
//!
//! The appointment container owns a [`TotalsBoard`]; child panels hand their
//! latest total upward either as a return value or through a [`TotalSink`].

use crate::models::LineKind;
use rust_decimal::Decimal;

/// Receiver of freshly recomputed totals.
pub trait TotalSink {
    fn publish(&mut self, kind: LineKind, total: Decimal);
}

impl<F> TotalSink for F
where
    F: FnMut(LineKind, Decimal),
{
    fn publish(&mut self, kind: LineKind, total: Decimal) {
        self(kind, total)
    }
}

/// Latest published total per line kind. Every slot reads zero until written;
/// each publish replaces the previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TotalsBoard {
    medicine: Decimal,
    procedures: Decimal,
}

impl TotalsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LineKind) -> Decimal {
        match kind {
            LineKind::Medicine => self.medicine,
            LineKind::Procedure => self.procedures,
        }
    }

    pub fn grand_total(&self) -> Decimal {
        self.medicine.saturating_add(self.procedures)
    }
}

impl TotalSink for TotalsBoard {
    fn publish(&mut self, kind: LineKind, total: Decimal) {
        match kind {
            LineKind::Medicine => self.medicine = total,
            LineKind::Procedure => self.procedures = total,
        }
    }
}
