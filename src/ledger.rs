//! Line-item ledger for an appointment.
//!
//! The ledger keeps the used/done rows of one kind in entry order and a total
//! that is recomputed after every mutation. Entries are validated before they
//! are stored, so the total is always `Σ price * quantity` over valid rows.

use crate::error::EntryError;
use crate::models::LedgerEntry;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    total: Decimal,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The derived total of the current entries.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Parses the raw form values and appends the entry.
    ///
    /// Returns the new total. On error the ledger is left untouched.
    pub fn add_entry(
        &mut self,
        name: &str,
        unit_price: &str,
        quantity: &str,
    ) -> Result<Decimal, EntryError> {
        let entry = LedgerEntry {
            name: name.trim().to_string(),
            price: parse_amount(unit_price)
                .map_err(|_| EntryError::InvalidPrice(unit_price.trim().to_string()))?,
            quantity: parse_amount(quantity)
                .map_err(|_| EntryError::InvalidQuantity(quantity.trim().to_string()))?,
        };
        self.push(entry)
    }

    /// Appends an already-typed entry after validating it.
    pub fn push(&mut self, entry: LedgerEntry) -> Result<Decimal, EntryError> {
        if entry.name.trim().is_empty() {
            return Err(EntryError::EmptyName);
        }
        if entry.price.is_sign_negative() && !entry.price.is_zero() {
            return Err(EntryError::NegativePrice);
        }
        if entry.quantity.is_sign_negative() && !entry.quantity.is_zero() {
            return Err(EntryError::NegativeQuantity);
        }
        entry
            .checked_line_total()
            .and_then(|line| self.total.checked_add(line))
            .ok_or(EntryError::OutOfRange)?;

        self.entries.push(entry);
        Ok(self.recompute())
    }

    /// Drops the most recent entry. No-op on an empty ledger.
    pub fn remove_last(&mut self) -> Option<LedgerEntry> {
        let removed = self.entries.pop();
        self.recompute();
        removed
    }

    pub fn clear_all(&mut self) -> Decimal {
        self.entries.clear();
        self.recompute()
    }

    fn recompute(&mut self) -> Decimal {
        // Every stored row is non-negative and the full sum fit when it was
        // pushed, so partial sums cannot overflow.
        self.total = self
            .entries
            .iter()
            .filter_map(LedgerEntry::checked_line_total)
            .sum();
        self.total
    }
}

/// Parses a decimal amount typed by the user. Fractions are kept.
pub fn parse_amount(text: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_remove_clear_scenario() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_entry("Aspirin", "10", "3"), Ok(dec!(30)));
        assert_eq!(ledger.add_entry("Gauze", "5", "2"), Ok(dec!(40)));
        assert_eq!(ledger.total(), dec!(40));

        let removed = ledger.remove_last().unwrap();
        assert_eq!(removed.name, "Gauze");
        assert_eq!(ledger.total(), dec!(30));

        assert_eq!(ledger.clear_all(), Decimal::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_last_on_empty_is_noop() {
        let mut ledger = Ledger::new();
        assert!(ledger.remove_last().is_none());
        assert_eq!(ledger.total(), Decimal::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_fractional_prices_are_not_truncated() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_entry("Saline", "2.50", "2"), Ok(dec!(5.00)));
        assert_eq!(ledger.add_entry("Swab", "0.3", "1.5"), Ok(dec!(5.45)));
    }

    #[test]
    fn test_non_numeric_quantity_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.add_entry("Aspirin", "10", "3").unwrap();

        let err = ledger.add_entry("Gauze", "5", "abc").unwrap_err();
        assert_eq!(err, EntryError::InvalidQuantity("abc".into()));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total(), dec!(30));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_entry("  ", "1", "1"), Err(EntryError::EmptyName));
        assert_eq!(
            ledger.add_entry("Aspirin", "", "1"),
            Err(EntryError::InvalidPrice(String::new()))
        );
        assert_eq!(
            ledger.add_entry("Aspirin", "-1", "1"),
            Err(EntryError::NegativePrice)
        );
        assert_eq!(
            ledger.add_entry("Aspirin", "1", "-2"),
            Err(EntryError::NegativeQuantity)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut ledger = Ledger::new();
        let huge = Decimal::MAX.to_string();
        assert_eq!(
            ledger.add_entry("Gold", &huge, "2"),
            Err(EntryError::OutOfRange)
        );
        assert!(ledger.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u32, u32, u16),
        RemoveLast,
        ClearAll,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0u32..100_000, 0u32..100, 0u16..500).prop_map(|(p, c, q)| Op::Add(p, c, q)),
            2 => Just(Op::RemoveLast),
            1 => Just(Op::ClearAll),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_matches_entries(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut ledger = Ledger::new();
            let mut model: Vec<(Decimal, Decimal)> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(units, cents, qty) => {
                        let price = format!("{units}.{cents:02}");
                        ledger.add_entry("item", &price, &qty.to_string()).unwrap();
                        model.push((Decimal::from_str(&price).unwrap(), Decimal::from(qty)));
                    }
                    Op::RemoveLast => {
                        ledger.remove_last();
                        model.pop();
                    }
                    Op::ClearAll => {
                        ledger.clear_all();
                        model.clear();
                    }
                }
                let expected: Decimal = model.iter().map(|(p, q)| *p * *q).sum();
                prop_assert_eq!(ledger.total(), expected);
                prop_assert_eq!(ledger.len(), model.len());
            }
        }
    }
}
