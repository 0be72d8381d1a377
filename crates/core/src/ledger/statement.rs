//! Ledger statement computation.

use rust_decimal::Decimal;

use crate::window::DateWindow;

use super::types::{
    AccountSelector, LedgerEntry, LedgerRow, LedgerStatement, MILK_SALE_CATEGORY, RecordKind,
};

fn matches_selector(entry: &LedgerEntry, selector: &AccountSelector) -> bool {
    match selector {
        AccountSelector::Account(id) => entry.account_id == Some(*id),
        AccountSelector::CashCustomer => {
            entry.category.as_deref() == Some(MILK_SALE_CATEGORY)
                && matches!(entry.kind, RecordKind::Receipt | RecordKind::MilkSale)
        }
    }
}

/// Computes the ledger statement for one account over a date window.
///
/// The statement is total: empty inputs yield empty rows and zero balances.
/// Records are ordered by day; same-day records keep their input order.
/// The opening balance sums all matching records strictly before the window's
/// lower bound, and is zero when the window has no lower bound.
#[must_use]
pub fn compute_statement(
    selector: &AccountSelector,
    entries: &[LedgerEntry],
    window: &DateWindow,
) -> LedgerStatement {
    let mut filtered: Vec<&LedgerEntry> = entries
        .iter()
        .filter(|e| matches_selector(e, selector))
        .collect();
    filtered.sort_by_key(|e| e.date);

    let opening_balance = match window.from {
        Some(from) => filtered
            .iter()
            .filter(|e| e.date < from)
            .map(|e| e.signed_amount())
            .sum(),
        None => Decimal::ZERO,
    };

    let mut balance = opening_balance;
    let rows: Vec<LedgerRow> = filtered
        .iter()
        .filter(|e| window.contains(e.date))
        .map(|e| {
            balance += e.signed_amount();
            let (debit, credit) = if e.kind.is_credit() {
                (Decimal::ZERO, e.amount)
            } else {
                (e.amount, Decimal::ZERO)
            };
            LedgerRow {
                id: e.id,
                date: e.date,
                kind: e.kind,
                description: e.display_description(),
                debit,
                credit,
                balance,
            }
        })
        .collect();

    let closing_balance = rows.last().map_or(opening_balance, |row| row.balance);

    LedgerStatement {
        rows,
        opening_balance,
        closing_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(
        date: &str,
        kind: RecordKind,
        amount: Decimal,
        account_id: Option<Uuid>,
    ) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            date: d(date),
            kind,
            category: None,
            amount,
            description: "test".to_string(),
            account_id,
            quantity: None,
            rate: None,
            invoice_no: None,
        }
    }

    #[test]
    fn test_receipt_then_payment() {
        let account = Uuid::new_v4();
        let entries = vec![
            entry("2024-01-01", RecordKind::Receipt, dec!(100), Some(account)),
            entry("2024-01-05", RecordKind::Payment, dec!(40), Some(account)),
        ];

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &entries,
            &DateWindow::unbounded(),
        );

        assert_eq!(statement.opening_balance, dec!(0));
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.rows[0].credit, dec!(100));
        assert_eq!(statement.rows[0].debit, dec!(0));
        assert_eq!(statement.rows[0].balance, dec!(100));
        assert_eq!(statement.rows[1].debit, dec!(40));
        assert_eq!(statement.rows[1].credit, dec!(0));
        assert_eq!(statement.rows[1].balance, dec!(60));
        assert_eq!(statement.closing_balance, dec!(60));
    }

    #[test]
    fn test_empty_inputs() {
        let statement = compute_statement(
            &AccountSelector::Account(Uuid::new_v4()),
            &[],
            &DateWindow::unbounded(),
        );
        assert!(statement.rows.is_empty());
        assert_eq!(statement.opening_balance, dec!(0));
        assert_eq!(statement.closing_balance, dec!(0));
    }

    #[test]
    fn test_other_accounts_are_filtered_out() {
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();
        let entries = vec![
            entry("2024-01-01", RecordKind::Receipt, dec!(100), Some(account)),
            entry("2024-01-02", RecordKind::Receipt, dec!(999), Some(other)),
            entry("2024-01-03", RecordKind::Expense, dec!(50), None),
        ];

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &entries,
            &DateWindow::unbounded(),
        );
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.closing_balance, dec!(100));
    }

    #[test]
    fn test_opening_balance_from_records_before_window() {
        let account = Uuid::new_v4();
        let entries = vec![
            entry("2024-01-01", RecordKind::Receipt, dec!(100), Some(account)),
            entry("2024-01-15", RecordKind::Payment, dec!(30), Some(account)),
            entry("2024-02-01", RecordKind::Receipt, dec!(20), Some(account)),
        ];

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &entries,
            &DateWindow::new(d("2024-01-10"), d("2024-02-28")),
        );

        assert_eq!(statement.opening_balance, dec!(100));
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.rows[0].balance, dec!(70));
        assert_eq!(statement.closing_balance, dec!(90));
    }

    #[test]
    fn test_window_with_no_rows_closes_at_opening() {
        let account = Uuid::new_v4();
        let entries = vec![entry(
            "2024-01-01",
            RecordKind::Receipt,
            dec!(100),
            Some(account),
        )];

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &entries,
            &DateWindow::new(d("2024-03-01"), d("2024-03-31")),
        );

        assert!(statement.rows.is_empty());
        assert_eq!(statement.opening_balance, dec!(100));
        assert_eq!(statement.closing_balance, dec!(100));
    }

    #[test]
    fn test_no_lower_bound_means_zero_opening() {
        let account = Uuid::new_v4();
        let entries = vec![
            entry("2024-01-01", RecordKind::Receipt, dec!(100), Some(account)),
            entry("2024-02-01", RecordKind::Payment, dec!(25), Some(account)),
        ];

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &entries,
            &DateWindow {
                from: None,
                to: Some(d("2024-01-31")),
            },
        );

        assert_eq!(statement.opening_balance, dec!(0));
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.closing_balance, dec!(100));
    }

    #[test]
    fn test_cash_customer_sentinel() {
        let account = Uuid::new_v4();
        let mut cash_sale = entry("2024-01-02", RecordKind::Receipt, dec!(450), None);
        cash_sale.category = Some(MILK_SALE_CATEGORY.to_string());

        let mut account_sale = entry("2024-01-03", RecordKind::MilkSale, dec!(900), Some(account));
        account_sale.category = Some(MILK_SALE_CATEGORY.to_string());

        let unrelated = entry("2024-01-04", RecordKind::Expense, dec!(100), None);

        let entries = vec![cash_sale, account_sale, unrelated];
        let statement = compute_statement(
            &AccountSelector::CashCustomer,
            &entries,
            &DateWindow::unbounded(),
        );

        // Both milk sale kinds match the sentinel, the plain expense does not.
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.rows[0].credit, dec!(450));
        assert_eq!(statement.rows[1].debit, dec!(900));
        assert_eq!(statement.closing_balance, dec!(-450));
    }

    #[test]
    fn test_same_day_records_keep_input_order() {
        let account = Uuid::new_v4();
        let first = entry("2024-01-01", RecordKind::Receipt, dec!(10), Some(account));
        let second = entry("2024-01-01", RecordKind::Payment, dec!(5), Some(account));
        let first_id = first.id;
        let second_id = second.id;

        let statement = compute_statement(
            &AccountSelector::Account(account),
            &[first, second],
            &DateWindow::unbounded(),
        );
        assert_eq!(statement.rows[0].id, first_id);
        assert_eq!(statement.rows[1].id, second_id);
    }

    // ========================================================================
    // Property tests
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn kind_strategy() -> impl Strategy<Value = RecordKind> {
        prop_oneof![
            Just(RecordKind::Receipt),
            Just(RecordKind::Payment),
            Just(RecordKind::Expense),
            Just(RecordKind::BankRecord),
        ]
    }

    fn day_strategy() -> impl Strategy<Value = NaiveDate> {
        (0u64..400).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset)
        })
    }

    prop_compose! {
        fn entry_strategy(account: Uuid)(
            date in day_strategy(),
            kind in kind_strategy(),
            amount in amount_strategy(),
        ) -> LedgerEntry {
            entry("2024-01-01", kind, amount, Some(account)).with_date(date)
        }
    }

    impl LedgerEntry {
        fn with_date(mut self, date: NaiveDate) -> Self {
            self.date = date;
            self
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Each row's balance equals the previous balance plus its signed
        /// amount, starting from the opening balance.
        #[test]
        fn prop_running_balance_consistency(
            entries in prop::collection::vec(entry_strategy(Uuid::nil()), 0..30),
        ) {
            let statement = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &DateWindow::unbounded(),
            );

            let mut previous = statement.opening_balance;
            for row in &statement.rows {
                prop_assert_eq!(row.balance, previous + row.credit - row.debit);
                previous = row.balance;
            }
            prop_assert_eq!(statement.closing_balance, previous);
        }

        /// Opening balance plus all windowed rows equals the closing balance.
        #[test]
        fn prop_closing_is_opening_plus_window_sum(
            entries in prop::collection::vec(entry_strategy(Uuid::nil()), 0..30),
            from in day_strategy(),
            span in 0u64..120,
        ) {
            let window = DateWindow::new(from, from + chrono::Days::new(span));
            let statement = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &window,
            );

            let window_sum: Decimal = statement
                .rows
                .iter()
                .map(|r| r.credit - r.debit)
                .sum();
            prop_assert_eq!(
                statement.closing_balance,
                statement.opening_balance + window_sum
            );
        }

        /// The opening balance equals the signed sum of every matching
        /// record strictly before the window start.
        #[test]
        fn prop_opening_balance_matches_prefix(
            entries in prop::collection::vec(entry_strategy(Uuid::nil()), 0..30),
            from in day_strategy(),
        ) {
            let windowed = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &DateWindow { from: Some(from), to: None },
            );

            let before: Decimal = entries
                .iter()
                .filter(|e| e.date < from)
                .map(LedgerEntry::signed_amount)
                .sum();
            prop_assert_eq!(windowed.opening_balance, before);
        }

        /// Rows are sorted by date.
        #[test]
        fn prop_rows_sorted(
            entries in prop::collection::vec(entry_strategy(Uuid::nil()), 0..30),
        ) {
            let statement = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &DateWindow::unbounded(),
            );
            for pair in statement.rows.windows(2) {
                prop_assert!(pair[0].date <= pair[1].date);
            }
        }

        /// Computing the same statement twice gives identical results.
        #[test]
        fn prop_statement_deterministic(
            entries in prop::collection::vec(entry_strategy(Uuid::nil()), 0..20),
        ) {
            let a = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &DateWindow::unbounded(),
            );
            let b = compute_statement(
                &AccountSelector::Account(Uuid::nil()),
                &entries,
                &DateWindow::unbounded(),
            );
            prop_assert_eq!(a.closing_balance, b.closing_balance);
            prop_assert_eq!(a.rows.len(), b.rows.len());
        }
    }
}
