//! Tabular report shaping and CSV serialization.
//!
//! Every report download shares one shape: a header row plus string cells.
//! The API layer streams the CSV bytes as an attachment.

use chrono::NaiveDate;
use csv::WriterBuilder;
use thiserror::Error;

use crate::herd::{Animal, CrossTabReport, DailyRow, FlowSlice, GenderSummary};
use crate::ledger::LedgerStatement;
use crate::registry::{DetailedRow, MovementHistoryRow};

/// Day format used in report downloads.
const EXPORT_DATE_FMT: &str = "%d-%m-%Y";

/// Errors from CSV serialization.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// The writer produced invalid UTF-8 (should not happen).
    #[error("csv output was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A report shaped for download: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows; every row has one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Serializes the table as CSV text.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn fmt_day(day: NaiveDate) -> String {
    day.format(EXPORT_DATE_FMT).to_string()
}

/// Shapes a ledger statement, leading with an opening balance row.
#[must_use]
pub fn ledger_table(statement: &LedgerStatement) -> Table {
    let headers = vec![
        "Date".to_string(),
        "Type".to_string(),
        "Description".to_string(),
        "Debit".to_string(),
        "Credit".to_string(),
        "Balance".to_string(),
    ];

    let mut rows = vec![vec![
        String::new(),
        String::new(),
        "Opening Balance".to_string(),
        String::new(),
        String::new(),
        statement.opening_balance.to_string(),
    ]];
    rows.extend(statement.rows.iter().map(|row| {
        vec![
            fmt_day(row.date),
            row.kind.as_str().to_string(),
            row.description.clone(),
            row.debit.to_string(),
            row.credit.to_string(),
            row.balance.to_string(),
        ]
    }));
    rows.push(vec![
        String::new(),
        String::new(),
        "Closing Balance".to_string(),
        String::new(),
        String::new(),
        statement.closing_balance.to_string(),
    ]);

    Table { headers, rows }
}

/// Shapes the daily headcount summary.
#[must_use]
pub fn daily_summary_table(rows: &[DailyRow]) -> Table {
    let headers = [
        "Date",
        "Opening Male",
        "Opening Female",
        "Opening 0-3 Yr",
        "Opening >3 Yr",
        "In Male",
        "In Female",
        "In 0-3 Yr",
        "In >3 Yr",
        "In Reasons",
        "Out Male",
        "Out Female",
        "Out 0-3 Yr",
        "Out >3 Yr",
        "Out Reasons",
        "Closing Male",
        "Closing Female",
        "Closing 0-3 Yr",
        "Closing >3 Yr",
    ]
    .map(String::from)
    .to_vec();

    let rows = rows
        .iter()
        .map(|r| {
            vec![
                fmt_day(r.date),
                r.opening.male.to_string(),
                r.opening.female.to_string(),
                r.opening.young.to_string(),
                r.opening.adult.to_string(),
                r.inflow.male.to_string(),
                r.inflow.female.to_string(),
                r.inflow.young.to_string(),
                r.inflow.adult.to_string(),
                r.in_reasons.clone(),
                r.outflow.male.to_string(),
                r.outflow.female.to_string(),
                r.outflow.young.to_string(),
                r.outflow.adult.to_string(),
                r.out_reasons.clone(),
                r.closing.male.to_string(),
                r.closing.female.to_string(),
                r.closing.young.to_string(),
                r.closing.adult.to_string(),
            ]
        })
        .collect();

    Table { headers, rows }
}

fn reasons_cell(flow: &FlowSlice) -> String {
    flow.reasons.join(", ")
}

fn cross_tab_row(label: &str, summary: &GenderSummary) -> Vec<String> {
    vec![
        label.to_string(),
        summary.opening.young.to_string(),
        summary.opening.adult.to_string(),
        summary.opening.total.to_string(),
        summary.inflow.young.to_string(),
        summary.inflow.adult.to_string(),
        summary.inflow.total.to_string(),
        reasons_cell(&summary.inflow),
        summary.outflow.young.to_string(),
        summary.outflow.adult.to_string(),
        summary.outflow.total.to_string(),
        reasons_cell(&summary.outflow),
        summary.closing.young.to_string(),
        summary.closing.adult.to_string(),
        summary.closing.total.to_string(),
    ]
}

/// Shapes the cross-tab report as three rows: male, female, total.
#[must_use]
pub fn cross_tab_table(report: &CrossTabReport) -> Table {
    let headers = [
        "Gender",
        "Opening 0-3 Yr",
        "Opening >3 Yr",
        "Opening Total",
        "In 0-3 Yr",
        "In >3 Yr",
        "In Total",
        "In Reasons",
        "Out 0-3 Yr",
        "Out >3 Yr",
        "Out Total",
        "Out Reasons",
        "Closing 0-3 Yr",
        "Closing >3 Yr",
        "Closing Total",
    ]
    .map(String::from)
    .to_vec();

    let rows = vec![
        cross_tab_row("Male", &report.male),
        cross_tab_row("Female", &report.female),
        cross_tab_row("Total", &report.total),
    ];

    Table { headers, rows }
}

/// Shapes the filtered animal registry.
#[must_use]
pub fn registry_table(animals: &[&Animal], today: NaiveDate) -> Table {
    let headers = [
        "Tag No",
        "Type",
        "Breed",
        "Color",
        "Gender",
        "Age",
        "Year of Birth",
        "Health Status",
        "Tag Color",
        "Identification Mark",
    ]
    .map(String::from)
    .to_vec();

    let rows = animals
        .iter()
        .map(|a| {
            vec![
                a.govt_tag_no.clone(),
                a.species.clone(),
                a.breed.clone(),
                a.color.clone(),
                a.gender.as_str().to_string(),
                a.age_at(today).to_string(),
                a.year_of_birth.to_string(),
                a.health_status.as_str().to_string(),
                a.tag_color.clone(),
                a.identification_mark.clone().unwrap_or_default(),
            ]
        })
        .collect();

    Table { headers, rows }
}

/// Shapes the movement history report.
#[must_use]
pub fn movements_table(rows: &[MovementHistoryRow]) -> Table {
    let headers = ["Date", "Animal Tag", "Type", "Reason"]
        .map(String::from)
        .to_vec();

    let rows = rows
        .iter()
        .map(|r| {
            vec![
                fmt_day(r.date),
                r.govt_tag_no.clone(),
                r.kind.as_str().to_string(),
                r.reason.clone(),
            ]
        })
        .collect();

    Table { headers, rows }
}

/// Shapes the detailed stay report.
#[must_use]
pub fn detailed_table(rows: &[DetailedRow]) -> Table {
    let headers = [
        "S.N.",
        "Check In Date",
        "Tag No",
        "Tag Color",
        "Breed",
        "Age",
        "Male/Female",
        "Color",
        "Identification Mark",
        "Health Status",
        "Check Out Date",
        "Check Out Reason",
    ]
    .map(String::from)
    .to_vec();

    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.check_in_date.map(fmt_day).unwrap_or_default(),
                r.animal.govt_tag_no.clone(),
                r.animal.tag_color.clone(),
                r.animal.breed.clone(),
                r.age.to_string(),
                r.animal.gender.as_str().to_string(),
                r.animal.color.clone(),
                r.animal.identification_mark.clone().unwrap_or_default(),
                r.animal.health_status.as_str().to_string(),
                r.check_out_date.map(fmt_day).unwrap_or_default(),
                r.check_out_reason.clone().unwrap_or_default(),
            ]
        })
        .collect();

    Table { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herd::{CohortTally, Gender, HealthStatus};
    use crate::ledger::{LedgerRow, RecordKind};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_table_to_csv() {
        let table = Table {
            headers: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec!["1".to_string(), "with, comma".to_string()]],
        };
        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "a,b\n1,\"with, comma\"\n");
    }

    #[test]
    fn test_table_to_csv_headers_only() {
        let table = Table {
            headers: vec!["Date".to_string(), "Reason".to_string()],
            rows: Vec::new(),
        };
        assert_eq!(table.to_csv().unwrap(), "Date,Reason\n");
    }

    #[test]
    fn test_ledger_table_wraps_with_balances() {
        let statement = LedgerStatement {
            rows: vec![LedgerRow {
                id: Uuid::new_v4(),
                date: d("2024-01-05"),
                kind: RecordKind::Receipt,
                description: "Donation".to_string(),
                debit: dec!(0),
                credit: dec!(500),
                balance: dec!(600),
            }],
            opening_balance: dec!(100),
            closing_balance: dec!(600),
        };

        let table = ledger_table(&statement);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][2], "Opening Balance");
        assert_eq!(table.rows[0][5], "100");
        assert_eq!(table.rows[1][0], "05-01-2024");
        assert_eq!(table.rows[2][2], "Closing Balance");
        assert_eq!(table.rows[2][5], "600");
    }

    #[test]
    fn test_daily_summary_table_shape() {
        let row = DailyRow {
            date: d("2024-03-01"),
            opening: CohortTally {
                male: 1,
                female: 2,
                young: 1,
                adult: 2,
            },
            inflow: CohortTally::default(),
            in_reasons: String::new(),
            outflow: CohortTally::default(),
            out_reasons: String::new(),
            closing: CohortTally {
                male: 1,
                female: 2,
                young: 1,
                adult: 2,
            },
        };

        let table = daily_summary_table(&[row]);
        assert_eq!(table.headers.len(), 19);
        assert_eq!(table.rows[0].len(), 19);
        assert_eq!(table.rows[0][0], "01-03-2024");
    }

    #[test]
    fn test_registry_table() {
        let animal = Animal {
            id: Uuid::new_v4(),
            species: "Cow".to_string(),
            govt_tag_no: "T-9".to_string(),
            breed: "Gir".to_string(),
            color: "White".to_string(),
            gender: Gender::Female,
            year_of_birth: 2020,
            health_status: HealthStatus::UnderTreatment,
            tag_color: "Green".to_string(),
            identification_mark: Some("star on forehead".to_string()),
            image_url: None,
        };

        let table = registry_table(&[&animal], d("2024-06-01"));
        assert_eq!(table.rows[0][0], "T-9");
        assert_eq!(table.rows[0][5], "4");
        assert_eq!(table.rows[0][7], "Under Treatment");
    }

    #[test]
    fn test_cross_tab_table_has_three_rows() {
        let table = cross_tab_table(&CrossTabReport::default());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "Male");
        assert_eq!(table.rows[2][0], "Total");
    }
}
