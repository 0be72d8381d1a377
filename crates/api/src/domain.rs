//! Maps `SeaORM` entity models to the domain values the core engines
//! consume.
//!
//! Stored enum strings are constrained by schema CHECKs, so rows that fail
//! to parse are dropped rather than surfaced as errors.

use gaurakshak_core::herd::{Animal, Gender, HealthStatus, Movement, MovementKind};
use gaurakshak_core::ledger::{LedgerEntry, RecordKind};
use gaurakshak_db::entities::{animals, financial_records, movements};

/// Converts a financial record row into a ledger engine entry.
#[must_use]
pub fn ledger_entry(model: &financial_records::Model) -> Option<LedgerEntry> {
    Some(LedgerEntry {
        id: model.id,
        date: model.date,
        kind: RecordKind::parse(&model.record_type)?,
        category: model.category.clone(),
        amount: model.amount,
        description: model.description.clone(),
        account_id: model.account_id,
        quantity: model.quantity,
        rate: model.rate,
        invoice_no: model.invoice_no.clone(),
    })
}

/// Converts an animal row into the herd domain value.
#[must_use]
pub fn animal(model: &animals::Model) -> Option<Animal> {
    Some(Animal {
        id: model.id,
        species: model.species.clone(),
        govt_tag_no: model.govt_tag_no.clone(),
        breed: model.breed.clone(),
        color: model.color.clone(),
        gender: Gender::parse(&model.gender)?,
        year_of_birth: model.year_of_birth,
        health_status: HealthStatus::parse(&model.health_status)?,
        tag_color: model.tag_color.clone(),
        identification_mark: model.identification_mark.clone(),
        image_url: model.image_url.clone(),
    })
}

/// Converts a movement row into the herd domain value.
#[must_use]
pub fn movement(model: &movements::Model) -> Option<Movement> {
    Some(Movement {
        id: model.id,
        animal_id: model.animal_id,
        kind: MovementKind::parse(&model.kind)?,
        date: model.date,
        reason: model.reason.clone(),
    })
}

/// Maps a slice of rows, dropping any that fail to parse.
pub fn map_all<'a, M, T>(rows: &'a [M], f: impl Fn(&'a M) -> Option<T>) -> Vec<T> {
    rows.iter().filter_map(f).collect()
}
