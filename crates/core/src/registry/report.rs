//! Registry report derivations.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::herd::{Animal, Movement, MovementKind};

use super::types::{DetailedRow, MovementHistoryRow, RegistryFilter};

/// Filters the registry by species, breed, color, health, and age bucket.
///
/// Ages are evaluated against `today`.
#[must_use]
pub fn filter_registry<'a>(
    animals: &'a [Animal],
    filter: &RegistryFilter,
    today: NaiveDate,
) -> Vec<&'a Animal> {
    animals
        .iter()
        .filter(|a| {
            filter.species.as_deref().is_none_or(|s| a.species == s)
                && filter.breed.as_deref().is_none_or(|b| a.breed == b)
                && filter.color.as_deref().is_none_or(|c| a.color == c)
                && filter
                    .health_status
                    .as_deref()
                    .is_none_or(|h| a.health_status.as_str() == h)
                && filter.age.is_none_or(|bucket| bucket.contains(a.age_at(today)))
        })
        .collect()
}

/// Movement history with each animal's tag resolved, optionally filtered by
/// direction and by a case-insensitive search over reason and tag.
#[must_use]
pub fn movement_history(
    animals: &[Animal],
    movements: &[Movement],
    kind_filter: Option<MovementKind>,
    search: Option<&str>,
) -> Vec<MovementHistoryRow> {
    let tags: HashMap<Uuid, &str> = animals
        .iter()
        .map(|a| (a.id, a.govt_tag_no.as_str()))
        .collect();
    let needle = search.map(str::to_lowercase);

    movements
        .iter()
        .map(|m| MovementHistoryRow {
            id: m.id,
            animal_id: m.animal_id,
            govt_tag_no: tags
                .get(&m.animal_id)
                .map_or_else(|| "Unknown Tag".to_string(), ToString::to_string),
            kind: m.kind,
            date: m.date,
            reason: m.reason.clone(),
        })
        .filter(|row| kind_filter.is_none_or(|k| row.kind == k))
        .filter(|row| {
            needle.as_deref().is_none_or(|n| {
                row.reason.to_lowercase().contains(n) || row.govt_tag_no.to_lowercase().contains(n)
            })
        })
        .collect()
}

/// The detailed report: every animal with at least one movement, its
/// earliest entry, latest exit, and current age.
#[must_use]
pub fn detailed_report(
    animals: &[Animal],
    movements: &[Movement],
    today: NaiveDate,
) -> Vec<DetailedRow> {
    let mut earliest_entry: HashMap<Uuid, &Movement> = HashMap::new();
    let mut latest_exit: HashMap<Uuid, &Movement> = HashMap::new();
    let mut moved: HashSet<Uuid> = HashSet::new();

    for m in movements {
        moved.insert(m.animal_id);
        match m.kind {
            MovementKind::Entry => {
                earliest_entry
                    .entry(m.animal_id)
                    .and_modify(|e| {
                        if m.date < e.date {
                            *e = m;
                        }
                    })
                    .or_insert(m);
            }
            MovementKind::Exit => {
                latest_exit
                    .entry(m.animal_id)
                    .and_modify(|e| {
                        if m.date > e.date {
                            *e = m;
                        }
                    })
                    .or_insert(m);
            }
        }
    }

    animals
        .iter()
        .filter(|a| moved.contains(&a.id))
        .map(|a| DetailedRow {
            animal: a.clone(),
            age: a.age_at(today),
            check_in_date: earliest_entry.get(&a.id).map(|m| m.date),
            check_out_date: latest_exit.get(&a.id).map(|m| m.date),
            check_out_reason: latest_exit.get(&a.id).map(|m| m.reason.clone()),
        })
        .collect()
}

/// The animal's latest movement direction, if it has any movements.
///
/// Same-day movements resolve to the later one in log order. This is the
/// presence gate for new movements: an entry is only valid when the current
/// state is not `Entry`, an exit only when it is.
#[must_use]
pub fn current_state(movements: &[Movement], animal_id: Uuid) -> Option<MovementKind> {
    let mut own: Vec<&Movement> = movements
        .iter()
        .filter(|m| m.animal_id == animal_id)
        .collect();
    own.sort_by_key(|m| m.date);
    own.last().map(|m| m.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herd::{Gender, HealthStatus};
    use crate::registry::types::AgeBucket;
    use rstest::rstest;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn animal(species: &str, breed: &str, gender: Gender, year_of_birth: i32) -> Animal {
        Animal {
            id: Uuid::new_v4(),
            species: species.to_string(),
            govt_tag_no: format!("TAG-{year_of_birth}"),
            breed: breed.to_string(),
            color: "Brown".to_string(),
            gender,
            year_of_birth,
            health_status: HealthStatus::Healthy,
            tag_color: "Yellow".to_string(),
            identification_mark: None,
            image_url: None,
        }
    }

    fn movement(animal_id: Uuid, kind: MovementKind, date: &str, reason: &str) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            animal_id,
            kind,
            date: d(date),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_registry_filters_combine() {
        let animals = [
            animal("Cow", "Gir", Gender::Female, 2020),
            animal("Cow", "Sahiwal", Gender::Female, 2020),
            animal("Buffalo", "Murrah", Gender::Male, 2012),
        ];

        let all = filter_registry(&animals, &RegistryFilter::default(), d("2024-06-01"));
        assert_eq!(all.len(), 3);

        let gir = filter_registry(
            &animals,
            &RegistryFilter {
                species: Some("Cow".to_string()),
                breed: Some("Gir".to_string()),
                ..Default::default()
            },
            d("2024-06-01"),
        );
        assert_eq!(gir.len(), 1);
        assert_eq!(gir[0].breed, "Gir");

        let old = filter_registry(
            &animals,
            &RegistryFilter {
                age: Some(AgeBucket::OverTen),
                ..Default::default()
            },
            d("2024-06-01"),
        );
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].species, "Buffalo");
    }

    #[rstest]
    #[case(AgeBucket::UpToTwo, 2023)]
    #[case(AgeBucket::ThreeToFive, 2020)]
    #[case(AgeBucket::SixToTen, 2016)]
    #[case(AgeBucket::OverTen, 2012)]
    fn test_registry_age_buckets_partition_the_herd(
        #[case] bucket: AgeBucket,
        #[case] year_of_birth: i32,
    ) {
        let animals = [
            animal("Cow", "Gir", Gender::Female, 2023),
            animal("Cow", "Gir", Gender::Female, 2020),
            animal("Cow", "Gir", Gender::Male, 2016),
            animal("Buffalo", "Murrah", Gender::Male, 2012),
        ];

        let rows = filter_registry(
            &animals,
            &RegistryFilter {
                age: Some(bucket),
                ..Default::default()
            },
            d("2024-06-01"),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year_of_birth, year_of_birth);
    }

    #[test]
    fn test_movement_history_search_and_filter() {
        let a = animal("Cow", "Gir", Gender::Female, 2020);
        let movements = [
            movement(a.id, MovementKind::Entry, "2024-01-01", "Rescued from road"),
            movement(a.id, MovementKind::Exit, "2024-02-01", "Adopted"),
            movement(Uuid::new_v4(), MovementKind::Entry, "2024-01-05", "donated"),
        ];

        let rows = movement_history(std::slice::from_ref(&a), &movements, None, None);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].govt_tag_no, "Unknown Tag");

        let exits = movement_history(
            std::slice::from_ref(&a),
            &movements,
            Some(MovementKind::Exit),
            None,
        );
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].reason, "Adopted");

        let searched =
            movement_history(std::slice::from_ref(&a), &movements, None, Some("rescued"));
        assert_eq!(searched.len(), 1);

        let by_tag = movement_history(std::slice::from_ref(&a), &movements, None, Some("tag-2020"));
        assert_eq!(by_tag.len(), 2);
    }

    #[test]
    fn test_detailed_report_stay_boundaries() {
        let a = animal("Cow", "Gir", Gender::Female, 2019);
        let never_moved = animal("Cow", "Gir", Gender::Male, 2021);
        let movements = [
            movement(a.id, MovementKind::Entry, "2023-05-01", "rescued"),
            movement(a.id, MovementKind::Exit, "2023-08-01", "treatment"),
            movement(a.id, MovementKind::Entry, "2023-09-01", "returned"),
            movement(a.id, MovementKind::Exit, "2024-02-01", "adopted"),
        ];

        let rows = detailed_report(&[a.clone(), never_moved], &movements, d("2024-06-01"));
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.animal.id, a.id);
        assert_eq!(row.age, 5);
        assert_eq!(row.check_in_date, Some(d("2023-05-01")));
        assert_eq!(row.check_out_date, Some(d("2024-02-01")));
        assert_eq!(row.check_out_reason.as_deref(), Some("adopted"));
    }

    #[test]
    fn test_current_state_gate() {
        let id = Uuid::new_v4();
        assert_eq!(current_state(&[], id), None);

        let log = [
            movement(id, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(id, MovementKind::Exit, "2024-03-01", "adopted"),
        ];
        assert_eq!(current_state(&log, id), Some(MovementKind::Exit));

        let back = [
            movement(id, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(id, MovementKind::Exit, "2024-03-01", "adopted"),
            movement(id, MovementKind::Entry, "2024-04-01", "returned"),
        ];
        assert_eq!(current_state(&back, id), Some(MovementKind::Entry));
    }

    #[test]
    fn test_current_state_same_day_uses_log_order() {
        let id = Uuid::new_v4();
        let log = [
            movement(id, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(id, MovementKind::Exit, "2024-01-01", "transferred"),
        ];
        assert_eq!(current_state(&log, id), Some(MovementKind::Exit));
    }
}
