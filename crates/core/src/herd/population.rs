//! Population reconstruction from the movement log.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::window::DateWindow;

use super::types::{
    Animal, CohortSlice, CohortTally, CrossTabReport, DailyRow, FlowSlice, Gender, GenderSummary,
    Movement, MovementKind,
};

/// Whether an animal is present at the start of `cutoff`.
///
/// `movements` must be this animal's movements sorted by date. The animal is
/// present iff the latest movement strictly before the cutoff is an entry.
#[must_use]
pub fn is_present_as_of(movements: &[&Movement], cutoff: NaiveDate) -> bool {
    movements
        .iter()
        .filter(|m| m.date < cutoff)
        .next_back()
        .is_some_and(|m| m.kind == MovementKind::Entry)
}

fn sorted_by_date(movements: &[Movement]) -> Vec<&Movement> {
    let mut sorted: Vec<&Movement> = movements.iter().collect();
    sorted.sort_by_key(|m| m.date);
    sorted
}

fn selected_animals<'a>(animals: &'a [Animal], species_filter: Option<&str>) -> Vec<&'a Animal> {
    animals
        .iter()
        .filter(|a| species_filter.is_none_or(|species| a.species == species))
        .collect()
}

fn opening_tally(
    animals: &[&Animal],
    sorted_movements: &[&Movement],
    start: NaiveDate,
) -> CohortTally {
    let mut tally = CohortTally::default();
    for animal in animals {
        let own: Vec<&Movement> = sorted_movements
            .iter()
            .filter(|m| m.animal_id == animal.id)
            .copied()
            .collect();
        if is_present_as_of(&own, start) {
            tally.add(animal.gender, animal.is_young_at(start));
        }
    }
    tally
}

/// Daily headcount summary over an inclusive date range.
///
/// Requires a lower bound; without one the result is empty. A missing upper
/// bound collapses the range to the single start day. Day N's closing tally
/// is day N+1's opening tally.
#[must_use]
pub fn daily_summary(
    animals: &[Animal],
    movements: &[Movement],
    species_filter: Option<&str>,
    window: &DateWindow,
) -> Vec<DailyRow> {
    let Some(start) = window.from else {
        return Vec::new();
    };
    let end = window.to.unwrap_or(start);
    if end < start {
        return Vec::new();
    }

    let selected = selected_animals(animals, species_filter);
    let selected_ids: HashSet<Uuid> = selected.iter().map(|a| a.id).collect();
    let animal_map: HashMap<Uuid, &Animal> = selected.iter().map(|a| (a.id, *a)).collect();
    let sorted = sorted_by_date(movements);

    let mut opening = opening_tally(&selected, &sorted, start);

    let mut rows = Vec::new();
    let mut day = start;
    while day <= end {
        let mut inflow = CohortTally::default();
        let mut in_reasons = Vec::new();
        let mut outflow = CohortTally::default();
        let mut out_reasons = Vec::new();

        for movement in sorted
            .iter()
            .filter(|m| m.date == day && selected_ids.contains(&m.animal_id))
        {
            let Some(animal) = animal_map.get(&movement.animal_id) else {
                continue;
            };
            let (tally, reasons) = match movement.kind {
                MovementKind::Entry => (&mut inflow, &mut in_reasons),
                MovementKind::Exit => (&mut outflow, &mut out_reasons),
            };
            tally.add(animal.gender, animal.is_young_at(day));
            if !movement.reason.is_empty() {
                reasons.push(movement.reason.clone());
            }
        }

        let closing = opening.roll_forward(&inflow, &outflow);
        rows.push(DailyRow {
            date: day,
            opening,
            inflow,
            in_reasons: in_reasons.join(", "),
            outflow,
            out_reasons: out_reasons.join(", "),
            closing,
        });

        opening = closing;
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        day = next;
    }

    rows
}

fn slice_add(slice: &mut CohortSlice, young: bool) {
    if young {
        slice.young += 1;
    } else {
        slice.adult += 1;
    }
    slice.total += 1;
}

fn flow_add(flow: &mut FlowSlice, young: bool, reason: &str) {
    if young {
        flow.young += 1;
    } else {
        flow.adult += 1;
    }
    flow.total += 1;
    if !reason.is_empty() {
        flow.reasons.push(reason.to_string());
    }
}

fn close_summary(summary: &mut GenderSummary) {
    summary.closing.young = summary.opening.young + summary.inflow.young - summary.outflow.young;
    summary.closing.adult = summary.opening.adult + summary.inflow.adult - summary.outflow.adult;
    summary.closing.total = summary.opening.total + summary.inflow.total - summary.outflow.total;
}

fn sum_slices(a: &CohortSlice, b: &CohortSlice) -> CohortSlice {
    CohortSlice {
        young: a.young + b.young,
        adult: a.adult + b.adult,
        total: a.total + b.total,
    }
}

fn sum_flows(a: &FlowSlice, b: &FlowSlice) -> FlowSlice {
    let mut reasons = a.reasons.clone();
    reasons.extend(b.reasons.iter().cloned());
    FlowSlice {
        young: a.young + b.young,
        adult: a.adult + b.adult,
        total: a.total + b.total,
        reasons,
    }
}

/// Single cross-tab aggregate of the whole range, split gender by cohort.
///
/// Opening cohorts use the range start's year; each movement's cohort uses
/// the movement date's year. Requires a lower bound.
#[must_use]
pub fn cross_tab_summary(
    animals: &[Animal],
    movements: &[Movement],
    species_filter: Option<&str>,
    window: &DateWindow,
) -> Option<CrossTabReport> {
    let start = window.from?;
    let end = window.to.unwrap_or(start);

    let selected = selected_animals(animals, species_filter);
    let animal_map: HashMap<Uuid, &Animal> = selected.iter().map(|a| (a.id, *a)).collect();
    let sorted = sorted_by_date(movements);

    let mut report = CrossTabReport::default();

    for animal in &selected {
        let own: Vec<&Movement> = sorted
            .iter()
            .filter(|m| m.animal_id == animal.id)
            .copied()
            .collect();
        if is_present_as_of(&own, start) {
            let summary = match animal.gender {
                Gender::Male => &mut report.male,
                Gender::Female => &mut report.female,
            };
            slice_add(&mut summary.opening, animal.is_young_at(start));
        }
    }

    for movement in sorted
        .iter()
        .filter(|m| m.date >= start && m.date <= end && animal_map.contains_key(&m.animal_id))
    {
        let Some(animal) = animal_map.get(&movement.animal_id) else {
            continue;
        };
        let summary = match animal.gender {
            Gender::Male => &mut report.male,
            Gender::Female => &mut report.female,
        };
        let flow = match movement.kind {
            MovementKind::Entry => &mut summary.inflow,
            MovementKind::Exit => &mut summary.outflow,
        };
        flow_add(flow, animal.is_young_at(movement.date), &movement.reason);
    }

    close_summary(&mut report.male);
    close_summary(&mut report.female);

    report.total.opening = sum_slices(&report.male.opening, &report.female.opening);
    report.total.inflow = sum_flows(&report.male.inflow, &report.female.inflow);
    report.total.outflow = sum_flows(&report.male.outflow, &report.female.outflow);
    report.total.closing = sum_slices(&report.male.closing, &report.female.closing);

    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herd::types::HealthStatus;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn animal(id: Uuid, gender: Gender, year_of_birth: i32, species: &str) -> Animal {
        Animal {
            id,
            species: species.to_string(),
            govt_tag_no: format!("T-{id}"),
            breed: "Gir".to_string(),
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
    fn test_presence_as_of() {
        let id = Uuid::new_v4();
        let log = [
            movement(id, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(id, MovementKind::Exit, "2024-02-01", "adopted"),
        ];
        let refs: Vec<&Movement> = log.iter().collect();

        // A movement on the cutoff day itself does not count.
        assert!(!is_present_as_of(&refs, d("2024-01-01")));
        assert!(is_present_as_of(&refs, d("2024-01-02")));
        assert!(is_present_as_of(&refs, d("2024-02-01")));
        assert!(!is_present_as_of(&refs, d("2024-02-02")));
        assert!(!is_present_as_of(&[], d("2024-02-02")));
    }

    #[test]
    fn test_daily_summary_carry_forward() {
        let id = Uuid::new_v4();
        let animals = [animal(id, Gender::Male, 2020, "Cow")];
        let movements = [movement(id, MovementKind::Entry, "2024-01-01", "rescued")];

        let rows = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow::new(d("2024-01-02"), d("2024-01-03")),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].opening.male, 1);
        assert_eq!(rows[0].inflow, CohortTally::default());
        assert_eq!(rows[0].outflow, CohortTally::default());
        assert_eq!(rows[0].closing.male, 1);
        assert_eq!(rows[1].opening, rows[0].closing);
    }

    #[test]
    fn test_daily_summary_requires_lower_bound() {
        let id = Uuid::new_v4();
        let animals = [animal(id, Gender::Male, 2020, "Cow")];
        let movements = [movement(id, MovementKind::Entry, "2024-01-01", "rescued")];

        let rows = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow {
                from: None,
                to: Some(d("2024-01-03")),
            },
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_daily_summary_single_day_default() {
        let id = Uuid::new_v4();
        let animals = [animal(id, Gender::Female, 2023, "Cow")];
        let movements = [movement(id, MovementKind::Entry, "2024-05-10", "born here")];

        let rows = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow {
                from: Some(d("2024-05-10")),
                to: None,
            },
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].opening.female, 0);
        assert_eq!(rows[0].inflow.female, 1);
        assert_eq!(rows[0].inflow.young, 1);
        assert_eq!(rows[0].in_reasons, "born here");
        assert_eq!(rows[0].closing.female, 1);
    }

    #[test]
    fn test_daily_summary_species_filter() {
        let cow = Uuid::new_v4();
        let buffalo = Uuid::new_v4();
        let animals = [
            animal(cow, Gender::Female, 2019, "Cow"),
            animal(buffalo, Gender::Female, 2019, "Buffalo"),
        ];
        let movements = [
            movement(cow, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(buffalo, MovementKind::Entry, "2024-01-01", "rescued"),
        ];

        let rows = daily_summary(
            &animals,
            &movements,
            Some("Cow"),
            &DateWindow::new(d("2024-01-02"), d("2024-01-02")),
        );
        assert_eq!(rows[0].opening.female, 1);
    }

    #[test]
    fn test_daily_summary_reasons_joined() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let animals = [
            animal(a, Gender::Male, 2022, "Cow"),
            animal(b, Gender::Female, 2015, "Cow"),
        ];
        let movements = [
            movement(a, MovementKind::Entry, "2024-03-01", "rescued"),
            movement(b, MovementKind::Entry, "2024-03-01", "donated"),
        ];

        let rows = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow::new(d("2024-03-01"), d("2024-03-01")),
        );
        assert_eq!(rows[0].in_reasons, "rescued, donated");
        assert_eq!(rows[0].inflow.young, 1);
        assert_eq!(rows[0].inflow.adult, 1);
    }

    #[test]
    fn test_cohort_drift_across_year_boundary() {
        // Born 2021: age 3 (young) during 2024, age 4 (adult) during 2025.
        let id = Uuid::new_v4();
        let animals = [animal(id, Gender::Female, 2021, "Cow")];
        let movements = [movement(id, MovementKind::Entry, "2024-06-01", "rescued")];

        let december = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow::new(d("2024-12-31"), d("2024-12-31")),
        );
        assert_eq!(december[0].opening.young, 1);
        assert_eq!(december[0].opening.adult, 0);

        let january = daily_summary(
            &animals,
            &movements,
            None,
            &DateWindow::new(d("2025-01-01"), d("2025-01-01")),
        );
        assert_eq!(january[0].opening.young, 0);
        assert_eq!(january[0].opening.adult, 1);
    }

    #[test]
    fn test_cross_tab_summary() {
        let bull = Uuid::new_v4();
        let cow = Uuid::new_v4();
        let calf = Uuid::new_v4();
        let animals = [
            animal(bull, Gender::Male, 2018, "Cow"),
            animal(cow, Gender::Female, 2019, "Cow"),
            animal(calf, Gender::Female, 2024, "Cow"),
        ];
        let movements = [
            movement(bull, MovementKind::Entry, "2024-01-01", "rescued"),
            movement(cow, MovementKind::Entry, "2024-01-15", "donated"),
            movement(calf, MovementKind::Entry, "2024-03-02", "born here"),
            movement(cow, MovementKind::Exit, "2024-03-05", "returned to owner"),
        ];

        let report = cross_tab_summary(
            &animals,
            &movements,
            None,
            &DateWindow::new(d("2024-03-01"), d("2024-03-31")),
        )
        .unwrap();

        // Bull and cow present at the range start.
        assert_eq!(report.male.opening.total, 1);
        assert_eq!(report.female.opening.total, 1);
        assert_eq!(report.total.opening.total, 2);

        assert_eq!(report.female.inflow.total, 1);
        assert_eq!(report.female.inflow.young, 1);
        assert_eq!(report.female.outflow.total, 1);
        assert_eq!(report.female.outflow.reasons, vec!["returned to owner"]);

        assert_eq!(report.female.closing.total, 1);
        assert_eq!(report.male.closing.total, 1);
        assert_eq!(report.total.closing.total, 2);
        assert_eq!(report.total.inflow.reasons, vec!["born here"]);
    }

    #[test]
    fn test_cross_tab_requires_lower_bound() {
        assert!(cross_tab_summary(&[], &[], None, &DateWindow::unbounded()).is_none());
    }

    // ========================================================================
    // Property tests
    // ========================================================================

    fn gender_strategy() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female)]
    }

    fn day_strategy() -> impl Strategy<Value = NaiveDate> {
        (0u64..200).prop_map(|offset| d("2024-01-01") + Days::new(offset))
    }

    /// A herd of up to 8 animals, each with an alternating entry/exit log.
    fn herd_strategy() -> impl Strategy<Value = (Vec<Animal>, Vec<Movement>)> {
        prop::collection::vec(
            (
                gender_strategy(),
                2015i32..2025,
                prop::collection::vec(day_strategy(), 0..6),
            ),
            0..8,
        )
        .prop_map(|specs| {
            let mut animals = Vec::new();
            let mut movements = Vec::new();
            for (gender, year, mut days) in specs {
                let id = Uuid::new_v4();
                animals.push(animal(id, gender, year, "Cow"));
                days.sort_unstable();
                days.dedup();
                for (i, day) in days.iter().enumerate() {
                    let kind = if i % 2 == 0 {
                        MovementKind::Entry
                    } else {
                        MovementKind::Exit
                    };
                    movements.push(Movement {
                        id: Uuid::new_v4(),
                        animal_id: id,
                        kind,
                        date: *day,
                        reason: "moved".to_string(),
                    });
                }
            }
            (animals, movements)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Day N's closing tally equals day N+1's opening tally.
        #[test]
        fn prop_daily_carry_forward(
            (animals, movements) in herd_strategy(),
            start in day_strategy(),
            span in 0u64..20,
        ) {
            let rows = daily_summary(
                &animals,
                &movements,
                None,
                &DateWindow::new(start, start + Days::new(span)),
            );
            for pair in rows.windows(2) {
                prop_assert_eq!(pair[1].opening, pair[0].closing);
            }
        }

        /// Each row's closing equals opening + inflow - outflow per cell.
        #[test]
        fn prop_daily_roll_forward(
            (animals, movements) in herd_strategy(),
            start in day_strategy(),
            span in 0u64..20,
        ) {
            let rows = daily_summary(
                &animals,
                &movements,
                None,
                &DateWindow::new(start, start + Days::new(span)),
            );
            for row in &rows {
                prop_assert_eq!(row.closing, row.opening.roll_forward(&row.inflow, &row.outflow));
            }
        }

        /// With an alternating log, presence on consecutive days only changes
        /// when a movement happened the day before the later cutoff.
        #[test]
        fn prop_presence_changes_only_on_movement(
            (animals, movements) in herd_strategy(),
            cutoff in day_strategy(),
        ) {
            let sorted = sorted_by_date(&movements);
            for a in &animals {
                let own: Vec<&Movement> = sorted
                    .iter()
                    .filter(|m| m.animal_id == a.id)
                    .copied()
                    .collect();
                let before = is_present_as_of(&own, cutoff);
                let next = cutoff + Days::new(1);
                let after = is_present_as_of(&own, next);
                if before != after {
                    prop_assert!(own.iter().any(|m| m.date == cutoff));
                }
            }
        }

        /// Cross-tab totals row is the cell-wise sum of the gender rows.
        #[test]
        fn prop_cross_tab_totals(
            (animals, movements) in herd_strategy(),
            start in day_strategy(),
            span in 0u64..30,
        ) {
            let report = cross_tab_summary(
                &animals,
                &movements,
                None,
                &DateWindow::new(start, start + Days::new(span)),
            ).unwrap();

            prop_assert_eq!(
                report.total.opening.total,
                report.male.opening.total + report.female.opening.total
            );
            prop_assert_eq!(
                report.total.closing.total,
                report.male.closing.total + report.female.closing.total
            );
            prop_assert_eq!(
                report.total.inflow.total,
                report.male.inflow.total + report.female.inflow.total
            );
            prop_assert_eq!(
                report.total.outflow.total,
                report.male.outflow.total + report.female.outflow.total
            );
        }

        /// The daily summary is idempotent over the same inputs.
        #[test]
        fn prop_daily_summary_deterministic(
            (animals, movements) in herd_strategy(),
            start in day_strategy(),
            span in 0u64..10,
        ) {
            let window = DateWindow::new(start, start + Days::new(span));
            let a = daily_summary(&animals, &movements, None, &window);
            let b = daily_summary(&animals, &movements, None, &window);
            prop_assert_eq!(a, b);
        }

        /// The last day's closing of a multi-day summary matches the
        /// cross-tab closing total over the same range.
        #[test]
        fn prop_daily_and_cross_tab_agree_on_closing(
            (animals, movements) in herd_strategy(),
            start in day_strategy(),
            span in 0u64..20,
        ) {
            let window = DateWindow::new(start, start + Days::new(span));
            let rows = daily_summary(&animals, &movements, None, &window);
            let report = cross_tab_summary(&animals, &movements, None, &window).unwrap();

            let last = rows.last().unwrap();
            prop_assert_eq!(
                last.closing.male + last.closing.female,
                report.total.closing.total
            );
        }
    }
}
