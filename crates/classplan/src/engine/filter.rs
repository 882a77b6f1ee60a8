//! Reduces a catalog to the sections a student could actually take.

use super::types::{Constraints, MeetingOccurrence, Section, TimeWindow};
use std::collections::HashSet;
use tracing::debug;

/// Keeps the sections of requested courses that satisfy every constraint.
///
/// Catalog order and multiplicity are preserved.
pub fn filter_sections(catalog: &[Section], constraints: &Constraints) -> Vec<Section> {
    let selected = select_courses(catalog, &constraints.courses);
    let eligible: Vec<Section> = selected
        .into_iter()
        .filter(|section| is_eligible(section, constraints))
        .collect();

    debug!(
        catalog = catalog.len(),
        eligible = eligible.len(),
        "Filtered catalog"
    );

    eligible
}

/// Keeps sections whose course name exactly equals a requested course.
pub fn select_courses(catalog: &[Section], courses: &[String]) -> Vec<Section> {
    let wanted: HashSet<&str> = courses.iter().map(String::as_str).collect();
    catalog
        .iter()
        .filter(|section| wanted.contains(section.course_name.as_str()))
        .cloned()
        .collect()
}

/// Checks method, availability and meeting times for one section.
pub fn is_eligible(section: &Section, constraints: &Constraints) -> bool {
    if !constraints
        .instructional_methods
        .iter()
        .any(|m| *m == section.instructional_method)
    {
        return false;
    }

    if !constraints
        .availability
        .iter()
        .any(|a| *a == section.availability)
    {
        return false;
    }

    fits_windows(&section.meeting_times, constraints)
}

/// True if every meeting day of every occurrence lies inside a permitted
/// window for that day. Sections that never meet, and occurrences with no
/// meeting days, always fit.
pub fn fits_windows(occurrences: &[MeetingOccurrence], constraints: &Constraints) -> bool {
    occurrences.iter().all(|occurrence| {
        let window = occurrence.window();
        occurrence
            .days()
            .all(|day| fits_any(&window, constraints.windows.for_day(day)))
    })
}

fn fits_any(meeting: &TimeWindow, permitted: &[TimeWindow]) -> bool {
    permitted.iter().any(|window| window.contains(meeting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{TimeOfDay, WEEK};
    use chrono::Weekday;
    use proptest::prelude::*;

    fn window(sh: u8, sm: u8, eh: u8, em: u8) -> TimeWindow {
        TimeWindow::new(TimeOfDay::new(sh, sm), TimeOfDay::new(eh, em))
    }

    fn section(course: &str, id: &str, meetings: Vec<MeetingOccurrence>) -> Section {
        Section {
            course_name: course.to_string(),
            class_id: id.to_string(),
            instructor: "Jane Doe".to_string(),
            availability: "open".to_string(),
            instructional_method: "IP".to_string(),
            meeting_times: meetings,
            date: Default::default(),
        }
    }

    fn constraints(courses: &[&str]) -> Constraints {
        Constraints {
            courses: courses.iter().map(|c| c.to_string()).collect(),
            instructional_methods: vec!["IP".to_string(), "HY".to_string()],
            availability: vec!["open".to_string(), "waitlisted".to_string()],
            ..Default::default()
        }
        .allow(&[Weekday::Mon, Weekday::Wed], window(8, 0, 12, 0))
    }

    #[test]
    fn test_select_courses_keeps_catalog_order() {
        let catalog = vec![
            section("ENGL 001", "1", vec![]),
            section("MATH 001", "2", vec![]),
            section("CHEM 001A", "3", vec![]),
            section("MATH 001", "4", vec![]),
        ];
        let wanted = vec![
            "MATH 001".to_string(),
            "ENGL 001".to_string(),
            "MATH 001".to_string(),
        ];
        let ids: Vec<_> = select_courses(&catalog, &wanted)
            .into_iter()
            .map(|s| s.class_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn test_course_match_is_exact() {
        let catalog = vec![section("MATH 005A", "1", vec![])];
        assert!(select_courses(&catalog, &["MATH 005".to_string()]).is_empty());
        assert!(select_courses(&catalog, &["math 005a".to_string()]).is_empty());
    }

    #[test]
    fn test_rejects_method_and_availability() {
        let c = constraints(&["MATH 001"]);

        let mut online = section("MATH 001", "1", vec![]);
        online.instructional_method = "FO".to_string();
        assert!(!is_eligible(&online, &c));

        let mut closed = section("MATH 001", "2", vec![]);
        closed.availability = "closed".to_string();
        assert!(!is_eligible(&closed, &c));
    }

    #[test]
    fn test_empty_method_set_rejects_everything() {
        let mut c = constraints(&["MATH 001"]);
        c.instructional_methods.clear();
        assert!(!is_eligible(&section("MATH 001", "1", vec![]), &c));
    }

    #[test]
    fn test_section_without_meetings_always_fits() {
        let c = Constraints {
            courses: vec!["MATH 001".to_string()],
            instructional_methods: vec!["IP".to_string()],
            availability: vec!["open".to_string()],
            ..Default::default()
        };
        let catalog = vec![section("MATH 001", "async", vec![])];
        assert_eq!(filter_sections(&catalog, &c).len(), 1);
    }

    #[test]
    fn test_occurrence_without_days_fits() {
        let dayless = vec![MeetingOccurrence::on(&[], window(22, 0, 23, 0))];
        assert!(fits_windows(&dayless, &Constraints::default()));
        assert!(is_eligible(&section("MATH 001", "tba", dayless), &constraints(&["MATH 001"])));
    }

    #[test]
    fn test_meeting_must_fit_every_day() {
        let c = constraints(&["MATH 001"]);
        let inside = window(8, 30, 9, 45);

        let mw = section(
            "MATH 001",
            "mw",
            vec![MeetingOccurrence::on(&[Weekday::Mon, Weekday::Wed], inside)],
        );
        assert!(is_eligible(&mw, &c));

        // Friday has no permitted windows
        let mwf = section(
            "MATH 001",
            "mwf",
            vec![MeetingOccurrence::on(
                &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
                inside,
            )],
        );
        assert!(!is_eligible(&mwf, &c));

        let late = section(
            "MATH 001",
            "late",
            vec![MeetingOccurrence::on(&[Weekday::Mon], window(11, 30, 12, 20))],
        );
        assert!(!is_eligible(&late, &c));
    }

    #[test]
    fn test_any_permitted_window_may_hold_the_meeting() {
        let c = constraints(&["MATH 001"]).allow(&[Weekday::Mon], window(13, 0, 20, 45));
        let afternoon = section(
            "MATH 001",
            "pm",
            vec![MeetingOccurrence::on(&[Weekday::Mon], window(14, 0, 15, 50))],
        );
        assert!(is_eligible(&afternoon, &c));

        // Spans the gap between the two windows
        let straddle = section(
            "MATH 001",
            "noon",
            vec![MeetingOccurrence::on(&[Weekday::Mon], window(11, 0, 13, 30))],
        );
        assert!(!is_eligible(&straddle, &c));
    }

    #[test]
    fn test_every_occurrence_is_checked() {
        let c = constraints(&["CHEM 001A"]);
        let lab = section(
            "CHEM 001A",
            "lab",
            vec![
                MeetingOccurrence::on(&[Weekday::Mon], window(9, 0, 10, 0)),
                MeetingOccurrence::on(&[Weekday::Wed], window(13, 0, 16, 0)),
            ],
        );
        assert!(!is_eligible(&lab, &c));
    }

    fn arb_section() -> impl Strategy<Value = Section> {
        (
            prop::sample::select(vec!["MATH 001", "ENGL 001", "PHIL 025"]),
            prop::sample::select(vec!["IP", "HY", "FO"]),
            prop::sample::select(vec!["open", "waitlisted", "closed"]),
            prop::collection::vec((0usize..7, 6u8..20, 0u8..60, 1u8..3), 0..3),
        )
            .prop_map(|(course, method, availability, meetings)| {
                let meeting_times = meetings
                    .into_iter()
                    .map(|(day, hour, minute, length)| {
                        MeetingOccurrence::on(
                            &[WEEK[day]],
                            window(hour, minute, hour + length, minute),
                        )
                    })
                    .collect();
                Section {
                    course_name: course.to_string(),
                    class_id: format!("{course}-{method}"),
                    instructor: "Staff".to_string(),
                    availability: availability.to_string(),
                    instructional_method: method.to_string(),
                    meeting_times,
                    date: Default::default(),
                }
            })
    }

    proptest! {
        #[test]
        fn prop_filter_idempotent(catalog in prop::collection::vec(arb_section(), 0..20)) {
            let c = constraints(&["MATH 001", "PHIL 025"]);
            let once = filter_sections(&catalog, &c);
            let twice = filter_sections(&once, &c);
            prop_assert_eq!(once, twice);
        }
    }
}
