//! Attaches instructor ratings to filtered sections.

use super::error::ScheduleError;
use super::similarity::similarity;
use super::types::{RatedSection, RatingRecord, Section};
use tracing::debug;

/// Highest rating a record may carry.
const MAX_RATING: f32 = 5.0;

/// Rates every section, in order.
///
/// For each section the first record (in input order) whose full name scores
/// above `threshold` against the instructor and whose rating parses is used.
/// Sections with no such record get [`super::types::UNKNOWN_RATING`].
pub fn attach_ratings(
    sections: &[Section],
    ratings: &[RatingRecord],
    threshold: f64,
) -> Vec<RatedSection> {
    // Full names are reused for every section
    let names: Vec<String> = ratings.iter().map(RatingRecord::full_name).collect();

    sections
        .iter()
        .map(|section| match find_rating(section, ratings, &names, threshold) {
            Some(rating) => RatedSection::new(section.clone(), rating),
            None => RatedSection::unrated(section.clone()),
        })
        .collect()
}

fn find_rating(
    section: &Section,
    ratings: &[RatingRecord],
    names: &[String],
    threshold: f64,
) -> Option<f32> {
    for (record, name) in ratings.iter().zip(names) {
        let score = similarity(&section.instructor, name);
        if score <= threshold {
            continue;
        }

        match parse_rating(&record.overall_rating) {
            Ok(rating) => {
                debug!(
                    class_id = %section.class_id,
                    instructor = %section.instructor,
                    matched = %name,
                    score,
                    rating,
                    "Matched instructor rating"
                );
                return Some(rating);
            }
            Err(e) => {
                debug!(
                    class_id = %section.class_id,
                    matched = %name,
                    error = %e,
                    "Skipping rating record"
                );
            }
        }
    }

    None
}

/// Parses a record's overall rating text.
///
/// Fails on anything that is not a finite decimal in `[0, 5]`.
pub fn parse_rating(text: &str) -> Result<f32, ScheduleError> {
    let value = text
        .parse::<f32>()
        .map_err(|e| ScheduleError::ParseFailure {
            value: text.to_string(),
            message: e.to_string(),
        })?;

    if !value.is_finite() || !(0.0..=MAX_RATING).contains(&value) {
        return Err(ScheduleError::ParseFailure {
            value: text.to_string(),
            message: format!("rating must be between 0 and {MAX_RATING}"),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::UNKNOWN_RATING;

    fn section(id: &str, instructor: &str) -> Section {
        Section {
            course_name: "MATH 008".to_string(),
            class_id: id.to_string(),
            instructor: instructor.to_string(),
            availability: "open".to_string(),
            instructional_method: "IP".to_string(),
            meeting_times: vec![],
            date: Default::default(),
        }
    }

    fn record(first: &str, middle: &str, last: &str, rating: &str) -> RatingRecord {
        RatingRecord {
            first_name: first.to_string(),
            middle_name: middle.to_string(),
            last_name: last.to_string(),
            overall_rating: rating.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5").unwrap(), 4.5);
        assert_eq!(parse_rating("0").unwrap(), 0.0);
        assert!(matches!(
            parse_rating("not-a-number"),
            Err(ScheduleError::ParseFailure { .. })
        ));
        assert!(parse_rating("").is_err());
        assert!(parse_rating("NaN").is_err());
        assert!(parse_rating("7.5").is_err());
    }

    #[test]
    fn test_matches_first_confident_record() {
        let ratings = vec![
            record("John", "", "Smith", "2.0"),
            record("Jane", "", "Doe", "4.5"),
            record("Jane", "", "Doe", "1.0"),
        ];
        let rated = attach_ratings(&[section("1", "Jane Doe")], &ratings, 0.90);
        assert_eq!(rated[0].instructor_rating, 4.5);
    }

    #[test]
    fn test_malformed_rating_is_skipped() {
        let ratings = vec![record("Jane", "", "Doe", "not-a-number")];
        let rated = attach_ratings(&[section("1", "Jane Doe")], &ratings, 0.90);
        assert_eq!(rated[0].instructor_rating, UNKNOWN_RATING);
        assert!(!rated[0].has_known_rating());
    }

    #[test]
    fn test_scan_continues_after_malformed_rating() {
        let ratings = vec![
            record("Jane", "", "Doe", "n/a"),
            record("Jane", "", "Doe", "3.8"),
        ];
        let rated = attach_ratings(&[section("1", "Jane Doe")], &ratings, 0.90);
        assert_eq!(rated[0].instructor_rating, 3.8);
    }

    #[test]
    fn test_output_matches_input_order_and_length() {
        let ratings = vec![record("Jane", "", "Doe", "4.0")];
        let sections = vec![
            section("a", "Alan Turing"),
            section("b", "Jane Doe"),
            section("c", ""),
        ];
        let rated = attach_ratings(&sections, &ratings, 0.90);
        let ids: Vec<_> = rated.iter().map(|r| r.section.class_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(rated[0].instructor_rating, UNKNOWN_RATING);
        assert_eq!(rated[1].instructor_rating, 4.0);
        assert_eq!(rated[2].instructor_rating, UNKNOWN_RATING);
    }

    #[test]
    fn test_no_ratings_leaves_everything_unrated() {
        let rated = attach_ratings(&[section("1", "Jane Doe")], &[], 0.90);
        assert_eq!(rated.len(), 1);
        assert_eq!(rated[0].instructor_rating, UNKNOWN_RATING);
    }
}
