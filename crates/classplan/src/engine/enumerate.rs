//! Enumerates conflict-free selections of one section per course.
//!
//! The search walks the Cartesian product of the course groups depth first,
//! in group order with the last group varying fastest. A branch is abandoned
//! as soon as the newest section conflicts with one already chosen, which
//! yields exactly the conflict-free tuples of the full product, in product
//! order, without materialising the rest.

use super::config::SearchBudget;
use super::types::{Combination, MeetingOccurrence, RatedSection, Section, TimeWindow};
use std::collections::HashMap;
use std::time::Instant;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub combinations: Vec<Combination>,
    /// Partial and complete selections visited
    pub examined: u64,
}

/// Search stopped before covering the whole product.
#[derive(Debug, Clone)]
pub struct BudgetExhausted {
    pub examined: u64,
    /// Valid combinations found before stopping, in enumeration order
    pub found: Vec<Combination>,
}

/// Every conflict-free combination, with no limit on the search.
pub fn enumerate(rated: &[RatedSection]) -> Vec<Combination> {
    match enumerate_within(rated, SearchBudget::unbounded()) {
        Ok(enumeration) => enumeration.combinations,
        Err(exhausted) => exhausted.found,
    }
}

/// Every conflict-free combination, giving up once `budget` is spent.
///
/// No requested course in the input means no combinations.
pub fn enumerate_within(
    rated: &[RatedSection],
    budget: SearchBudget,
) -> Result<Enumeration, BudgetExhausted> {
    let groups = group_by_course(rated);
    if groups.is_empty() {
        return Ok(Enumeration {
            combinations: Vec::new(),
            examined: 0,
        });
    }

    let mut search = Search {
        groups: &groups,
        chosen: Vec::with_capacity(groups.len()),
        found: Vec::new(),
        examined: 0,
        max_candidates: budget.max_candidates,
        deadline: budget.time_limit().map(|limit| Instant::now() + limit),
    };

    match search.descend(0) {
        Ok(()) => Ok(Enumeration {
            combinations: search.found,
            examined: search.examined,
        }),
        Err(OutOfBudget) => Err(BudgetExhausted {
            examined: search.examined,
            found: search.found,
        }),
    }
}

/// Splits sections into per-course groups, in order of first appearance.
pub fn group_by_course(rated: &[RatedSection]) -> Vec<Vec<&RatedSection>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&RatedSection>> = Vec::new();

    for section in rated {
        let slot = *index
            .entry(section.section.course_name.as_str())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(section);
    }

    groups
}

struct OutOfBudget;

struct Search<'a> {
    groups: &'a [Vec<&'a RatedSection>],
    chosen: Vec<&'a RatedSection>,
    found: Vec<Combination>,
    examined: u64,
    max_candidates: Option<u64>,
    deadline: Option<Instant>,
}

impl<'a> Search<'a> {
    fn descend(&mut self, depth: usize) -> Result<(), OutOfBudget> {
        if depth == self.groups.len() {
            self.found.push(combination_of(&self.chosen));
            return Ok(());
        }

        let groups = self.groups;
        for candidate in &groups[depth] {
            self.charge()?;

            if self
                .chosen
                .iter()
                .any(|picked| sections_conflict(&picked.section, &candidate.section))
            {
                continue;
            }

            self.chosen.push(*candidate);
            let result = self.descend(depth + 1);
            self.chosen.pop();
            result?;
        }

        Ok(())
    }

    fn charge(&mut self) -> Result<(), OutOfBudget> {
        self.examined += 1;
        if let Some(max) = self.max_candidates {
            if self.examined > max {
                return Err(OutOfBudget);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(OutOfBudget);
            }
        }
        Ok(())
    }
}

fn combination_of(chosen: &[&RatedSection]) -> Combination {
    Combination {
        score: chosen.iter().map(|s| s.instructor_rating).sum(),
        sections: chosen.iter().map(|s| (*s).clone()).collect(),
    }
}

/// True if either window's start or end falls inside the other, endpoints
/// included. Back-to-back meetings therefore conflict.
pub fn windows_overlap(a: &TimeWindow, b: &TimeWindow) -> bool {
    b.covers(a.start_time) || b.covers(a.end_time) || a.covers(b.start_time) || a.covers(b.end_time)
}

pub fn occurrences_conflict(a: &MeetingOccurrence, b: &MeetingOccurrence) -> bool {
    a.shares_day_with(b) && windows_overlap(&a.window(), &b.window())
}

pub fn sections_conflict(a: &Section, b: &Section) -> bool {
    a.meeting_times.iter().any(|x| {
        b.meeting_times
            .iter()
            .any(|y| occurrences_conflict(x, y))
    })
}
