/// Types for catalog sections, ratings, constraints and schedules
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rating attached to a section when no rating record matched its instructor.
pub const UNKNOWN_RATING: f32 = -1.0;

/// Every weekday in catalog order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A wall-clock time of day.
///
/// Ordering uses the `hour * 100 + minute` encoding the catalog has always
/// been compared with. Use [`TimeOfDay::minutes_since_midnight`] for any
/// duration arithmetic; differences of encoded values are not minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(rename = "Hour")]
    pub hour: u8,
    #[serde(rename = "Minute")]
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// The comparison key, e.g. 09:45 -> 945.
    pub fn encoded(&self) -> u32 {
        u32::from(self.hour) * 100 + u32::from(self.minute)
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.encoded().cmp(&other.encoded())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A start/end pair. `start <= end` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeWindow {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Returns true if `other` lies entirely within this window (inclusive).
    pub fn contains(&self, other: &TimeWindow) -> bool {
        other.start_time >= self.start_time && other.end_time <= self.end_time
    }

    /// Returns true if `time` falls within this window, endpoints included.
    pub fn covers(&self, time: TimeOfDay) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

/// Term dates a section runs between. Carried through, never compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateRange {
    pub start_month: u8,
    pub start_day: u8,
    pub end_month: u8,
    pub end_day: u8,
}

/// One weekly meeting pattern: a set of days sharing a single time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeetingOccurrence {
    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl MeetingOccurrence {
    /// Creates an occurrence meeting on `days` during `window`.
    pub fn on(days: &[Weekday], window: TimeWindow) -> Self {
        let mut occurrence = Self {
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
            start_time: window.start_time,
            end_time: window.end_time,
        };
        for day in days {
            *occurrence.flag_mut(*day) = true;
        }
        occurrence
    }

    fn flag_mut(&mut self, day: Weekday) -> &mut bool {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn meets_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Days this occurrence meets, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|day| self.meets_on(*day))
    }

    pub fn shares_day_with(&self, other: &MeetingOccurrence) -> bool {
        WEEK.iter()
            .any(|day| self.meets_on(*day) && other.meets_on(*day))
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// One offered instance of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Groups sections into "the same course", e.g. "MATH 005A"
    pub course_name: String,
    #[serde(rename = "classID")]
    pub class_id: String,
    pub instructor: String,
    /// Open vocabulary: "open", "waitlisted", "closed", ...
    pub availability: String,
    /// Open vocabulary: "IP", "HY", "FO", ...
    pub instructional_method: String,
    #[serde(default)]
    pub meeting_times: Vec<MeetingOccurrence>,
    #[serde(default)]
    pub date: DateRange,
}

/// A section with the instructor rating the integrator resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedSection {
    #[serde(flatten)]
    pub section: Section,
    /// In `[0, 5]`, or [`UNKNOWN_RATING`]
    pub instructor_rating: f32,
}

impl RatedSection {
    pub fn new(section: Section, instructor_rating: f32) -> Self {
        Self {
            section,
            instructor_rating,
        }
    }

    pub fn unrated(section: Section) -> Self {
        Self::new(section, UNKNOWN_RATING)
    }

    pub fn has_known_rating(&self) -> bool {
        self.instructor_rating != UNKNOWN_RATING
    }
}

/// An instructor quality record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub institution_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub total_ratings: u32,
    /// Decimal text, e.g. "4.3". May be malformed.
    #[serde(default)]
    pub overall_rating: String,
}

impl RatingRecord {
    /// The name matched against a section's instructor string.
    ///
    /// Always `first middle last` with single spaces, so an empty middle name
    /// leaves two spaces between first and last.
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
    }
}

/// Permitted meeting windows per weekday.
///
/// A day with no windows forbids any meeting on that day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyWindows {
    #[serde(default)]
    pub monday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub tuesday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub wednesday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub thursday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub friday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub saturday_time: Vec<TimeWindow>,
    #[serde(default)]
    pub sunday_time: Vec<TimeWindow>,
}

impl WeeklyWindows {
    pub fn for_day(&self, day: Weekday) -> &[TimeWindow] {
        match day {
            Weekday::Mon => &self.monday_time,
            Weekday::Tue => &self.tuesday_time,
            Weekday::Wed => &self.wednesday_time,
            Weekday::Thu => &self.thursday_time,
            Weekday::Fri => &self.friday_time,
            Weekday::Sat => &self.saturday_time,
            Weekday::Sun => &self.sunday_time,
        }
    }

    pub fn for_day_mut(&mut self, day: Weekday) -> &mut Vec<TimeWindow> {
        match day {
            Weekday::Mon => &mut self.monday_time,
            Weekday::Tue => &mut self.tuesday_time,
            Weekday::Wed => &mut self.wednesday_time,
            Weekday::Thu => &mut self.thursday_time,
            Weekday::Fri => &mut self.friday_time,
            Weekday::Sat => &mut self.saturday_time,
            Weekday::Sun => &mut self.sunday_time,
        }
    }
}

/// What the student asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(flatten)]
    pub windows: WeeklyWindows,
    #[serde(default)]
    pub instructional_methods: Vec<String>,
    #[serde(default)]
    pub availability: Vec<String>,
}

impl Constraints {
    /// Adds `window` to the permitted windows of every day in `days`.
    pub fn allow(mut self, days: &[Weekday], window: TimeWindow) -> Self {
        for day in days {
            self.windows.for_day_mut(*day).push(window);
        }
        self
    }
}

/// One assembled candidate schedule: one section per requested course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub sections: Vec<RatedSection>,
    pub score: f32,
}

impl Combination {
    pub fn class_ids(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|s| s.section.class_id.as_str())
            .collect()
    }
}

/// The most recent catalog stored for an institution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub timestamp: i64,
    pub school: String,
    #[serde(default)]
    pub classes: Vec<Section>,
}

/// The most recent rating export stored for an institution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsSnapshot {
    #[serde(default)]
    pub timestamp: i64,
    pub school_id: String,
    #[serde(default)]
    pub professors: Vec<RatingRecord>,
}
