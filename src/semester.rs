use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Academic term used to tag gallery photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Fall,
}

/// Semester label such as `s26` (spring 2026) or `f25` (fall 2025).
///
/// Only used as a filename token; there is no arithmetic beyond picking the
/// previous term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semester {
    pub season: Season,
    pub year: i32,
}

impl Semester {
    /// Semester containing the given calendar month (1-12).
    /// January through May is spring, June through December is fall.
    pub fn containing(year: i32, month: u32) -> Self {
        let season = if (1..=5).contains(&month) {
            Season::Spring
        } else {
            Season::Fall
        };
        Self { season, year }
    }

    /// The term before this one
    pub fn previous(self) -> Self {
        match self.season {
            Season::Spring => Self {
                season: Season::Fall,
                year: self.year - 1,
            },
            Season::Fall => Self {
                season: Season::Spring,
                year: self.year,
            },
        }
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.season {
            Season::Spring => 's',
            Season::Fall => 'f',
        };
        write!(f, "{}{:02}", letter, self.year.rem_euclid(100))
    }
}

/// Current and past semester for a (year, month) pair
pub fn semesters_for(year: i32, month: u32) -> (Semester, Semester) {
    let current = Semester::containing(year, month);
    (current, current.previous())
}

pub fn semesters_on(date: NaiveDate) -> (Semester, Semester) {
    semesters_for(date.year(), date.month())
}

/// Current and past semester based on today's local calendar date
pub fn current_semesters() -> (Semester, Semester) {
    semesters_on(Local::now().date_naive())
}
