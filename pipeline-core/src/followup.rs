//! Follow-up date urgency for lead cards.

use std::fmt;

use chrono::NaiveDate;

/// Days still to go before `date`; negative once it has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// How pressing a follow-up is, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FollowUpUrgency {
    Overdue,
    Today,
    /// One to three days out.
    Soon,
    Upcoming,
}

impl FollowUpUrgency {
    pub fn classify(days: i64) -> Self {
        match days {
            d if d < 0 => FollowUpUrgency::Overdue,
            0 => FollowUpUrgency::Today,
            1..=3 => FollowUpUrgency::Soon,
            _ => FollowUpUrgency::Upcoming,
        }
    }

    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        Self::classify(days_until(date, today))
    }
}

impl fmt::Display for FollowUpUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUpUrgency::Overdue => write!(f, "overdue"),
            FollowUpUrgency::Today => write!(f, "today"),
            FollowUpUrgency::Soon => write!(f, "soon"),
            FollowUpUrgency::Upcoming => write!(f, "upcoming"),
        }
    }
}
