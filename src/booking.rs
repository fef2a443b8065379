// Stay parameters used to filter the hotel search

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Missing required booking field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date range: checkin {checkin} must be before checkout {checkout}")]
    InvalidDateRange {
        checkin: NaiveDate,
        checkout: NaiveDate,
    },
}

/// A complete, validated set of stay parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingOptions {
    checkin: NaiveDate,
    checkout: NaiveDate,
    adults: u32,
    children: u32,
}

impl BookingOptions {
    pub fn new(
        checkin: NaiveDate,
        checkout: NaiveDate,
        adults: u32,
        children: u32,
    ) -> Result<Self, BookingError> {
        if checkin >= checkout {
            return Err(BookingError::InvalidDateRange { checkin, checkout });
        }
        Ok(Self {
            checkin,
            checkout,
            adults,
            children,
        })
    }

    pub fn checkin(&self) -> NaiveDate {
        self.checkin
    }

    pub fn checkout(&self) -> NaiveDate {
        self.checkout
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }
}

/// Booking parameters as supplied by the embedding page. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BookingDraft {
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
}

impl BookingDraft {
    /// Succeeds only when all four fields are present together and the dates are ordered.
    pub fn complete(&self) -> Result<BookingOptions, BookingError> {
        let checkin = self.checkin.ok_or(BookingError::MissingField("checkin"))?;
        let checkout = self.checkout.ok_or(BookingError::MissingField("checkout"))?;
        let adults = self.adults.ok_or(BookingError::MissingField("adults"))?;
        let children = self.children.ok_or(BookingError::MissingField("children"))?;
        BookingOptions::new(checkin, checkout, adults, children)
    }
}

impl From<&BookingOptions> for BookingDraft {
    fn from(options: &BookingOptions) -> Self {
        Self {
            checkin: Some(options.checkin),
            checkout: Some(options.checkout),
            adults: Some(options.adults),
            children: Some(options.children),
        }
    }
}

/// Holds the last complete booking. The value is swapped wholesale, never edited in place.
#[derive(Debug, Default)]
pub struct BookingStore {
    current: RwLock<Option<Arc<BookingOptions>>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored value if `draft` is complete. Returns the value searches should use
    /// together with the reason the draft was rejected, if it was.
    pub fn merge(
        &self,
        draft: Option<&BookingDraft>,
    ) -> (Option<Arc<BookingOptions>>, Option<BookingError>) {
        let rejected = match draft.map(BookingDraft::complete) {
            Some(Ok(options)) => {
                *self.current.write() = Some(Arc::new(options));
                None
            }
            Some(Err(err)) => Some(err),
            None => None,
        };
        (self.current(), rejected)
    }

    pub fn current(&self) -> Option<Arc<BookingOptions>> {
        self.current.read().clone()
    }
}
