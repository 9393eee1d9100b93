use std::sync::Mutex;

use giveaway::{GiveawayError, Listing, ListingSink};

/// One observed sink call.
#[derive(Debug, Clone)]
pub enum Delivery {
    Listings(Vec<Listing>),
    Error(GiveawayError),
}

/// Sink that records every call in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Delivery>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Delivery> {
        self.events.lock().unwrap().clone()
    }

    /// Every delivered listing, flattened across batches.
    pub fn listings(&self) -> Vec<Listing> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Listings(b) => Some(b),
                Delivery::Error(_) => None,
            })
            .flatten()
            .collect()
    }

    /// Delivered batches, in arrival order.
    pub fn batches(&self) -> Vec<Vec<Listing>> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Listings(b) => Some(b),
                Delivery::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<GiveawayError> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Error(e) => Some(e),
                Delivery::Listings(_) => None,
            })
            .collect()
    }
}

impl ListingSink for RecordingSink {
    fn on_listings(&self, batch: Vec<Listing>) {
        self.events.lock().unwrap().push(Delivery::Listings(batch));
    }

    fn on_error(&self, cause: GiveawayError) {
        self.events.lock().unwrap().push(Delivery::Error(cause));
    }
}
