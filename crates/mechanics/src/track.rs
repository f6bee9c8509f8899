//! Track recorder
//!
//! Keeps the vessel's recent trail (one point per tick, bounded) and a
//! sparse set of breadcrumbs dropped every `breadcrumb_interval` ticks.
//! Both are bounded; the oldest entries are dropped first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use simcore::{LocalFrame, VesselState};

/// Most breadcrumbs kept; one hour at one every three seconds.
pub const BREADCRUMB_CAPACITY: usize = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct TrackRecorder {
    frame: LocalFrame,
    trail: VecDeque<TrackPoint>,
    breadcrumbs: VecDeque<TrackPoint>,
    capacity: usize,
    breadcrumb_interval: u32,
    ticks_since_breadcrumb: u32,
    distance_m: f64,
}

impl TrackRecorder {
    pub fn new(frame: LocalFrame, capacity: usize, breadcrumb_interval: u32) -> Self {
        Self {
            frame,
            trail: VecDeque::with_capacity(capacity),
            breadcrumbs: VecDeque::new(),
            capacity: capacity.max(1),
            breadcrumb_interval: breadcrumb_interval.max(1),
            ticks_since_breadcrumb: 0,
            distance_m: 0.0,
        }
    }

    /// Recorder with a breadcrumb every three seconds at the given tick rate.
    pub fn for_rate(frame: LocalFrame, ticks_per_second: u32) -> Self {
        Self::new(frame, 36_000, ticks_per_second.saturating_mul(3))
    }

    pub fn record(&mut self, state: &VesselState) {
        let point = TrackPoint {
            lat: state.lat,
            lon: state.lon,
        };

        if let Some(last) = self.trail.back() {
            self.distance_m += self
                .frame
                .to_local(last.lat, last.lon, point.lat, point.lon)
                .norm();
        }

        // The first point always drops a breadcrumb
        if self.trail.is_empty() && self.breadcrumbs.is_empty() {
            self.drop_breadcrumb(point);
        } else {
            self.ticks_since_breadcrumb += 1;
            if self.ticks_since_breadcrumb >= self.breadcrumb_interval {
                self.drop_breadcrumb(point);
            }
        }

        self.trail.push_back(point);
        while self.trail.len() > self.capacity {
            self.trail.pop_front();
        }
    }

    fn drop_breadcrumb(&mut self, point: TrackPoint) {
        self.breadcrumbs.push_back(point);
        if self.breadcrumbs.len() > BREADCRUMB_CAPACITY {
            self.breadcrumbs.pop_front();
        }
        self.ticks_since_breadcrumb = 0;
    }

    pub fn trail(&self) -> impl Iterator<Item = &TrackPoint> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn breadcrumbs(&self) -> impl Iterator<Item = &TrackPoint> {
        self.breadcrumbs.iter()
    }

    pub fn breadcrumb_count(&self) -> usize {
        self.breadcrumbs.len()
    }

    /// Total distance over ground since the first recorded point, in meters.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn clear(&mut self) {
        self.trail.clear();
        self.breadcrumbs.clear();
        self.ticks_since_breadcrumb = 0;
        self.distance_m = 0.0;
    }
}
