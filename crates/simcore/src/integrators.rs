use crate::{LocalFrame, SimContext, VesselState};

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances the position by one timestep using the current heading and speed.
    fn step(&self, ctx: &SimContext, state: &mut VesselState);
}

/// Explicit Euler over the local flat-earth frame.
/// Speed and heading are updated first by the motion model; this only
/// moves lat/lon along the (already updated) heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatEarthEuler {
    pub frame: LocalFrame,
}

impl FlatEarthEuler {
    pub fn new(frame: LocalFrame) -> Self {
        FlatEarthEuler { frame }
    }
}

impl Integrator for FlatEarthEuler {
    fn step(&self, ctx: &SimContext, state: &mut VesselState) {
        let distance = state.speed * ctx.dt;

        // Navigational convention: cos -> north, sin -> east
        let north = distance * state.heading.cos();
        let east = distance * state.heading.sin();

        let (lat, lon) = self.frame.offset(state.lat, state.lon, north, east);
        state.lat = lat;
        state.lon = lon;
    }
}

/// Converts variable wall-clock deltas into whole fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    pub fixed_dt: f64,
    pub accumulator: f64,
    pub elapsed: f64,
}

impl FixedTimestep {
    pub fn new(fixed_dt: f64) -> Self {
        FixedTimestep {
            fixed_dt,
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn from_rate(ticks_per_second: u32) -> Self {
        FixedTimestep::new(1.0 / ticks_per_second.max(1) as f64)
    }

    /// Adds `dt` to the accumulator and returns one context per whole tick that fits.
    /// The remainder is carried into the next call.
    pub fn advance(&mut self, dt: f64) -> Vec<SimContext> {
        self.accumulator += dt.max(0.0);
        let mut ticks = Vec::new();

        while self.accumulator >= self.fixed_dt {
            ticks.push(SimContext {
                dt: self.fixed_dt,
                t: self.elapsed,
            });
            self.accumulator -= self.fixed_dt;
            self.elapsed += self.fixed_dt;
        }

        ticks
    }

    /// Context for exactly one tick, ignoring the accumulator.
    pub fn tick(&mut self) -> SimContext {
        let ctx = SimContext {
            dt: self.fixed_dt,
            t: self.elapsed,
        };
        self.elapsed += self.fixed_dt;
        ctx
    }

    pub fn remainder(&self) -> f64 {
        self.accumulator
    }
}
