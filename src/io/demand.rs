// src/io/demand.rs

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use thiserror::Error;

/// Source of exogenous consumer demand, queried once per period for the
/// retailer only.
pub trait DemandSource: Send {
    fn demand(&mut self, period: usize) -> u32;
}

impl<F> DemandSource for F
where
    F: FnMut(usize) -> u32 + Send,
{
    fn demand(&mut self, period: usize) -> u32 {
        self(period)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DemandError {
    #[error("invalid normal demand parameters: mean {mean}, std_dev {std_dev}")]
    InvalidNormal { mean: f64, std_dev: f64 },
}

/// The same order amount every period.
/// Useful for testing stability (e.g., step-response tests).
#[derive(Debug, Clone, Copy)]
pub struct ConstantDemand {
    pub value: u32,
}

impl ConstantDemand {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl DemandSource for ConstantDemand {
    fn demand(&mut self, _period: usize) -> u32 {
        self.value
    }
}

/// `initial` before `step_period`, `final_value` from it onward.
#[derive(Debug, Clone, Copy)]
pub struct StepDemand {
    pub initial: u32,
    pub final_value: u32,
    pub step_period: usize,
}

impl StepDemand {
    pub fn new(initial: u32, final_value: u32, step_period: usize) -> Self {
        Self {
            initial,
            final_value,
            step_period,
        }
    }

    /// 4 units per period, jumping to 8 at period 4.
    /// This is the classic scenario used in the MIT Beer Game to trigger the Bullwhip effect.
    pub fn classic() -> Self {
        Self::new(4, 8, 4)
    }
}

impl DemandSource for StepDemand {
    fn demand(&mut self, period: usize) -> u32 {
        if period >= self.step_period {
            self.final_value
        } else {
            self.initial
        }
    }
}

/// Sinusoidal demand: `base ± amplitude` over `period` periods.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalDemand {
    pub base: u32,
    pub amplitude: u32,
    pub period: usize,
}

impl SeasonalDemand {
    pub fn new(base: u32, amplitude: u32, period: usize) -> Self {
        Self {
            base,
            amplitude,
            period,
        }
    }
}

impl DemandSource for SeasonalDemand {
    fn demand(&mut self, t: usize) -> u32 {
        if self.period == 0 {
            return self.base;
        }
        let phase = 2.0 * PI * t as f64 / self.period as f64;
        let value = self.base as f64 + self.amplitude as f64 * phase.sin();
        value.round().max(0.0) as u32
    }
}

/// Constant base plus uniform integer noise in `[-noise, +noise]`.
#[derive(Debug, Clone)]
pub struct NoisyDemand {
    base: u32,
    noise: u32,
    rng: ChaCha8Rng,
}

impl NoisyDemand {
    pub fn new(base: u32, noise: u32, seed: u64) -> Self {
        Self {
            base,
            noise,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DemandSource for NoisyDemand {
    fn demand(&mut self, _period: usize) -> u32 {
        let noise = self.noise as i64;
        let jitter = self.rng.gen_range(-noise..=noise);
        (self.base as i64 + jitter).max(0) as u32
    }
}

/// `base` demand with a spike of `shock_magnitude` for
/// `[shock_period, shock_period + shock_duration)`.
#[derive(Debug, Clone, Copy)]
pub struct ShockDemand {
    pub base: u32,
    pub shock_period: usize,
    pub shock_duration: usize,
    pub shock_magnitude: u32,
}

impl ShockDemand {
    pub fn new(base: u32, shock_period: usize, shock_duration: usize, shock_magnitude: u32) -> Self {
        Self {
            base,
            shock_period,
            shock_duration,
            shock_magnitude,
        }
    }
}

impl DemandSource for ShockDemand {
    fn demand(&mut self, period: usize) -> u32 {
        let end = self.shock_period.saturating_add(self.shock_duration);
        if (self.shock_period..end).contains(&period) {
            self.shock_magnitude
        } else {
            self.base
        }
    }
}

/// Demand drawn from a Normal (Bell Curve) distribution, rounded and
/// clamped at zero.
#[derive(Debug, Clone)]
pub struct NormalDemand {
    normal: Normal<f64>,
    rng: ChaCha8Rng,
}

impl NormalDemand {
    /// # Arguments
    /// * `mean` - The average order size (e.g., 10.0).
    /// * `std_dev` - The standard deviation (volatility) (e.g., 2.0).
    /// * `seed` - Seed for the internal generator.
    pub fn new(mean: f64, std_dev: f64, seed: u64) -> Result<Self, DemandError> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
            return Err(DemandError::InvalidNormal { mean, std_dev });
        }
        let normal =
            Normal::new(mean, std_dev).map_err(|_| DemandError::InvalidNormal { mean, std_dev })?;
        Ok(Self {
            normal,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl DemandSource for NormalDemand {
    fn demand(&mut self, _period: usize) -> u32 {
        let val: f64 = self.normal.sample(&mut self.rng);
        val.round().clamp(0.0, u32::MAX as f64) as u32
    }
}

/// Explicit per-period schedule. Periods past the end see zero demand.
#[derive(Debug, Clone)]
pub struct ScheduleDemand {
    schedule: Vec<u32>,
}

impl ScheduleDemand {
    pub fn new(schedule: Vec<u32>) -> Self {
        Self { schedule }
    }
}

impl DemandSource for ScheduleDemand {
    fn demand(&mut self, period: usize) -> u32 {
        self.schedule.get(period).copied().unwrap_or(0)
    }
}
