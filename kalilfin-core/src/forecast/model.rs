//! Additive trend + yearly seasonality regression.
//!
//! y(t) = a + b·t + Σₖ [cₖ·sin(2πk·d/P) + sₖ·cos(2πk·d/P)]
//!
//! - `t` is time scaled to [0, 1] over the observed span, so the trend
//!   coefficients do not depend on the calendar.
//! - `d` is the absolute day number and `P` is 365.25, so the seasonal phase is
//!   tied to the calendar rather than to the first sample.
//! - Closes are divided by their max absolute value before fitting.
//!
//! Coefficients are the ridge solution of the normal equations with the
//! penalty applied to the seasonal terms only.

use super::linalg;
use crate::domain::PriceSample;
use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

const YEAR_DAYS: f64 = 365.25;

/// A fitted model, ready to evaluate at any date.
#[derive(Debug, Clone)]
pub struct TrendSeasonalModel {
    origin: NaiveDate,
    span_days: f64,
    y_scale: f64,
    fourier_order: usize,
    coefficients: Vec<f64>,
}

impl TrendSeasonalModel {
    /// Fit to samples in ascending date order.
    ///
    /// Returns `None` if fewer than two distinct dates are present or the
    /// system cannot be solved.
    pub fn fit(samples: &[PriceSample], fourier_order: usize, penalty: f64) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        let span_days = (last.date - first.date).num_days() as f64;
        if span_days <= 0.0 {
            return None;
        }

        let y_scale = samples
            .iter()
            .map(|s| s.close.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let mut model = Self {
            origin: first.date,
            span_days,
            y_scale,
            fourier_order,
            coefficients: Vec::new(),
        };

        let k = model.feature_count();
        let mut xtx = vec![vec![0.0; k]; k];
        let mut xty = vec![0.0; k];
        for sample in samples {
            let x = model.features(sample.date);
            let y = sample.close / y_scale;
            for i in 0..k {
                xty[i] += x[i] * y;
                for j in 0..k {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }
        // Intercept and slope are unpenalized.
        for (i, row) in xtx.iter_mut().enumerate().skip(2) {
            row[i] += penalty;
        }

        model.coefficients = linalg::solve(xtx, xty)?;
        Some(model)
    }

    /// Predicted close on `date`, in price units.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        let x = self.features(date);
        let y: f64 = x
            .iter()
            .zip(&self.coefficients)
            .map(|(xi, ci)| xi * ci)
            .sum();
        y * self.y_scale
    }

    /// Slope of the trend component, in price units per day.
    pub fn trend_per_day(&self) -> f64 {
        self.coefficients.get(1).copied().unwrap_or(0.0) * self.y_scale / self.span_days
    }

    fn feature_count(&self) -> usize {
        2 + 2 * self.fourier_order
    }

    fn features(&self, date: NaiveDate) -> Vec<f64> {
        let t = (date - self.origin).num_days() as f64 / self.span_days;
        let day_number = date.num_days_from_ce() as f64;

        let mut x = Vec::with_capacity(self.feature_count());
        x.push(1.0);
        x.push(t);
        for k in 1..=self.fourier_order {
            let angle = 2.0 * PI * k as f64 * day_number / YEAR_DAYS;
            x.push(angle.sin());
            x.push(angle.cos());
        }
        x
    }
}
