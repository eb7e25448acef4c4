// Copyright @yucwang 2026

use crate::math::constants::Float;

use std::sync::atomic::{AtomicU32, Ordering};

/// Distance range and resolution of the transient output.
#[derive(Debug, Clone, Copy)]
pub struct TransientConfig {
    pub dist_min: Float,
    pub dist_max: Float,
    pub bin_num: usize,
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self { dist_min: 0.0, dist_max: 10.0, bin_num: 10000 }
    }
}

/// Time-resolved radiance accumulator, indexed by (bounce depth, distance
/// bin). Bins are f32 bit patterns stored in `AtomicU32` so that many
/// render threads can accumulate into the same bucket without losing
/// updates. The histogram is write-only during a pass; read it back only
/// after the pass completes.
pub struct TransientHistogram {
    bins: Vec<AtomicU32>,
    max_depth: usize,
    config: TransientConfig,
}

impl TransientHistogram {
    pub fn new(max_depth: usize, config: TransientConfig) -> Self {
        let mut bins = Vec::with_capacity(max_depth * config.bin_num);
        for _ in 0..max_depth * config.bin_num {
            bins.push(AtomicU32::new(0.0f32.to_bits()));
        }
        Self { bins, max_depth, config }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn bin_num(&self) -> usize {
        self.config.bin_num
    }

    pub fn config(&self) -> &TransientConfig {
        &self.config
    }

    /// Map a travelled path length onto a distance bin. Out-of-range
    /// lengths fold into the boundary bins.
    pub fn bucket_of(&self, path_length: Float) -> usize {
        let cfg = &self.config;
        let span = cfg.dist_max - cfg.dist_min;
        if !(span > 0.0) || cfg.bin_num == 0 {
            return 0;
        }
        let scaled = (path_length - cfg.dist_min) / span * cfg.bin_num as Float;
        if !(scaled > 0.0) {
            return 0;
        }
        (scaled.floor() as usize).min(cfg.bin_num - 1)
    }

    /// Lock-free commutative add; safe against concurrent writers to the
    /// same bucket.
    pub fn add(&self, depth: usize, bucket: usize, value: Float) {
        let idx = depth.min(self.max_depth - 1) * self.config.bin_num
            + bucket.min(self.config.bin_num - 1);
        let cell = &self.bins[idx];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            let next = (f32::from_bits(current) + value).to_bits();
            match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn value(&self, depth: usize, bucket: usize) -> Float {
        f32::from_bits(self.bins[depth * self.config.bin_num + bucket].load(Ordering::Relaxed))
    }

    pub fn depth_sum(&self, depth: usize) -> Float {
        (0..self.config.bin_num).map(|b| self.value(depth, b)).sum()
    }

    pub fn total(&self) -> Float {
        (0..self.max_depth).map(|d| self.depth_sum(d)).sum()
    }

    /// Divide all bins by the sample count of the finished pass.
    pub fn normalize(&mut self, total_samples: Float) {
        if total_samples <= 0.0 {
            return;
        }
        for cell in self.bins.iter_mut() {
            let v = f32::from_bits(*cell.get_mut()) / total_samples;
            *cell.get_mut() = v.to_bits();
        }
    }
}
