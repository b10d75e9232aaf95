//! Deterministic CPU-bound workload used as a liveness signal.
//!
//! The naive recursive Fibonacci gives a deep, recognizable call stack that a
//! sampling profiler would capture. It is intentionally exponential.

use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::error::WorkloadFault;

/// Default Fibonacci input.
pub const DEFAULT_FIBONACCI_INPUT: u32 = 20;

/// Largest input the probe accepts before refusing to recurse.
pub const DEFAULT_MAX_INPUT: u32 = 40;

/// Largest `n` whose Fibonacci number fits in a `u64`.
pub const FIBONACCI_U64_LIMIT: u32 = 93;

/// One timed workload execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSample {
    pub n: u32,
    pub result: u64,
    pub elapsed: Duration,
}

impl WorkloadSample {
    /// Elapsed milliseconds rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100_000.0).round() / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadProbe {
    max_input: u32,
}

impl WorkloadProbe {
    /// Probe refusing inputs above `max_input`, capped at [`FIBONACCI_U64_LIMIT`].
    pub fn new(max_input: u32) -> Self {
        Self {
            max_input: max_input.min(FIBONACCI_U64_LIMIT),
        }
    }

    pub fn max_input(&self) -> u32 {
        self.max_input
    }

    /// Compute `fibonacci(n)` and time it.
    pub fn run(&self, n: u32) -> Result<WorkloadSample, WorkloadFault> {
        if n > self.max_input {
            return Err(WorkloadFault::InputTooLarge {
                n,
                max: self.max_input,
            });
        }

        let start = Instant::now();
        let result = fibonacci(black_box(n));
        let elapsed = start.elapsed();

        Ok(WorkloadSample { n, result, elapsed })
    }
}

impl Default for WorkloadProbe {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT)
    }
}

/// Naive recursive Fibonacci. `n` must not exceed [`FIBONACCI_U64_LIMIT`].
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return u64::from(n);
    }
    fibonacci(black_box(n - 1)) + fibonacci(black_box(n - 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_small_values() {
        let expected = [0u64, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as u32), *want);
        }
    }

    #[test]
    fn test_run_default_input_is_deterministic() {
        let probe = WorkloadProbe::default();
        let first = probe.run(DEFAULT_FIBONACCI_INPUT).unwrap();
        let second = probe.run(DEFAULT_FIBONACCI_INPUT).unwrap();
        assert_eq!(first.result, 6765);
        assert_eq!(second.result, 6765);
        assert!(first.elapsed_ms() >= 0.0);
    }

    #[test]
    fn test_run_rejects_oversized_input() {
        let err = WorkloadProbe::new(25).run(26).unwrap_err();
        assert_eq!(err, WorkloadFault::InputTooLarge { n: 26, max: 25 });
    }

    #[test]
    fn test_ceiling_capped_at_u64_limit() {
        assert_eq!(WorkloadProbe::new(200).max_input(), FIBONACCI_U64_LIMIT);
        assert_eq!(
            WorkloadProbe::new(200).run(94).unwrap_err(),
            WorkloadFault::InputTooLarge {
                n: 94,
                max: FIBONACCI_U64_LIMIT
            }
        );
    }

    #[test]
    fn test_elapsed_ms_rounding() {
        let sample = WorkloadSample {
            n: 20,
            result: 6765,
            elapsed: Duration::from_nanos(1_234_567),
        };
        assert_eq!(sample.elapsed_ms(), 1.23);
    }
}
