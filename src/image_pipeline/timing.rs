//! Per-stage wall-clock timing for the canopy pipeline

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Ordered list of stage durations; repeated stage names are also summed.
#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        *self.step_map.entry(name.clone()).or_insert(Duration::ZERO) += duration;
        self.steps.push(StepTiming { name, duration });
    }

    /// Runs `f` and records how long it took under `name`.
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(name);
        let value = f();
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
        value
    }

    /// Folds the per-stage totals of `other` into this one, keeping stage order.
    pub fn merge(&mut self, other: &PipelineTimings) {
        for step in &other.steps {
            if let Some(total) = self.step_map.get_mut(&step.name) {
                *total += step.duration;
                if let Some(existing) = self.steps.iter_mut().find(|s| s.name == step.name) {
                    existing.duration += step.duration;
                }
            } else {
                self.add_step(step.name.clone(), step.duration);
            }
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            info!(
                "{:<20} {:>12.3}ms ({:>5.1}%)",
                step.name,
                step.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        info!("{:<20} {:>12.3}ms", "total", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_steps_are_summed() {
        let mut timings = PipelineTimings::new();
        timings.add_step("histogram", Duration::from_millis(2));
        timings.add_step("gaps", Duration::from_millis(5));
        timings.add_step("histogram", Duration::from_millis(3));

        assert_eq!(timings.get_step("histogram"), Some(Duration::from_millis(5)));
        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.total_duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_merge_accumulates_per_stage() {
        let mut batch = PipelineTimings::new();
        for _ in 0..3 {
            let mut image = PipelineTimings::new();
            image.add_step("load", Duration::from_millis(4));
            image.add_step("pai", Duration::from_millis(1));
            batch.merge(&image);
        }

        assert_eq!(batch.steps().len(), 2);
        assert_eq!(batch.get_step("load"), Some(Duration::from_millis(12)));
        assert_eq!(batch.steps()[1].duration, Duration::from_millis(3));
        assert_eq!(batch.total_duration(), Duration::from_millis(15));
    }

    #[test]
    fn test_time_returns_closure_value() {
        let mut timings = PipelineTimings::new();
        let value = timings.time("work", || 42);

        assert_eq!(value, 42);
        assert!(timings.get_step("work").is_some());
    }
}
