use serde::{Deserialize, Serialize};

/// Virtual milliseconds since the loop was created.
pub type Millis = u64;

pub const EMIT_INTERVAL_MS: Millis = 2_000;
pub const SWEEP_INTERVAL_MS: Millis = 30;
pub const SWEEP_STEP_DEG: f32 = 2.0;
pub const JANITOR_INTERVAL_MS: Millis = 1_000;
pub const PULSE_LIFETIME_MS: Millis = 2_500;
pub const OBJECT_LIFETIME_MS: Millis = 8_000;
pub const SPAWN_THRESHOLD: f64 = 0.4;
pub const MAX_OBJECTS: usize = 16;
pub const ECHO_FLASH_MS: Millis = 300;

/// Half-open numeric interval `[start, end)` used for uniform draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Maps a unit draw in `[0, 1)` onto the interval.
    pub fn lerp(&self, unit: f64) -> f64 {
        self.start + (self.end - self.start) * unit
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value < self.end
    }

    fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }
}

/// Timing and sampling parameters of the sonar loop.
///
/// `Default` carries the display's fixed behaviour; other values exist so
/// tests can build narrower variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub emit_interval_ms: Millis,
    pub sweep_interval_ms: Millis,
    pub sweep_step_deg: f32,
    pub janitor_interval_ms: Millis,
    pub pulse_lifetime_ms: Millis,
    pub object_lifetime_ms: Millis,
    /// A spawn happens when the roll is strictly greater than this.
    pub spawn_threshold: f64,
    pub spawn_delay_ms: Span,
    pub echo_delay_ms: Span,
    pub echo_flash_ms: Millis,
    pub max_objects: usize,
    pub angle_deg: Span,
    pub distance: Span,
    pub size: Span,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            emit_interval_ms: EMIT_INTERVAL_MS,
            sweep_interval_ms: SWEEP_INTERVAL_MS,
            sweep_step_deg: SWEEP_STEP_DEG,
            janitor_interval_ms: JANITOR_INTERVAL_MS,
            pulse_lifetime_ms: PULSE_LIFETIME_MS,
            object_lifetime_ms: OBJECT_LIFETIME_MS,
            spawn_threshold: SPAWN_THRESHOLD,
            spawn_delay_ms: Span::new(500.0, 1_500.0),
            echo_delay_ms: Span::new(100.0, 300.0),
            echo_flash_ms: ECHO_FLASH_MS,
            max_objects: MAX_OBJECTS,
            angle_deg: Span::new(0.0, 360.0),
            distance: Span::new(20.0, 55.0),
            size: Span::new(3.0, 11.0),
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> SonarResult<()> {
        let intervals = [
            ("emit_interval_ms", self.emit_interval_ms),
            ("sweep_interval_ms", self.sweep_interval_ms),
            ("janitor_interval_ms", self.janitor_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(SonarError::InvalidParams(format!("{name} must be positive")));
            }
        }

        if !self.sweep_step_deg.is_finite() || self.sweep_step_deg < 0.0 {
            return Err(SonarError::InvalidParams(
                "sweep_step_deg must be finite and non-negative".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.spawn_threshold) {
            return Err(SonarError::InvalidParams(format!(
                "spawn_threshold {} outside [0, 1]",
                self.spawn_threshold
            )));
        }

        if self.max_objects == 0 {
            return Err(SonarError::InvalidParams(
                "max_objects must be at least 1".into(),
            ));
        }

        let spans = [
            ("spawn_delay_ms", self.spawn_delay_ms),
            ("echo_delay_ms", self.echo_delay_ms),
            ("angle_deg", self.angle_deg),
            ("distance", self.distance),
            ("size", self.size),
        ];
        for (name, span) in spans {
            if !span.is_valid() {
                return Err(SonarError::InvalidParams(format!(
                    "{name} must be a non-empty interval, got [{}, {})",
                    span.start, span.end
                )));
            }
        }

        if self.spawn_delay_ms.start < 0.0 || self.echo_delay_ms.start < 0.0 {
            return Err(SonarError::InvalidParams("delays cannot be negative".into()));
        }

        Ok(())
    }
}

/// Error type shared by the sonar core.
#[derive(thiserror::Error, Debug)]
pub enum SonarError {
    #[error("invalid simulation parameters: {0}")]
    InvalidParams(String),
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
}

pub type SonarResult<T> = Result<T, SonarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_validate() {
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let params = SimulationParams {
            sweep_interval_ms: 0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("sweep_interval_ms"));
    }

    #[test]
    fn inverted_span_is_rejected() {
        let params = SimulationParams {
            distance: Span::new(55.0, 20.0),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SonarError::InvalidParams(_))
        ));
    }

    #[test]
    fn span_lerp_maps_unit_interval() {
        let span = Span::new(20.0, 55.0);
        assert_eq!(span.lerp(0.0), 20.0);
        assert!(span.contains(span.lerp(0.999_999)));
        assert!(!span.contains(55.0));
    }
}
