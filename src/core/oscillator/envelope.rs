/// A scheduled exponential move from `start` to `target`
#[derive(Debug, Clone, Copy, PartialEq)]
struct ExponentialRamp {
    start: f32,
    target: f32,
    duration: f32,
    elapsed: f32,
}

impl ExponentialRamp {
    fn value(&self) -> f32 {
        if self.elapsed >= self.duration {
            return self.target;
        }
        let progress = self.elapsed / self.duration;
        self.start * (self.target / self.start).powf(progress)
    }
}

/// Gain applied to a voice, with Web Audio style scheduling.
///
/// A ramp starts from whatever value the gain has when it is scheduled and
/// holds its target once the duration has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct GainParam {
    value: f32,
    ramp: Option<ExponentialRamp>,
}

impl GainParam {
    pub fn new(value: f32) -> Self {
        Self { value, ramp: None }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    #[cfg(test)]
    pub fn is_ramping(&self) -> bool {
        self.ramp.is_some()
    }

    /// Jump to `value` immediately, dropping any scheduled ramp
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.ramp = None;
    }

    /// Schedule an exponential ramp to `target` over `duration` seconds.
    ///
    /// Exponential curves cannot cross or touch zero, so a non-positive start or
    /// target falls back to setting the target directly.
    pub fn exponential_ramp_to(&mut self, target: f32, duration: f32) {
        if self.value <= 0.0 || target <= 0.0 || duration <= 0.0 {
            self.set_value(target);
            return;
        }
        self.ramp = Some(ExponentialRamp {
            start: self.value,
            target,
            duration,
            elapsed: 0.0,
        });
    }

    /// Move the parameter forward by `dt` seconds and return the new value
    pub fn advance(&mut self, dt: f32) -> f32 {
        if let Some(ramp) = &mut self.ramp {
            ramp.elapsed += dt;
            self.value = ramp.value();
            if ramp.elapsed >= ramp.duration {
                self.ramp = None;
            }
        }
        self.value
    }
}
