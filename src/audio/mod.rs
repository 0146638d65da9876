//! Audio loading for the pitch-extraction boundary.

pub mod decoder;
pub mod resample;

/// Mono PCM samples normalized to [-1.0, 1.0].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }
}
