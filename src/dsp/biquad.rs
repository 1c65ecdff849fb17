use std::f32::consts::PI;

/// Low-shelf biquad (2-pole IIR) over interleaved audio
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Clone)]
pub struct LowShelf {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Direct Form II Transposed delay line, one pair per channel
    z1: Vec<f32>,
    z2: Vec<f32>,
}

impl LowShelf {
    /// Create a pass-through filter for the given channel count
    pub fn new(channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: vec![0.0; channels],
            z2: vec![0.0; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.z1.len()
    }

    /// Set low-shelf coefficients
    ///
    /// # Arguments
    /// * `frequency` - Shelf corner frequency in Hz
    /// * `q` - Shelf slope, 0.707 for a smooth transition
    /// * `gain_db` - Gain applied below the corner, in decibels
    /// * `sample_rate` - Sample rate in Hz
    pub fn set_coefficients(&mut self, frequency: f32, q: f32, gain_db: f32, sample_rate: f32) {
        let a = 10.0_f32.powf(gain_db / 40.0);
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        let a0 = (a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha;
        self.b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha) / a0;
        self.b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega) / a0;
        self.b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha) / a0;
        self.a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega) / a0;
        self.a2 = ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha) / a0;
    }

    #[inline]
    fn process_sample(&mut self, input: f32, channel: usize) -> f32 {
        let output = self.b0 * input + self.z1[channel];
        self.z1[channel] = self.b1 * input - self.a1 * output + self.z2[channel];
        self.z2[channel] = self.b2 * input - self.a2 * output;
        output
    }

    /// Filter a buffer of interleaved samples in-place
    ///
    /// A trailing partial frame is left untouched.
    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        let channels = self.channels();
        for frame in buffer.chunks_exact_mut(channels) {
            for (channel, sample) in frame.iter_mut().enumerate() {
                *sample = self.process_sample(*sample, channel);
            }
        }
    }

    /// Clear delay lines
    pub fn reset(&mut self) {
        self.z1.iter_mut().for_each(|z| *z = 0.0);
        self.z2.iter_mut().for_each(|z| *z = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_gain_passes_through() {
        let mut filter = LowShelf::new(2);
        filter.set_coefficients(100.0, 0.707, 0.0, 44100.0);

        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();
        filter.process_buffer(&mut buffer);

        for (a, b) in input.iter().zip(buffer.iter()) {
            assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
        }
    }

    #[test]
    fn test_dc_gain_matches_shelf_gain() {
        let mut filter = LowShelf::new(1);
        filter.set_coefficients(100.0, 0.707, 12.0, 44100.0);

        let mut buffer = vec![1.0f32; 44100];
        filter.process_buffer(&mut buffer);

        let expected = 10.0_f32.powf(12.0 / 20.0);
        let settled = buffer[buffer.len() - 1];
        assert!((settled - expected).abs() < 1e-2, "settled at {}, expected {}", settled, expected);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = LowShelf::new(1);
        filter.set_coefficients(100.0, 0.707, 12.0, 44100.0);

        let mut buffer = vec![1.0f32; 128];
        filter.process_buffer(&mut buffer);
        filter.reset();

        let mut silence = vec![0.0f32; 16];
        filter.process_buffer(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }
}
