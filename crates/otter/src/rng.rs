//! Small deterministic PRNG shared by the simulation (jiggle) and roster seeding.

#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform index in `0..upper`; `0` when `upper <= 1`.
    pub fn next_usize(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        // floor(r * upper) rather than `% upper` to avoid modulo bias.
        let v = self.next_f64_unit();
        let idx = (v * (upper as f64)).floor() as usize;
        idx.min(upper - 1)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64_unit() < probability
    }

    /// A vanishingly small non-zero offset used to separate coincident nodes.
    pub(crate) fn jiggle(&mut self) -> f64 {
        let v = (self.next_f64_unit() - 0.5) * 1e-6;
        if v == 0.0 { 1e-7 } else { v }
    }
}
