/// Engine-owned deterministic RNG: one instance per search, seeded
/// explicitly, so two runs with the same seed draw the same sequence.
/// A linear congruential generator, same shape as minisat's.
pub struct Random {
    seed: f64,
}

impl Random {
    pub fn new(seed: u64) -> Random {
        // seed must never be 0
        Random { seed: if seed == 0 { 1.0 } else { seed as f64 } }
    }

    /// Returns a random float 0 <= x < 1.
    pub fn drand(&mut self) -> f64 {
        self.seed *= 1389796.0;
        let q = (self.seed / 2147483647.0) as i64;
        self.seed -= (q as f64) * 2147483647.0;
        self.seed / 2147483647.0
    }

    /// Returns a random integer 0 <= x < size.
    pub fn irand(&mut self, size: usize) -> usize {
        (self.drand() * (size as f64)) as usize
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.drand() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::new(42);
        let mut b = Random::new(42);
        for _ in 0..100 {
            assert_eq!(a.irand(1000), b.irand(1000));
        }
    }

    #[test]
    fn irand_stays_in_bounds() {
        let mut r = Random::new(7);
        for _ in 0..1000 {
            assert!(r.irand(5) < 5);
        }
    }

    #[test]
    fn zero_seed_is_not_degenerate() {
        let mut r = Random::new(0);
        let draws: Vec<usize> = (0..10).map(|_| r.irand(10)).collect();
        assert!(draws.iter().any(|&x| x != draws[0]));
    }
}
