//! Catch rolls.
//!
//! A throw succeeds when an Exp(1) draw scaled by [`CATCH_SCALE`] beats the
//! creature's base experience, so the success probability is
//! `exp(-base_experience / CATCH_SCALE)`.

use rand::Rng;

use pokedex_core::constants::CATCH_SCALE;

/// Rolls one catch attempt against a creature's base experience.
pub fn catch_roll<R: Rng + ?Sized>(rng: &mut R, base_experience: u32) -> bool {
    let uniform: f64 = rng.gen();
    // Inverse CDF of Exp(1); 1 - u is in (0, 1] so ln never sees zero.
    let draw = -(1.0 - uniform).ln();
    draw * CATCH_SCALE > f64::from(base_experience)
}

/// Probability that [`catch_roll`] succeeds.
pub fn catch_probability(base_experience: u32) -> f64 {
    (-f64::from(base_experience) / CATCH_SCALE).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_case::test_case;

    #[test_case(0 ; "trivial")]
    #[test_case(50 ; "pidgey")]
    #[test_case(112 ; "pikachu")]
    #[test_case(306 ; "mewtwo")]
    fn test_rate_matches_probability(base_experience: u32) {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let trials = 20_000;
        let caught = (0..trials).filter(|_| catch_roll(&mut rng, base_experience)).count();

        let rate = caught as f64 / trials as f64;
        assert!((rate - catch_probability(base_experience)).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn test_probability_decreases_with_experience() {
        assert!((catch_probability(0) - 1.0).abs() < f64::EPSILON);
        assert!(catch_probability(50) > catch_probability(112));
        assert!(catch_probability(600) < 1e-4);
    }
}
