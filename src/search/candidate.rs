//! Enumeration of admissible set sizes
//!
//! Perfect difference sets with λ = 1 are known to exist when k - 1 is a prime
//! power (Singer), so the search only visits k = p + 1 for such p. The
//! degenerate p = 1 gives the trivial set {0, 1} modulo 3.

/// Smallest set size the engine searches.
pub const MIN_K: usize = 2;

/// Largest set size the engine searches.
pub const MAX_K: usize = 103;

/// Return 1 and every prime power strictly below `bound`, ascending.
pub fn prime_powers(bound: usize) -> Vec<usize> {
    let mut powers = Vec::new();
    if bound <= 1 {
        return powers;
    }
    powers.push(1);

    let mut composite = vec![false; bound];
    for i in 2..bound {
        if composite[i] {
            continue;
        }
        powers.push(i);

        let mut multiple = i.saturating_mul(i);
        while multiple < bound {
            composite[multiple] = true;
            multiple += i;
        }

        let mut power = i.saturating_mul(i);
        while power < bound {
            powers.push(power);
            power = power.saturating_mul(i);
        }
    }

    powers.sort_unstable();
    powers.dedup();
    powers
}

/// Set sizes k = p + 1 with `start <= k <= end`, ascending.
pub fn candidate_sizes(start: usize, end: usize) -> Vec<usize> {
    prime_powers(end)
        .into_iter()
        .map(|p| p + 1)
        .filter(|&k| k >= start)
        .collect()
}
