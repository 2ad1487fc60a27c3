use anyhow::{Result, bail};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::cnf::{Cnf, Lit};

/// Uniform random k-CNF over `1..=vars`. Variables within one clause are
/// distinct.
pub fn random_cnf(vars: u32, clauses: usize, width: usize, seed: u64) -> Result<Cnf> {
    if vars == 0 {
        bail!("vars must be >= 1");
    }
    if width == 0 || width > vars as usize {
        bail!("width must be in 1..={}, got {}", vars, width);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cnf = Cnf::new(vars);
    for _ in 0..clauses {
        let mut clause = Vec::with_capacity(width);
        while clause.len() < width {
            let var = rng.random_range(1..=vars);
            if clause.iter().any(|l: &Lit<u32>| l.var == var) {
                continue;
            }
            clause.push(Lit::new(var, rng.random::<bool>()));
        }
        cnf.add_clause(clause);
    }
    Ok(cnf)
}

/// `count` distinct variables with random values.
pub fn random_premises(vars: u32, count: usize, seed: u64) -> Result<IndexMap<u32, bool>> {
    if count > vars as usize {
        bail!("cannot fix {} premises over {} variables", count, vars);
    }

    // separate stream from the clause generator under the same seed
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut premises = IndexMap::with_capacity(count);
    while premises.len() < count {
        let var = rng.random_range(1..=vars);
        if !premises.contains_key(&var) {
            premises.insert(var, rng.random::<bool>());
        }
    }
    Ok(premises)
}
