use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of module names for ad hoc build units.
///
/// Every name returned by one generator must be distinct; the native symbols
/// of two loaded units would otherwise collide.
pub trait ModuleIds {
    fn next_module_name(&mut self) -> String;
}

/// `bridge_<n>` with `n` drawn uniformly from `1..=100000`.
#[derive(Debug)]
pub struct RandomIds {
    rng: StdRng,
    issued: HashSet<u32>,
}

impl RandomIds {
    pub const PREFIX: &'static str = "bridge";
    pub const MAX: u32 = 100_000;

    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleIds for RandomIds {
    fn next_module_name(&mut self) -> String {
        // Once every suffix is taken there is nothing left to avoid.
        if self.issued.len() as u32 >= Self::MAX {
            self.issued.clear();
        }
        loop {
            let n = self.rng.gen_range(1..=Self::MAX);
            if self.issued.insert(n) {
                return format!("{}_{}", Self::PREFIX, n);
            }
        }
    }
}

/// Deterministic `<prefix>_1`, `<prefix>_2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl ModuleIds for SequentialIds {
    fn next_module_name(&mut self) -> String {
        let name = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        name
    }
}
