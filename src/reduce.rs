use ahash::AHashMap;

use crate::stats::Statistic;
use crate::worker::PartialMap;

/// Final key→statistic map covering the whole input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    stats: AHashMap<String, Statistic>,
}

impl Measurements {
    pub fn get(&self, key: &str) -> Option<&Statistic> {
        self.stats.get(key)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Statistic)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries in lexicographic key order.
    pub fn sorted(&self) -> Vec<(&str, &Statistic)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Folds `local` into `global` and returns the combined map.
pub fn merge_maps<'a>(mut global: PartialMap<'a>, local: PartialMap<'a>) -> PartialMap<'a> {
    for (key, stat) in local {
        global
            .entry(key)
            .and_modify(|g| g.merge(&stat))
            .or_insert(stat);
    }
    global
}

/// Merges every worker's partial map. Callers must only pass maps from
/// workers that have finished.
pub fn reduce<'a, I>(partials: I) -> Measurements
where
    I: IntoIterator<Item = PartialMap<'a>>,
{
    let mut partials: Vec<PartialMap<'a>> = partials.into_iter().collect();
    // Fold into the largest map so the fewest entries are re-inserted.
    let largest = partials
        .iter()
        .enumerate()
        .max_by_key(|(_, m)| m.len())
        .map(|(i, _)| i);
    let merged = match largest {
        Some(i) => {
            let seed = partials.swap_remove(i);
            partials.into_iter().fold(seed, merge_maps)
        }
        None => PartialMap::default(),
    };

    // Keys were checked for UTF-8 when first seen by a worker.
    let stats = merged
        .into_iter()
        .map(|(key, stat)| (String::from_utf8_lossy(key).into_owned(), stat))
        .collect();
    Measurements { stats }
}
