//! Ranking conventions over partially ordered scores.
//!
//! Trust models report estimates in whatever ordered type suits them, so the
//! rank-correlation metrics first convert an estimate map into rankings.
//! All four textbook conventions are provided; they differ only in how tied
//! values share a position. Higher scores rank better (rank 1 is best), and
//! ties are resolved identically across conventions so the fractional
//! ranking is always the mean of standard and modified competition.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sign of a three-way comparison, with incomparable values treated as ties.
pub fn cmp_sign<V: PartialOrd>(a: &V, b: &V) -> i32 {
    match a.partial_cmp(b) {
        Some(Ordering::Greater) => 1,
        Some(Ordering::Less) => -1,
        _ => 0,
    }
}

/// Keys grouped by descending score; keys within a group compare equal.
fn descending_groups<K, V>(scores: &BTreeMap<K, V>) -> Vec<Vec<K>>
where
    K: Ord + Copy,
    V: PartialOrd,
{
    let mut entries: Vec<(&K, &V)> = scores.iter().collect();
    entries.sort_by(|(ka, va), (kb, vb)| {
        vb.partial_cmp(va)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ka.cmp(kb))
    });

    let mut groups: Vec<Vec<K>> = Vec::new();
    let mut previous: Option<&V> = None;
    for (key, value) in entries {
        let tied = previous.is_some_and(|p| cmp_sign(p, value) == 0);
        if tied {
            if let Some(group) = groups.last_mut() {
                group.push(*key);
            }
        } else {
            groups.push(vec![*key]);
            previous = Some(value);
        }
    }
    groups
}

/// Dense ("1223") ranking: tied items share a rank and the next distinct
/// value takes the immediately following rank.
pub fn dense<K, V>(scores: &BTreeMap<K, V>) -> BTreeMap<K, usize>
where
    K: Ord + Copy,
    V: PartialOrd,
{
    let mut ranks = BTreeMap::new();
    for (index, group) in descending_groups(scores).into_iter().enumerate() {
        for key in group {
            ranks.insert(key, index + 1);
        }
    }
    ranks
}

/// Standard competition ("1224") ranking: each item ranks 1 plus the number
/// of items strictly above it.
pub fn standard_competition<K, V>(scores: &BTreeMap<K, V>) -> BTreeMap<K, usize>
where
    K: Ord + Copy,
    V: PartialOrd,
{
    let mut ranks = BTreeMap::new();
    let mut before = 0;
    for group in descending_groups(scores) {
        let size = group.len();
        for key in group {
            ranks.insert(key, before + 1);
        }
        before += size;
    }
    ranks
}

/// Modified competition ("1334") ranking: each item ranks equal to the
/// number of items at or above it.
pub fn modified_competition<K, V>(scores: &BTreeMap<K, V>) -> BTreeMap<K, usize>
where
    K: Ord + Copy,
    V: PartialOrd,
{
    let mut ranks = BTreeMap::new();
    let mut before = 0;
    for group in descending_groups(scores) {
        let size = group.len();
        for key in group {
            ranks.insert(key, before + size);
        }
        before += size;
    }
    ranks
}

/// Fractional ("1 2.5 2.5 4") ranking: tied items take the mean of the
/// ordinal ranks they occupy, so the ranks always sum to n(n+1)/2.
pub fn fractional<K, V>(scores: &BTreeMap<K, V>) -> BTreeMap<K, f64>
where
    K: Ord + Copy,
    V: PartialOrd,
{
    let mut ranks = BTreeMap::new();
    let mut before = 0;
    for group in descending_groups(scores) {
        let size = group.len();
        let rank = (2 * before + 1 + size) as f64 / 2.0;
        for key in group {
            ranks.insert(key, rank);
        }
        before += size;
    }
    ranks
}
