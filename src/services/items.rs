//! Quiz item generation.
//!
//! Every generator takes the random source as an explicit argument so a seeded
//! `StdRng` reproduces a session's payload exactly.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;

use crate::services::presets::{preset_for, Difficulty, Mode};
use crate::services::themes::{pool_for, resolve_theme, theme_ids, DEFAULT_THEME_ID};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizItem {
    pub item_id: String,
    pub target: String,
    pub options: Vec<String>,
    /// Text shown during the exposure phase instead of `target`.
    pub prompt: Option<String>,
    /// Expected answer when it differs from `target`.
    pub correct: Option<String>,
}

impl QuizItem {
    fn new(item_id: String, target: &str, options: Vec<String>) -> Self {
        Self {
            item_id,
            target: target.to_string(),
            options,
            prompt: None,
            correct: None,
        }
    }

    /// The value a player has to pick or spell.
    pub fn expected_answer(&self) -> &str {
        self.correct.as_deref().unwrap_or(&self.target)
    }
}

/// Builds the item set for a mode using the tier's preset option count.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    mode: Mode,
    n: usize,
    difficulty: Difficulty,
    theme_id: i64,
) -> Vec<QuizItem> {
    let options = preset_for(difficulty).options;
    match mode {
        Mode::WordFlash | Mode::Survival => word_flash_items(rng, n, difficulty, theme_id, options),
        Mode::OddOneOut => odd_one_out_items(rng, n, difficulty, theme_id, options),
        Mode::LetterBuilder => letter_builder_items(rng, n, difficulty, theme_id),
    }
}

pub fn word_flash_items<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    difficulty: Difficulty,
    theme_id: i64,
    options_count: usize,
) -> Vec<QuizItem> {
    let words = distinct_pool(theme_id, difficulty);
    let targets = target_sequence(rng, &words, n);

    targets
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            let mut distractors: Vec<&str> = words.iter().copied().filter(|w| *w != target).collect();
            distractors.shuffle(rng);

            let mut options = Vec::with_capacity(options_count.max(1));
            options.push(target.to_string());
            options.extend(
                distractors
                    .into_iter()
                    .take(options_count.saturating_sub(1))
                    .map(str::to_string),
            );
            options.shuffle(rng);

            QuizItem::new(format!("wf_t{theme_id}_{difficulty}_{i}"), target, options)
        })
        .collect()
}

pub fn odd_one_out_items<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    difficulty: Difficulty,
    theme_id: i64,
    options_count: usize,
) -> Vec<QuizItem> {
    let options_count = options_count.max(3);
    let group_size = options_count.saturating_sub(1).max(2);

    let base_words = distinct_pool(theme_id, difficulty);
    let mut base_pool = base_words.clone();
    base_pool.shuffle(rng);

    // unknown ids generate from the default theme, so exclude that one instead
    let home_id = resolve_theme(theme_id).id;
    let mut other_themes: Vec<i64> = theme_ids().into_iter().filter(|id| *id != home_id).collect();
    if other_themes.is_empty() {
        other_themes.push(DEFAULT_THEME_ID);
    }

    (0..n)
        .map(|i| {
            let group = majority_group(&base_pool, i, group_size);

            let odd_theme = other_themes.choose(rng).copied().unwrap_or(DEFAULT_THEME_ID);
            let odd = pick_odd_word(rng, pool_for(odd_theme, difficulty), &base_words, &group);

            let mut options: Vec<&str> = Vec::with_capacity(options_count);
            for word in group.iter().copied().chain(std::iter::once(odd)) {
                if !options.contains(&word) {
                    options.push(word);
                }
            }

            while options.len() < options_count {
                let unused: Vec<&str> = base_words
                    .iter()
                    .copied()
                    .filter(|w| !options.contains(w))
                    .collect();
                match unused.choose(rng) {
                    Some(&word) => options.push(word),
                    None => break,
                }
            }

            options.truncate(options_count);
            options.shuffle(rng);

            QuizItem::new(
                format!("ooo_t{theme_id}_{difficulty}_{i}"),
                odd,
                options.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Letter tiles for spelling the target; tiles keep repeated letters.
pub fn letter_builder_items<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    difficulty: Difficulty,
    theme_id: i64,
) -> Vec<QuizItem> {
    let words = distinct_pool(theme_id, difficulty);
    let targets = target_sequence(rng, &words, n);

    targets
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            let letters: Vec<String> = target.chars().map(String::from).collect();
            let mut tiles = letters.clone();
            tiles.shuffle(rng);

            let distinct_letters = {
                let mut seen = letters.clone();
                seen.sort();
                seen.dedup();
                seen.len()
            };
            if tiles == letters && distinct_letters > 1 {
                tiles.rotate_left(1);
            }

            let mut item = QuizItem::new(format!("lb_t{theme_id}_{difficulty}_{i}"), target, tiles);
            item.correct = Some(target.to_string());
            item
        })
        .collect()
}

fn distinct_pool(theme_id: i64, difficulty: Difficulty) -> Vec<&'static str> {
    let mut words: Vec<&'static str> = Vec::new();
    for &word in pool_for(theme_id, difficulty) {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

/// Shuffled targets, distinct while the pool lasts and cycling after that.
fn target_sequence<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str], n: usize) -> Vec<&'a str> {
    if words.is_empty() {
        return Vec::new();
    }
    let mut pool = words.to_vec();
    pool.shuffle(rng);
    if pool.len() >= n {
        pool.truncate(n);
    }
    (0..n).map(|i| pool[i % pool.len()]).collect()
}

/// Walks the shuffled pool from `offset`, wrapping, until `size` distinct words
/// are collected or every position has been visited once.
fn majority_group<'a>(pool: &[&'a str], offset: usize, size: usize) -> Vec<&'a str> {
    let mut group: Vec<&'a str> = Vec::with_capacity(size);
    if pool.is_empty() {
        return group;
    }
    for step in 0..pool.len() {
        if group.len() >= size {
            break;
        }
        let word = pool[(offset + step) % pool.len()];
        if !group.contains(&word) {
            group.push(word);
        }
    }
    group
}

/// Prefers words foreign to the home pool, then words outside the group, then anything.
fn pick_odd_word<R: Rng + ?Sized>(
    rng: &mut R,
    odd_pool: &'static [&'static str],
    home_pool: &[&str],
    group: &[&str],
) -> &'static str {
    let foreign: Vec<&'static str> = odd_pool
        .iter()
        .copied()
        .filter(|w| !home_pool.contains(w))
        .collect();
    if let Some(&word) = foreign.choose(rng) {
        return word;
    }

    let outside_group: Vec<&'static str> = odd_pool
        .iter()
        .copied()
        .filter(|w| !group.contains(w))
        .collect();
    if let Some(&word) = outside_group.choose(rng) {
        return word;
    }

    odd_pool.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn word_flash_targets_are_distinct_when_pool_is_large_enough() {
        let items = word_flash_items(&mut rng(7), 7, Difficulty::Normal, 1, 4);
        assert_eq!(items.len(), 7);
        let targets: HashSet<&str> = items.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(targets.len(), 7);
    }

    #[test]
    fn word_flash_options_contain_target_once() {
        let items = word_flash_items(&mut rng(11), 9, Difficulty::Hard, 2, 5);
        for item in &items {
            let hits = item.options.iter().filter(|o| **o == item.target).count();
            assert_eq!(hits, 1, "{item:?}");
            assert!(item.options.len() <= 5);
            let unique: HashSet<&String> = item.options.iter().collect();
            assert_eq!(unique.len(), item.options.len());
        }
    }

    #[test]
    fn word_flash_cycles_targets_when_pool_runs_out() {
        // theme 4 hard has four words
        let items = word_flash_items(&mut rng(3), 9, Difficulty::Hard, 4, 5);
        assert_eq!(items.len(), 9);
        let first_cycle: Vec<&str> = items[..4].iter().map(|i| i.target.as_str()).collect();
        let unique: HashSet<&str> = first_cycle.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.target, items[i % 4].target);
            // pool of four cannot fill five options
            assert_eq!(item.options.len(), 4);
        }
    }

    #[test]
    fn word_flash_item_ids_encode_theme_difficulty_and_index() {
        let items = word_flash_items(&mut rng(1), 3, Difficulty::Easy, 3, 3);
        let ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["wf_t3_easy_0", "wf_t3_easy_1", "wf_t3_easy_2"]);
    }

    #[test]
    fn same_seed_reproduces_the_same_items() {
        let a = generate(&mut rng(99), Mode::OddOneOut, 7, Difficulty::Normal, 2);
        let b = generate(&mut rng(99), Mode::OddOneOut, 7, Difficulty::Normal, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn odd_one_out_target_comes_from_another_theme() {
        for theme_id in theme_ids() {
            for difficulty in Difficulty::ALL {
                let home: HashSet<&str> = pool_for(theme_id, difficulty).iter().copied().collect();
                let items = odd_one_out_items(&mut rng(theme_id as u64), 12, difficulty, theme_id, 4);
                for item in &items {
                    assert!(!home.contains(item.target.as_str()), "{item:?}");
                    assert!(item.options.contains(&item.target));
                    assert_eq!(item.options.len(), 4);
                    let in_group = item.options.iter().filter(|o| home.contains(o.as_str())).count();
                    assert_eq!(in_group, 3);
                }
            }
        }
    }

    #[test]
    fn odd_one_out_raises_option_count_to_three() {
        let items = odd_one_out_items(&mut rng(5), 2, Difficulty::Easy, 1, 1);
        for item in &items {
            assert_eq!(item.options.len(), 3);
        }
        assert_eq!(items[1].item_id, "ooo_t1_easy_1");
    }

    #[test]
    fn odd_one_out_handles_shared_words_across_themes() {
        // "впечатление" sits in both the animals and food hard tiers
        for seed in 0..50 {
            let items = odd_one_out_items(&mut rng(seed), 5, Difficulty::Hard, 4, 5);
            for item in &items {
                assert_ne!(item.target, "впечатление");
                assert_eq!(item.options.len(), 5);
                let unique: HashSet<&String> = item.options.iter().collect();
                assert_eq!(unique.len(), 5);
            }
        }
    }

    #[test]
    fn majority_group_terminates_on_small_pools() {
        let group = majority_group(&["a", "b"], 5, 4);
        assert_eq!(group.len(), 2);
        assert!(majority_group(&[], 0, 3).is_empty());
    }

    #[test]
    fn odd_word_is_foreign_for_unknown_theme_ids() {
        for theme_id in [-1, 7, 99] {
            let home = pool_for(theme_id, Difficulty::Normal);
            for seed in 0..20 {
                for item in odd_one_out_items(&mut rng(seed), 7, Difficulty::Normal, theme_id, 4) {
                    assert!(!home.contains(&item.target.as_str()), "{item:?}");
                    assert!(item.options.contains(&item.target));
                }
            }
        }
    }

    #[test]
    fn majority_group_starts_at_item_offset() {
        let group = majority_group(&["a", "b", "c", "d"], 2, 3);
        assert_eq!(group, vec!["c", "d", "a"]);
    }

    #[test]
    fn letter_builder_tiles_spell_the_target() {
        let items = letter_builder_items(&mut rng(21), 6, Difficulty::Easy, 1);
        assert_eq!(items.len(), 6);
        for item in &items {
            assert_eq!(item.correct.as_deref(), Some(item.target.as_str()));
            assert_eq!(item.expected_answer(), item.target);
            let mut tiles: Vec<String> = item.options.clone();
            let mut letters: Vec<String> = item.target.chars().map(String::from).collect();
            tiles.sort();
            letters.sort();
            assert_eq!(tiles, letters);
            assert!(item.item_id.starts_with("lb_t1_easy_"));
        }
    }

    #[test]
    fn letter_builder_never_hands_out_the_spelled_word() {
        for seed in 0..40 {
            for item in letter_builder_items(&mut rng(seed), 6, Difficulty::Easy, 2) {
                if item.target.chars().collect::<HashSet<_>>().len() > 1 {
                    assert_ne!(item.options.concat(), item.target);
                }
            }
        }
    }

    #[test]
    fn survival_uses_word_flash_items() {
        let items = generate(&mut rng(8), Mode::Survival, 7, Difficulty::Normal, 1);
        assert!(items.iter().all(|i| i.item_id.starts_with("wf_t1_normal_")));
        assert!(items.iter().all(|i| i.options.len() == 4));
    }
}
