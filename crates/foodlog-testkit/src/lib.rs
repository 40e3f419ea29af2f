// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use foodlog_app::NewDish;
use std::path::PathBuf;
use time::{Date, Duration, Month};

// (name, calories, proteins, fats, carbs) per typical portion.
static MEALS: [(&str, i64, i64, i64, i64); 16] = [
    ("Овсянка", 350, 12, 6, 60),
    ("Гречневая каша", 310, 11, 3, 62),
    ("Борщ", 240, 9, 11, 24),
    ("Щи", 180, 6, 8, 20),
    ("Пельмени", 520, 24, 26, 46),
    ("Блины со сметаной", 430, 10, 18, 55),
    ("Сырники", 390, 21, 17, 36),
    ("Салат оливье", 290, 8, 22, 14),
    ("Винегрет", 160, 3, 9, 17),
    ("Котлета с пюре", 610, 28, 30, 52),
    ("Плов", 580, 22, 24, 66),
    ("Солянка", 270, 15, 17, 12),
    ("Омлет", 250, 17, 19, 3),
    ("Творог", 180, 28, 5, 5),
    ("Курица гриль", 420, 46, 25, 0),
    ("Яблоко", 80, 0, 0, 19),
];

const PORTION_PERCENT: [i64; 5] = [75, 90, 100, 115, 130];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible meals for demo data and tests.
#[derive(Debug, Clone)]
pub struct MealFaker {
    rng: DeterministicRng,
    reference: Date,
}

impl MealFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            reference: fixture_date(),
        }
    }

    /// Anchors generated dates to `reference` instead of the fixture date.
    pub fn with_reference(mut self, reference: Date) -> Self {
        self.reference = reference;
        self
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// A meal dated within the 30 days ending at the reference date.
    pub fn new_dish(&mut self) -> NewDish {
        let back = self.rng.int_n(30) as i64;
        let date = self
            .reference
            .checked_sub(Duration::days(back))
            .unwrap_or(self.reference);
        self.dish_on(date)
    }

    pub fn dish_on(&mut self, date: Date) -> NewDish {
        let (name, calories, proteins, fats, carbs) = MEALS[self.rng.int_n(MEALS.len())];
        let percent = PORTION_PERCENT[self.rng.int_n(PORTION_PERCENT.len())];
        let scale = |value: i64| value * percent / 100;
        NewDish {
            name: name.to_owned(),
            calories: scale(calories),
            proteins: scale(proteins),
            fats: scale(fats),
            carbs: scale(carbs),
            date,
        }
    }

    /// `per_day` meals for each of the `days` days ending at the reference
    /// date, oldest first.
    pub fn history(&mut self, days: u32, per_day: usize) -> Vec<NewDish> {
        let mut dishes = Vec::with_capacity(days as usize * per_day);
        for back in (0..i64::from(days)).rev() {
            let Some(date) = self.reference.checked_sub(Duration::days(back)) else {
                continue;
            };
            for _ in 0..per_day {
                dishes.push(self.dish_on(date));
            }
        }
        dishes
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("food.db");
    Ok((dir, db_path))
}

pub fn fixture_date() -> Date {
    Date::from_calendar_date(2024, Month::January, 15).unwrap_or(Date::MIN)
}

pub fn meal_names() -> impl Iterator<Item = &'static str> {
    MEALS.iter().map(|(name, ..)| *name)
}

#[cfg(test)]
mod tests {
    use super::{MealFaker, fixture_date, meal_names};
    use std::collections::BTreeSet;
    use time::Duration;

    #[test]
    fn new_deterministic_seed() {
        let mut left = MealFaker::new(42);
        let mut right = MealFaker::new(42);
        assert_eq!(left.new_dish(), right.new_dish());
    }

    #[test]
    fn new_dish_stays_in_window() {
        let mut faker = MealFaker::new(7);
        let oldest = fixture_date() - Duration::days(29);
        for _ in 0..100 {
            let dish = faker.new_dish();
            assert!(dish.date >= oldest && dish.date <= fixture_date());
            assert!(dish.calories >= 0);
            assert!(meal_names().any(|name| name == dish.name));
        }
    }

    #[test]
    fn history_is_oldest_first() {
        let mut faker = MealFaker::new(3).with_reference(fixture_date());
        let dishes = faker.history(3, 2);
        assert_eq!(dishes.len(), 6);
        assert_eq!(dishes[0].date, fixture_date() - Duration::days(2));
        assert_eq!(dishes[5].date, fixture_date());
        assert!(dishes.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = MealFaker::new(seed);
            names.insert(faker.new_dish().name);
        }
        assert!(names.len() >= 5, "got {}", names.len());
    }

    #[test]
    fn int_n() {
        let mut faker = MealFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }
}
