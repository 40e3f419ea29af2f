// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Dish, DishId, format_display_date};

pub const LISTING_HEADERS: [&str; 6] = ["Название", "Калории", "Белки", "Жиры", "Углеводы", "Дата"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: DishId,
    pub cells: [String; 6],
}

impl ListingRow {
    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            id: dish.id,
            cells: [
                dish.name.clone(),
                dish.calories.to_string(),
                dish.proteins.to_string(),
                dish.fats.to_string(),
                dish.carbs.to_string(),
                format_display_date(dish.date).unwrap_or_default(),
            ],
        }
    }
}

/// Read-only table of every stored dish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingView {
    rows: Vec<ListingRow>,
}

impl ListingView {
    pub fn headers(&self) -> [&'static str; 6] {
        LISTING_HEADERS
    }

    pub fn refresh(&mut self, records: &[Dish]) {
        self.rows = records.iter().map(ListingRow::from_dish).collect();
    }

    pub fn append(&mut self, record: &Dish) {
        self.rows.push(ListingRow::from_dish(record));
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
