// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ids::DishId;

pub const APP_TITLE: &str = "Трекер для Тора";

/// One logged food item. Nutrient values are per 100 g.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub calories: i64,
    pub proteins: i64,
    pub fats: i64,
    pub carbs: i64,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDish {
    pub name: String,
    pub calories: i64,
    pub proteins: i64,
    pub fats: i64,
    pub carbs: i64,
    pub date: Date,
}

impl NewDish {
    pub fn into_dish(self, id: DishId) -> Dish {
        Dish {
            id,
            name: self.name,
            calories: self.calories,
            proteins: self.proteins,
            fats: self.fats,
            carbs: self.carbs,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Entry,
    Chart,
}

impl TabKind {
    pub const ALL: [Self; 2] = [Self::Entry, Self::Chart];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Добавить блюдо",
            Self::Chart => "График калорий",
        }
    }
}

/// Every user-editable input across both tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Calories,
    Proteins,
    Fats,
    Carbs,
    Date,
    DateFrom,
    DateTo,
}

impl Field {
    pub const ENTRY: [Self; 6] = [
        Self::Name,
        Self::Calories,
        Self::Proteins,
        Self::Fats,
        Self::Carbs,
        Self::Date,
    ];

    pub const RANGE: [Self; 2] = [Self::DateFrom, Self::DateTo];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Название блюда",
            Self::Calories => "Калории",
            Self::Proteins => "Белки",
            Self::Fats => "Жиры",
            Self::Carbs => "Углеводы",
            Self::Date => "Дата",
            Self::DateFrom => "С этой даты",
            Self::DateTo => "До этой даты",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Название блюда",
            Self::Calories => "Калорий на 100г",
            Self::Proteins => "Белков на 100г",
            Self::Fats => "Жиров на 100г",
            Self::Carbs => "Углеводов на 100г",
            Self::Date | Self::DateFrom | Self::DateTo => "ГГГГ-ММ-ДД",
        }
    }

    pub const fn is_nutrient(self) -> bool {
        matches!(
            self,
            Self::Calories | Self::Proteins | Self::Fats | Self::Carbs
        )
    }
}

/// Storage form; fixed width so lexical order is chronological.
pub fn format_iso_date(value: Date) -> Result<String, time::error::Format> {
    value.format(&format_description!("[year]-[month]-[day]"))
}

pub fn format_display_date(value: Date) -> Result<String, time::error::Format> {
    value.format(&format_description!("[day].[month].[year]"))
}

pub fn parse_iso_date(raw: &str) -> Option<Date> {
    Date::parse(raw, &format_description!("[year]-[month]-[day]")).ok()
}

/// Accepts `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_user_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    parse_iso_date(trimmed)
        .or_else(|| Date::parse(trimmed, &format_description!("[day].[month].[year]")).ok())
}

pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
