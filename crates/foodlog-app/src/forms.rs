// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{Dish, DishId, Field, NewDish, format_iso_date, parse_user_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(Field),
    InvalidNumber(Field),
    InvalidDate(Field),
}

impl ValidationError {
    pub const fn field(self) -> Field {
        match self {
            Self::MissingField(field) | Self::InvalidNumber(field) | Self::InvalidDate(field) => {
                field
            }
        }
    }

    /// Text shown in the error dialog.
    pub fn message(self) -> String {
        match self {
            Self::MissingField(_) => "Заполните все поля".to_owned(),
            Self::InvalidNumber(field) => {
                format!("Поле «{}» должно быть целым числом", field.label())
            }
            Self::InvalidDate(field) => {
                format!(
                    "Поле «{}» должно содержать дату ГГГГ-ММ-ДД или ДД.ММ.ГГГГ",
                    field.label()
                )
            }
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing value for {field:?}"),
            Self::InvalidNumber(field) => write!(f, "invalid integer value for {field:?}"),
            Self::InvalidDate(field) => write!(f, "invalid date value for {field:?}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum SubmitError {
    Invalid(ValidationError),
    Storage(anyhow::Error),
}

impl SubmitError {
    pub fn message(&self) -> String {
        match self {
            Self::Invalid(error) => error.message(),
            Self::Storage(error) => format!("Не удалось сохранить блюдо: {error:#}"),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(error) => write!(f, "{error}"),
            Self::Storage(error) => write!(f, "storage error: {error:#}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(error) => Some(error),
            Self::Storage(error) => Some(&**error),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

/// Text inputs of the "add dish" tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub calories: String,
    pub proteins: String,
    pub fats: String,
    pub carbs: String,
    pub date: String,
    focus: usize,
}

impl EntryForm {
    pub fn new(today: Date) -> Self {
        Self {
            name: String::new(),
            calories: String::new(),
            proteins: String::new(),
            fats: String::new(),
            carbs: String::new(),
            // Left empty if formatting fails; submit rejects an empty date.
            date: format_iso_date(today).unwrap_or_default(),
            focus: 0,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ENTRY[self.focus]
    }

    pub fn focus(&mut self, field: Field) {
        if let Some(index) = Field::ENTRY.iter().position(|candidate| *candidate == field) {
            self.focus = index;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ENTRY.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ENTRY.len() - 1) % Field::ENTRY.len();
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Calories => &self.calories,
            Field::Proteins => &self.proteins,
            Field::Fats => &self.fats,
            Field::Carbs => &self.carbs,
            Field::Date | Field::DateFrom | Field::DateTo => &self.date,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Calories => &mut self.calories,
            Field::Proteins => &mut self.proteins,
            Field::Fats => &mut self.fats,
            Field::Carbs => &mut self.carbs,
            Field::Date | Field::DateFrom | Field::DateTo => &mut self.date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn insert_char(&mut self, ch: char) {
        let field = self.focused();
        self.value_mut(field).push(ch);
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    pub fn clear(&mut self, today: Date) {
        *self = Self::new(today);
    }

    pub fn validate(&self) -> Result<NewDish, ValidationError> {
        if let Some(field) = Field::ENTRY
            .iter()
            .copied()
            .find(|field| self.value(*field).trim().is_empty())
        {
            return Err(ValidationError::MissingField(field));
        }

        let calories = parse_nutrient(&self.calories, Field::Calories)?;
        let proteins = parse_nutrient(&self.proteins, Field::Proteins)?;
        let fats = parse_nutrient(&self.fats, Field::Fats)?;
        let carbs = parse_nutrient(&self.carbs, Field::Carbs)?;
        let date = parse_user_date(&self.date).ok_or(ValidationError::InvalidDate(Field::Date))?;

        Ok(NewDish {
            name: self.name.clone(),
            calories,
            proteins,
            fats,
            carbs,
            date,
        })
    }

    /// Validates, hands the record to `insert`, then resets the inputs.
    /// Inputs are kept untouched when any step fails.
    pub fn submit<F>(&mut self, today: Date, insert: F) -> Result<Dish, SubmitError>
    where
        F: FnOnce(&NewDish) -> anyhow::Result<DishId>,
    {
        let new_dish = self.validate()?;
        let id = insert(&new_dish).map_err(SubmitError::Storage)?;
        self.clear(today);
        Ok(new_dish.into_dish(id))
    }
}

fn parse_nutrient(raw: &str, field: Field) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber(field))
}

#[cfg(test)]
mod tests {
    use super::{EntryForm, SubmitError, ValidationError};
    use crate::{DishId, Field};
    use anyhow::{Result, anyhow};
    use time::{Date, Month};

    fn day(value: u8) -> Result<Date> {
        Ok(Date::from_calendar_date(2024, Month::January, value)?)
    }

    fn filled_form() -> Result<EntryForm> {
        let mut form = EntryForm::new(day(1)?);
        form.set(Field::Name, "Овсянка");
        form.set(Field::Calories, "350");
        form.set(Field::Proteins, "12");
        form.set(Field::Fats, "6");
        form.set(Field::Carbs, "60");
        Ok(form)
    }

    #[test]
    fn new_form_prefills_date_only() -> Result<()> {
        let form = EntryForm::new(day(1)?);
        assert_eq!(form.date, "2024-01-01");
        assert!(form.name.is_empty());
        assert_eq!(form.focused(), Field::Name);
        Ok(())
    }

    #[test]
    fn empty_field_is_reported_before_bad_number() -> Result<()> {
        let mut form = filled_form()?;
        form.set(Field::Calories, "abc");
        form.set(Field::Carbs, "   ");
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField(Field::Carbs))
        );
        Ok(())
    }

    #[test]
    fn every_empty_field_is_missing() -> Result<()> {
        for field in Field::ENTRY {
            let mut form = filled_form()?;
            form.set(field, "");
            assert_eq!(form.validate(), Err(ValidationError::MissingField(field)));
        }
        Ok(())
    }

    #[test]
    fn non_integer_nutrient_is_invalid_number() -> Result<()> {
        let mut form = filled_form()?;
        form.set(Field::Fats, "6.5");
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidNumber(Field::Fats))
        );
        Ok(())
    }

    #[test]
    fn negative_values_are_accepted() -> Result<()> {
        let mut form = filled_form()?;
        form.set(Field::Calories, "-20");
        let dish = form.validate().map_err(|error| anyhow!("{error}"))?;
        assert_eq!(dish.calories, -20);
        Ok(())
    }

    #[test]
    fn bad_date_is_invalid_date() -> Result<()> {
        let mut form = filled_form()?;
        form.set(Field::Date, "2024-13-01");
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidDate(Field::Date))
        );
        Ok(())
    }

    #[test]
    fn submit_inserts_then_clears_inputs() -> Result<()> {
        let mut form = filled_form()?;
        let mut inserted = Vec::new();
        let dish = form
            .submit(day(2)?, |new_dish| {
                inserted.push(new_dish.clone());
                Ok(DishId::new(7))
            })
            .map_err(|error| anyhow!("{error}"))?;

        assert_eq!(dish.id, DishId::new(7));
        assert_eq!(dish.name, "Овсянка");
        assert_eq!(dish.calories, 350);
        assert_eq!(dish.date, day(1)?);
        assert_eq!(inserted.len(), 1);
        assert!(form.name.is_empty());
        assert!(form.calories.is_empty());
        assert_eq!(form.date, "2024-01-02");
        Ok(())
    }

    #[test]
    fn submit_skips_insert_on_validation_error() -> Result<()> {
        let mut form = filled_form()?;
        form.set(Field::Name, "");
        let mut calls = 0;
        let result = form.submit(day(2)?, |_| {
            calls += 1;
            Ok(DishId::new(1))
        });
        assert!(matches!(
            result,
            Err(SubmitError::Invalid(ValidationError::MissingField(
                Field::Name
            )))
        ));
        assert_eq!(calls, 0);
        assert_eq!(form.calories, "350");
        Ok(())
    }

    #[test]
    fn storage_failure_keeps_inputs() -> Result<()> {
        let mut form = filled_form()?;
        let result = form.submit(day(2)?, |_| Err(anyhow!("disk full")));
        let error = result.expect_err("storage failure should surface");
        assert!(matches!(error, SubmitError::Storage(_)));
        assert!(error.message().contains("disk full"));
        assert_eq!(form.name, "Овсянка");
        Ok(())
    }

    #[test]
    fn focus_wraps_in_both_directions() -> Result<()> {
        let mut form = EntryForm::new(day(1)?);
        form.focus_prev();
        assert_eq!(form.focused(), Field::Date);
        form.focus_next();
        assert_eq!(form.focused(), Field::Name);
        form.insert_char('Щ');
        form.insert_char('и');
        form.backspace();
        assert_eq!(form.name, "Щ");
        Ok(())
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            ValidationError::MissingField(Field::Name).message(),
            "Заполните все поля"
        );
        assert!(
            ValidationError::InvalidNumber(Field::Calories)
                .message()
                .contains("Калории")
        );
    }
}
