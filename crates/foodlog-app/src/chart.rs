// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration};

use crate::{Dish, Field, SubmitError, ValidationError, format_iso_date, parse_user_date};

pub const CHART_TITLE: &str = "Динамика калорий";
pub const CHART_X_LABEL: &str = "Блюда";
pub const CHART_Y_LABEL: &str = "Калории";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub calories: i64,
}

/// Calories per dish in query order. Repeated names stay separate points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_dishes(dishes: &[Dish]) -> Self {
        Self {
            points: dishes
                .iter()
                .map(|dish| ChartPoint {
                    label: dish.name.clone(),
                    calories: dish.calories,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(x, y)` pairs where x is the category index.
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, point)| (index as f64, point.calories as f64))
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.label.as_str()).collect()
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.points.len().saturating_sub(1).max(1);
        [0.0, last as f64]
    }

    /// Always includes zero so a single point is not drawn on the axis.
    pub fn y_bounds(&self) -> [f64; 2] {
        let low = self
            .points
            .iter()
            .map(|point| point.calories)
            .min()
            .unwrap_or(0)
            .min(0);
        let high = self
            .points
            .iter()
            .map(|point| point.calories)
            .max()
            .unwrap_or(0)
            .max(0);
        if high == low {
            return [low as f64, (low + 1) as f64];
        }
        [low as f64, high as f64]
    }
}

/// Date range inputs plus the most recently plotted series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub from: String,
    pub to: String,
    focus: usize,
    series: ChartSeries,
    plotted_range: Option<(Date, Date)>,
}

impl ChartView {
    /// Range of `days` calendar days ending at `today`.
    pub fn new(today: Date, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        let from = today.checked_sub(Duration::days(span)).unwrap_or(today);
        Self {
            from: format_iso_date(from).unwrap_or_default(),
            to: format_iso_date(today).unwrap_or_default(),
            focus: 0,
            series: ChartSeries::default(),
            plotted_range: None,
        }
    }

    pub fn focused(&self) -> Field {
        Field::RANGE[self.focus]
    }

    pub fn toggle_focus(&mut self) {
        self.focus = (self.focus + 1) % Field::RANGE.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.focused_value_mut().push(ch);
    }

    pub fn backspace(&mut self) {
        self.focused_value_mut().pop();
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focused() {
            Field::DateTo => &mut self.to,
            _ => &mut self.from,
        }
    }

    pub fn range(&self) -> Result<(Date, Date), ValidationError> {
        for (field, raw) in [(Field::DateFrom, &self.from), (Field::DateTo, &self.to)] {
            if raw.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        let from = parse_user_date(&self.from).ok_or(ValidationError::InvalidDate(Field::DateFrom))?;
        let to = parse_user_date(&self.to).ok_or(ValidationError::InvalidDate(Field::DateTo))?;
        Ok((from, to))
    }

    /// Re-queries the range through `query` and replaces the series.
    pub fn render<F>(&mut self, query: F) -> Result<&ChartSeries, SubmitError>
    where
        F: FnOnce(Date, Date) -> anyhow::Result<Vec<Dish>>,
    {
        let (from, to) = self.range()?;
        let dishes = query(from, to).map_err(SubmitError::Storage)?;
        self.series = ChartSeries::from_dishes(&dishes);
        self.plotted_range = Some((from, to));
        Ok(&self.series)
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn plotted_range(&self) -> Option<(Date, Date)> {
        self.plotted_range
    }
}
