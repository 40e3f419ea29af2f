// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use foodlog_app::{Dish, DishId, NewDish};
use foodlog_db::Store;
use time::Date;

/// Application context handed to the UI; borrows the one open store.
pub struct DbRuntime<'a> {
    store: &'a Store,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl foodlog_tui::AppRuntime for DbRuntime<'_> {
    fn list_dishes(&mut self) -> Result<Vec<Dish>> {
        self.store.list_dishes()
    }

    fn list_dishes_in_range(&mut self, from: Date, to: Date) -> Result<Vec<Dish>> {
        self.store.list_dishes_in_range(from, to)
    }

    fn insert_dish(&mut self, dish: &NewDish) -> Result<DishId> {
        self.store.insert_dish(dish)
    }
}

#[cfg(test)]
mod tests {
    use super::DbRuntime;
    use anyhow::Result;
    use foodlog_db::Store;
    use foodlog_testkit::{MealFaker, fixture_date};
    use foodlog_tui::AppRuntime;
    use time::Duration;

    #[test]
    fn inserted_dishes_are_listed_through_runtime() -> Result<()> {
        let store = Store::open_memory()?;
        store.ensure_schema()?;

        let mut runtime = DbRuntime::new(&store);
        let mut faker = MealFaker::new(5);
        let first = faker.dish_on(fixture_date());
        let id = runtime.insert_dish(&first)?;

        let dishes = runtime.list_dishes()?;
        assert_eq!(dishes, vec![first.into_dish(id)]);
        assert_eq!(store.count_dishes()?, 1);
        Ok(())
    }

    #[test]
    fn range_query_is_delegated_to_store() -> Result<()> {
        let store = Store::open_memory()?;
        store.ensure_schema()?;

        let mut runtime = DbRuntime::new(&store);
        let mut faker = MealFaker::new(9);
        for new in faker.history(5, 1) {
            runtime.insert_dish(&new)?;
        }

        let yesterday = fixture_date() - Duration::days(1);
        let dishes = runtime.list_dishes_in_range(yesterday, fixture_date())?;
        assert_eq!(dishes.len(), 2);
        assert!(runtime.list_dishes_in_range(fixture_date(), yesterday)?.is_empty());
        Ok(())
    }
}
