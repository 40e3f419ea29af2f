// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use foodlog_app::AppState;
use foodlog_db::Store;
use foodlog_testkit::MealFaker;
use runtime::DbRuntime;
use std::env;
use std::path::PathBuf;

const DEMO_SEED: u64 = 2024;
const DEMO_DAYS: u32 = 14;
const DEMO_MEALS_PER_DAY: usize = 3;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `foodlog --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    logging::init(&config.log_level(), &config.log_file()?)?;
    log::info!(
        "config {}; database {}",
        options.config_path.display(),
        db_path.display()
    );

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or FOODLOG_DB_PATH",
            db_path.display()
        )
    })?;
    store.ensure_schema()?;
    if options.demo {
        let seeded = seed_demo_data(&store, foodlog_app::today())?;
        log::info!("seeded {seeded} demo dishes");
    }

    if options.check_only {
        log::info!("check passed with {} dishes stored", store.count_dishes()?);
        return Ok(());
    }

    let mut state = AppState::default();
    let mut runtime = DbRuntime::new(&store);
    let result = foodlog_tui::run_app(&mut state, &mut runtime, config.chart_days());
    if let Err(error) = &result {
        log::error!("ui loop failed: {error:#}");
    }
    log::info!("shutting down");
    result
}

/// Fills an empty store with a fortnight of meals ending at `today`.
fn seed_demo_data(store: &Store, today: time::Date) -> Result<usize> {
    let mut faker = MealFaker::new(DEMO_SEED).with_reference(today);
    let dishes = faker.history(DEMO_DAYS, DEMO_MEALS_PER_DAY);
    for dish in &dishes {
        store
            .insert_dish(dish)
            .with_context(|| format!("seed demo dish {:?}", dish.name))?;
    }
    Ok(dishes.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--demo" => options.demo = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("foodlog: daily meal and calorie log");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded demo meals (in-memory)");
    println!("  --check                  Validate config + DB, then exit");
    println!("  --help                   Show this help");
}
