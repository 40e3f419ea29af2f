// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod chart;
pub mod forms;
pub mod ids;
pub mod listing;
pub mod model;
pub mod state;

pub use chart::*;
pub use forms::*;
pub use ids::*;
pub use listing::*;
pub use model::*;
pub use state::*;
