// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod detail;
pub mod forms;
pub mod ids;
pub mod model;
pub mod notify;
pub mod page;
pub mod record;
pub mod report;
pub mod route;
pub mod search;
pub mod session;
pub mod state;

pub use detail::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use notify::*;
pub use page::*;
pub use record::*;
pub use report::*;
pub use route::*;
pub use search::*;
pub use session::*;
pub use state::*;
