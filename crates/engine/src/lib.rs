pub use budget::{BudgetSummary, compute_budget, margin_percent, sale_by_category};
pub use catalog::{CATEGORIES, Catalog, Part, PartLookup, default_parts};
pub use error::EngineError;
pub use money::MoneyCents;
pub use projects::{Project, ProjectItem, Projects};
pub use quantity::Quantity;

mod budget;
mod catalog;
mod error;
mod money;
mod projects;
mod quantity;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
