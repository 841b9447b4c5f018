pub mod loader;
pub mod recalculate;
pub mod settings;

pub use loader::{PlanningLoaderError, PlanningPositionLoader, PlanningPositionRecord};
pub use recalculate::{PlanningRecalculator, RecalculationSummary};
pub use settings::{SalarySettings, SettingsError, SettingsUpdate};
