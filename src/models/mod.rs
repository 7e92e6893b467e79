pub mod equipment;
pub mod series;
pub mod table;

pub use equipment::{ConfigExportRow, FilterRule, TechantRecord};
pub use series::{AggregatedSeries, CleanedSeries, SamplingClass};
pub use table::{SensorColumn, UnifiedRow, UnifiedTable};
