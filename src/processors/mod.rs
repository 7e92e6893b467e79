pub mod aggregator;
pub mod civil_time;
pub mod column_registry;
pub mod data_merger;
pub mod equipment_filter;
pub mod pipeline;
pub mod sampling;

pub use aggregator::QuarterHourAggregator;
pub use civil_time::{CivilTimeReconciler, Reconciled};
pub use column_registry::{ClaimedColumn, ColumnRegistry};
pub use data_merger::{DataMerger, MergedGrid};
pub use equipment_filter::{default_rules, EquipmentFilter};
pub use pipeline::{collect_csv_files, RunReport, UnifiedTableBuilder};
pub use sampling::{classify_gap, detect_sampling, median_gap_minutes};
