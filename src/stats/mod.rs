//! Stats module - group-by means and correlation

mod aggregator;
mod correlation;

pub use aggregator::{Aggregator, GroupKey, GroupMeans, GroupValue, Summary};
pub use correlation::{pearson, CorrelationMatrix};
