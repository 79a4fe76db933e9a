pub mod chart;
pub mod dataset;
pub mod predict;
pub mod report;
pub mod train;
