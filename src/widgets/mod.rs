pub mod chart;
pub mod controls;
pub mod metrics;
pub mod preview;
pub mod sidebar;
