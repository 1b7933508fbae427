pub mod comparison;
pub mod handlers;
pub mod insights;
pub mod normalize;
pub mod reconciler;
