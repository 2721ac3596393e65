pub mod classifier;
pub mod options;

pub use classifier::classify;
pub use options::{OptionBuilder, PaymentOption, PaymentPlan};
