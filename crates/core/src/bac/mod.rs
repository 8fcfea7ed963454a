//! Blood alcohol concentration estimate from purchase history.

pub mod estimator;
pub mod types;


pub use estimator::{bac_emoji, round_permille, BacEstimator, LOOKBACK_DAYS};
pub use types::{BacProfile, BacSex, Drink};
