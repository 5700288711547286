//! The example drivers: one function per scenario, each taking an explicit
//! parameter struct and returning its results for inspection.
//!
//! Every driver module also provides `parameter_list`, the canned parameter
//! sets the `demos/` binaries run with, built from a [`ToyData`](crate::toy::ToyData).
//!
//! # Examples
//!
//! ```rust
//! use kernelkit::drivers::distance_normsquared;
//! use kernelkit::toy::ToyData;
//!
//! let data = ToyData::generate(7);
//! let params = &distance_normsquared::parameter_list(&data)[0];
//! let (_distance, dm_train, dm_test) = distance_normsquared::run(params).unwrap();
//! assert_eq!(dm_train.nrows(), dm_test.nrows());
//! ```

pub mod distance_normsquared;
pub mod kernel_linear;
pub mod kernel_top;
pub mod regression_svrlight;
