//! Kernel regression.
//!
//! `SvrLight` is an epsilon-insensitive support vector regressor over any
//! [`Kernel`](crate::Kernel). The solver is compiled in with the default
//! `svrlight` cargo feature; without it `train()` reports
//! [`Error::BackendUnavailable`](crate::Error::BackendUnavailable).
//!
//! # Examples
//!
//! ```rust
//! use kernelkit::{GaussianKernel, Labels, RealFeatures, SvrLight};
//! use ndarray::array;
//!
//! let train = RealFeatures::new(array![[0.0], [1.0], [2.0], [3.0]]).unwrap();
//! let test = RealFeatures::new(array![[1.5]]).unwrap();
//! let labels = Labels::new(array![0.0, 1.0, 2.0, 3.0]).unwrap();
//!
//! let kernel = GaussianKernel::new(&train, &train, 2.0).unwrap();
//! let mut svr = SvrLight::new(10.0, 1e-5, kernel, labels).unwrap();
//! svr.set_tube_epsilon(1e-2);
//!
//! # #[cfg(feature = "svrlight")]
//! # {
//! svr.train().unwrap();
//! svr.kernel_mut().init(&train, &test).unwrap();
//! let out = svr.apply().unwrap();
//! assert_eq!(out.len(), 1);
//! # }
//! ```

mod svr_light;
#[cfg(feature = "svrlight")]
mod solver;

pub use svr_light::SvrLight;
