//! Kernel collaborators for the SVM model

pub mod feature;
pub mod linear;
pub mod rbf;
pub mod traits;

pub use self::feature::*;
pub use self::linear::*;
pub use self::rbf::*;
pub use self::traits::*;
