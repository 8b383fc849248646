//! tabpredict Classifiers
//!
//! Pre-fitted binary classifiers and the adapter that serves them.
//!
//! - [`BinaryClassifier`] is the opaque model interface
//! - [`LinearClassifier`] covers logistic regression and linear SVMs
//! - [`ClassifierArtifact`] is the on-disk form loaded at startup
//! - [`ClassifierAdapter`] gates probability estimation on the classifier's
//!   capabilities and serializes access when the classifier asks for it

pub mod adapter;
pub mod artifact;
pub mod classifier;
pub mod linear;

pub use adapter::ClassifierAdapter;
pub use artifact::{load_classifier, ClassifierArtifact, FeatureSpec, ModelKindSpec};
pub use classifier::{BinaryClassifier, ClassifierCapabilities};
pub use linear::{FeatureTerm, LinearClassifier, LinearKind, PlattScaling};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::ClassifierAdapter;
    pub use crate::classifier::{BinaryClassifier, ClassifierCapabilities};
    pub use crate::linear::LinearClassifier;
}
