use omr_recovery_core::ClassifierError;

/// Errors returned by the compound builder.
#[derive(thiserror::Error, Debug)]
pub enum CompoundError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
