pub mod health;
pub mod home;
pub mod predict;

/// Small 12x10 pipeline over a seeded scaffold model, for handler tests.
#[cfg(test)]
pub fn test_state() -> crate::state::AppState {
    use mri_classifier::{scaffold_network, Classifier, LabelSet, Pipeline, Preprocessor, ResizeFilter};

    let network = scaffold_network(12, 10, 6, &LabelSet::default(), 5);
    let classifier = Classifier::new(network, None, 12, 10).unwrap();
    let pipeline = Pipeline::new(Preprocessor::new(12, 10, ResizeFilter::default()), classifier).unwrap();
    crate::state::AppState::new(pipeline, 1024 * 1024)
}
