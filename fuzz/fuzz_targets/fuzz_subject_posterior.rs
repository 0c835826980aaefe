//! Fuzz target for posterior evaluation of arbitrary subjects.
//!
//! Mismatched shapes and extreme values must surface as errors or guarded
//! results; a successful posterior must always sum to one.

#![no_main]

use arbitrary::Arbitrary;
use lcgm_config::{Limits, ModelParams};
use lcgm_core::{Model, Observation};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzSubject {
    covariates: Vec<f64>,
    outcomes: Vec<Vec<Option<f64>>>,
}

fn model() -> Model {
    let params = ModelParams {
        theta: vec![vec![0.0, 0.0], vec![1.0, -1.0], vec![-0.5, 0.25]],
        beta: vec![
            vec![vec![5.0], vec![1.0, 0.5]],
            vec![vec![10.0], vec![2.0, -0.25]],
            vec![vec![0.0, 1.0, 0.1], vec![3.0]],
        ],
        sigma: vec![1.0, 0.5],
        times: vec![0.0, 1.0, 2.0, 3.0],
        limits: vec![Limits::unbounded(), Limits::new(0.0, 10.0)],
        outcome_names: None,
        group_labels: None,
    };
    Model::new(2, 3, &params).expect("fixture params are valid")
}

fuzz_target!(|subject: FuzzSubject| {
    let model = model();
    let y: Vec<Vec<Observation>> = subject
        .outcomes
        .iter()
        .map(|row| row.iter().copied().map(Observation::from).collect())
        .collect();
    if let Ok(post) = model.posterior_probabilities(&y, &subject.covariates) {
        let total: f64 = post.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "posterior sums to {total}");
    }
});
