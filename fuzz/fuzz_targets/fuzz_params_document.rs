//! Fuzz target for params.json parsing and validation.
//!
//! Any document that passes validation must yield a model whose trajectories
//! can be evaluated without panicking.

#![no_main]

use lcgm_config::parse_params;
use lcgm_core::Model;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(loaded) = parse_params(text) else {
        return;
    };
    let model = Model::from_document(&loaded.document).expect("validated params build a model");
    for group in 0..model.n_groups() {
        for outcome in 0..model.n_outcomes() {
            let _ = model.fitted_trajectory(group, outcome);
        }
    }
    let _ = model.softmax(&vec![0.0; model.covariate_len()]);
});
