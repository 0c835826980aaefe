//! Fuzz target for subject record parsing.
//!
//! Parsing arbitrary input should only ever return an error, never panic.

#![no_main]

use lcgm_core::SubjectRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<SubjectRecord>(data);
    let _ = serde_json::from_slice::<Vec<SubjectRecord>>(data);
});
