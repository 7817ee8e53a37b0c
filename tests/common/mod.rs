#![allow(dead_code)]

pub use radiorec_test_utils::builders;
pub use radiorec_test_utils::fake_capture;
pub use radiorec_test_utils::{at, init_tracing, with_timeout};
