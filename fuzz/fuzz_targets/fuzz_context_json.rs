#![no_main]

use libfuzzer_sys::fuzz_target;
use vat_advisor::core::TransactionInput;
use vat_advisor::rules::validate;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Rejected input is fine; panics are bugs.
        if let Ok(ctx) = TransactionInput::from_json(s).and_then(|i| i.into_context()) {
            assert!(validate(&ctx).is_valid());
        }
    }
});
