#![no_main]

use acca::{decode_dpk, decode_token, DefaultAuthenticator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the token and dpk decoders with arbitrary input
    let _ = decode_token(data, DefaultAuthenticator::DEPTH);
    let _ = decode_dpk(data);
});
