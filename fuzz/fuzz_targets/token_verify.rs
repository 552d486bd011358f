#![no_main]

use acca::{decode_token, Authenticator, Blinding, SecretKey};
use libfuzzer_sys::fuzz_target;

const CT_LEN: usize = 1;

fuzz_target!(|data: &[u8]| {
    // context || token bytes || state
    let token_len = Authenticator::<CT_LEN>::TOKEN_LEN;
    if data.len() < CT_LEN + token_len { return; }

    let Ok(auth) = Authenticator::<CT_LEN>::new(&SecretKey([0x42; 32]), &Blinding([0x11; 32]), 3) else { return; };

    let mut ct = [0u8; CT_LEN];
    ct.copy_from_slice(&data[..CT_LEN]);
    let Ok(token) = decode_token(&data[CT_LEN..CT_LEN + token_len], Authenticator::<CT_LEN>::DEPTH) else { return; };
    let state = &data[CT_LEN + token_len..];

    // Arbitrary tokens must never panic, and essentially never verify
    let _ = auth.verify(&token, &ct, state, 3);
});
