#![no_main]
use libfuzzer_sys::fuzz_target;
use binn_pack::Value;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = binn_pack::from_slice::<Value>(data) {
        // Anything that decodes must encode again
        let enc = binn_pack::to_vec(&value).expect("decoded value failed to encode");
        let _ = binn_pack::from_slice::<Value>(&enc).expect("re-encoded value failed to decode");
    }
});
