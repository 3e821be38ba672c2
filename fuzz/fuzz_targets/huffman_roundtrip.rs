#![no_main]
use huffcode::{CodecConfig, Decoder, Encoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, Vec<u8>)| {
    let (input, garbage) = data;

    let stream = Encoder::default().encode(&input).unwrap();
    let bytes = stream.to_bytes().unwrap();
    let output = Decoder::default().decode_bytes::<u8>(&bytes).unwrap();
    assert_eq!(input, output);

    // Arbitrary bytes must be rejected or decoded, never panic.
    let decoder = Decoder::new(CodecConfig::strict_preset());
    let _ = decoder.decode_bytes::<u8>(&garbage);
    let _ = decoder.decode_bytes::<char>(&garbage);
});
