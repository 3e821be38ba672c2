use huffcode::{Decoder, Encoder};

fn main() {
    let input = (0..100_000)
        .map(|i: u32| (i % 7 + i % 3 + i % 11) as u8)
        .collect::<Vec<_>>();

    let encoder = Encoder::default();
    let decoder = Decoder::default();
    for _ in 0..200 {
        let stream = encoder.encode(&input).unwrap();
        let output = decoder.decode(&stream).unwrap();
        assert_eq!(output.len(), input.len());
    }
}
