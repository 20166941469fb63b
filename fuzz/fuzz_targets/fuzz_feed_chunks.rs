#![no_main]

use std::cell::Cell;

use libfuzzer_sys::fuzz_target;
use multipart_feed::{Callbacks, Field, MultipartParser};

fuzz_target!(|data: &[u8]| {
    let (chunk_size, body) = match data.split_first() {
        Some((size, body)) => (usize::from(*size).max(1), body),
        None => return,
    };

    let open = Cell::new(false);

    let handler = Callbacks::new(
        |_: Field| {
            assert!(!open.get());
            open.set(true);
        },
        |data: &[u8]| {
            assert!(open.get());
            assert!(!data.is_empty());
        },
        || {
            assert!(open.get());
            open.set(false);
        },
    );

    let mut parser = MultipartParser::new("X-BOUNDARY", handler).expect("valid boundary");
    for chunk in body.chunks(chunk_size) {
        if parser.feed(chunk).is_err() {
            break;
        }
    }
    let _ = parser.finish();
});
