#![no_main]

use std::convert::Infallible;

use futures_util::stream::once;
use libfuzzer_sys::fuzz_target;
use multipart_feed::bytes::Bytes;
use multipart_feed::{FormCollector, MultipartParser};
use tokio::runtime;

fuzz_target!(|data: &[u8]| {
    let data = data.to_vec();
    let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });

    let mut parser = match MultipartParser::new("X-BOUNDARY", FormCollector::new()) {
        Ok(parser) => parser,
        Err(_) => return,
    };

    let rt = runtime::Builder::new_current_thread().build().expect("runtime");
    rt.block_on(async {
        let _ = parser.feed_stream(stream).await;
    });

    // Whatever happened above, the parser is closed now.
    assert!(parser.feed(b"--X-BOUNDARY--\r\n").is_err());
});
