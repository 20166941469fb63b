use bytes::Bytes;
use futures_util::stream;
use multipart_feed::{Error, FormCollector, MultipartParser, Phase};

const DATA: &str = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

#[tokio::test]
async fn test_feed_stream_per_char() {
    let stream = stream::iter(
        DATA.chars()
            .map(|ch| ch.to_string())
            .map(|part| multipart_feed::Result::Ok(Bytes::copy_from_slice(part.as_bytes()))),
    );

    let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    parser.feed_stream(stream).await.unwrap();

    let form = parser.handler();
    assert_eq!(form.len(), 2);
    assert_eq!(form.get("My Field").unwrap().text(), "abcd");
    assert_eq!(
        form.get("File Field").unwrap().text(),
        "Hello world\nHello\r\nWorld\rAgain"
    );
    assert_eq!(parser.phase(), Phase::Closed);
}

#[tokio::test]
async fn test_feed_stream_stops_at_terminal_boundary() {
    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"--X-BOUNDARY--")),
        Ok(Bytes::from_static(b"\r\nepilogue")),
        Err(std::io::Error::new(std::io::ErrorKind::Other, "never polled")),
    ];

    let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    parser.feed_stream(stream::iter(chunks)).await.unwrap();

    assert!(parser.handler().is_empty());
}

#[tokio::test]
async fn test_feed_stream_truncated() {
    let truncated = Bytes::copy_from_slice(&DATA.as_bytes()[..DATA.len() / 2]);
    let stream = stream::iter(vec![multipart_feed::Result::Ok(truncated)]);

    let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    let err = parser.feed_stream(stream).await.unwrap_err();

    assert!(matches!(err, Error::UnterminatedPart { .. }));
    assert_eq!(parser.handler().len(), 1);
}

#[tokio::test]
async fn test_feed_stream_read_failure() {
    let chunks = vec![
        Ok(Bytes::from_static(b"--X-BOUNDARY\r\n")),
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset")),
    ];

    let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    let err = parser.feed_stream(stream::iter(chunks)).await.unwrap_err();

    assert!(matches!(err, Error::StreamReadFailed(_)));
    assert_eq!(parser.feed(b"x"), Err(Error::Closed));
}

#[cfg(feature = "tokio-io")]
#[tokio::test]
async fn test_feed_reader() {
    let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    parser.feed_reader(DATA.as_bytes()).await.unwrap();

    assert_eq!(parser.handler().len(), 2);
}
