use crate::{Handler, MultipartParser};
use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

impl<H: Handler> MultipartParser<H> {
    /// Feeds every chunk of the given [`Bytes`] stream into the parser and then
    /// calls [`finish`](MultipartParser::finish).
    ///
    /// Reading stops as soon as the terminal boundary has been seen; anything
    /// the stream would yield after that is epilogue and isn't polled.
    ///
    /// # Examples
    ///
    /// ```
    /// use multipart_feed::{FormCollector, MultipartParser};
    /// use bytes::Bytes;
    /// use std::convert::Infallible;
    /// use futures_util::stream::once;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
    ///
    /// let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    /// parser.feed_stream(stream).await.unwrap();
    ///
    /// assert_eq!(parser.handler().get("my_text_field").unwrap().text(), "abcd");
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    pub async fn feed_stream<S, O, E>(&mut self, stream: S) -> crate::Result<()>
    where
        S: Stream<Item = Result<O, E>>,
        O: Into<Bytes>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        futures_util::pin_mut!(stream);

        while !self.is_terminated() {
            let chunk: Bytes = match stream.next().await {
                Some(Ok(chunk)) => chunk.into(),
                Some(Err(err)) => {
                    self.close();
                    return Err(crate::Error::StreamReadFailed(err.into()));
                }
                None => break,
            };

            self.feed(&chunk)?;
        }

        self.finish()
    }

    /// Feeds everything read from the given
    /// [`AsyncRead`](https://docs.rs/tokio/1/tokio/io/trait.AsyncRead.html)
    /// reader into the parser and then calls
    /// [`finish`](MultipartParser::finish).
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use multipart_feed::{FormCollector, MultipartParser};
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let reader = data.as_bytes();
    ///
    /// let mut parser = MultipartParser::new("X-BOUNDARY", FormCollector::new()).unwrap();
    /// parser.feed_reader(reader).await.unwrap();
    ///
    /// assert_eq!(parser.handler().len(), 1);
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    #[cfg(feature = "tokio-io")]
    pub async fn feed_reader<R>(&mut self, reader: R) -> crate::Result<()>
    where
        R: AsyncRead,
    {
        self.feed_stream(ReaderStream::new(reader)).await
    }
}
