use crate::constants;
use crate::size_limit::SizeLimit;

/// Represents some rules to be applied on the stream and field's content size
/// to prevent DoS attacks.
///
/// It's recommended to add some rules on field (specially text field) size to
/// avoid potential DoS attacks from attackers running the server out of
/// memory. This type provides some API to apply constraints on basis of field
/// name and the number of header lines a part may carry.
///
/// # Examples
///
/// ```
/// use multipart_feed::{Constraints, FormCollector, MultipartParser, SizeLimit};
///
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
///
/// let constraints = Constraints::new()
///     .allowed_fields(vec!["my_text_field", "my_file_field"])
///     .size_limit(
///         SizeLimit::new()
///             .whole_stream(15 * 1024 * 1024)
///             .per_field(10 * 1024 * 1024)
///             .for_field("my_text_field", 30 * 1024),
///     );
///
/// let mut parser =
///     MultipartParser::with_constraints("X-BOUNDARY", FormCollector::new(), constraints).unwrap();
/// parser.feed(data.as_bytes()).unwrap();
/// parser.finish().unwrap();
///
/// assert_eq!(parser.into_handler().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Constraints {
    pub(crate) size_limit: SizeLimit,
    pub(crate) allowed_fields: Option<Vec<String>>,
    pub(crate) max_headers: usize,
}

impl Constraints {
    /// Creates a set of rules with default behaviour.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Applies rules on field's content length.
    pub fn size_limit(mut self, size_limit: SizeLimit) -> Constraints {
        self.size_limit = size_limit;
        self
    }

    /// Specify which fields are allowed, for any unknown field
    /// [`feed`](crate::MultipartParser::feed) will return an error.
    pub fn allowed_fields<N: Into<String>>(mut self, allowed_fields: Vec<N>) -> Constraints {
        let allowed_fields = allowed_fields.into_iter().map(|item| item.into()).collect();
        self.allowed_fields = Some(allowed_fields);
        self
    }

    /// Sets how many header lines a single part may carry.
    pub fn max_headers(mut self, limit: usize) -> Constraints {
        self.max_headers = limit;
        self
    }

    pub(crate) fn is_it_allowed(&self, field: &str) -> bool {
        match self.allowed_fields {
            Some(ref allowed_fields) => allowed_fields.iter().any(|item| item == field),
            None => true,
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            size_limit: SizeLimit::default(),
            allowed_fields: None,
            max_headers: constants::MAX_HEADERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_it_allowed() {
        let constraints = Constraints::new();
        assert!(constraints.is_it_allowed("anything"));

        let constraints = Constraints::new().allowed_fields(vec!["a", "b"]);
        assert!(constraints.is_it_allowed("a"));
        assert!(!constraints.is_it_allowed("c"));
        assert_eq!(constraints.max_headers, 32);
    }
}
