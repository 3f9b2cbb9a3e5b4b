use crate::error::RestError;
use crate::header_delegate::ToHeaderValue;
use http::{HeaderMap, HeaderName, HeaderValue};
use micro_container::response::ContainerResponse;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A multi-valued header map bound to a container response.
///
/// The view keeps no copy of its own: every write goes to the container right away and
/// every read reflects the container's current headers. Values are converted with
/// [`ToHeaderValue`], header names are handed to the container unchecked.
pub struct OutputHeaders<R> {
    response: Arc<R>,
}

impl<R> OutputHeaders<R>
where
    R: ContainerResponse,
{
    pub(crate) fn new(response: Arc<R>) -> Self {
        Self { response }
    }

    /// Appends a value after the ones already present.
    pub fn add<V: ToHeaderValue>(&self, name: &str, value: V) -> Result<(), RestError> {
        let value = value.to_header_value()?;
        self.response.add_header(name, value)?;
        Ok(())
    }

    /// Replaces all values of `name` with a single value.
    pub fn put_single<V: ToHeaderValue>(&self, name: &str, value: V) -> Result<(), RestError> {
        let value = value.to_header_value()?;
        self.response.set_header(name, value)?;
        Ok(())
    }

    /// Replaces all values of `name`, an empty list removes the header.
    ///
    /// Every value is converted before the container is touched, so a bad value leaves
    /// the header as it was.
    pub fn put<I, V>(&self, name: &str, values: I) -> Result<(), RestError>
    where
        I: IntoIterator<Item = V>,
        V: ToHeaderValue,
    {
        let values = values.into_iter().map(|value| value.to_header_value()).collect::<Result<Vec<_>, _>>()?;

        self.response.remove_header(name)?;
        for value in values {
            self.response.add_header(name, value)?;
        }
        Ok(())
    }

    /// Removes the header, returning the values it had.
    pub fn remove(&self, name: &str) -> Result<Vec<HeaderValue>, RestError> {
        let values = self.response.header_values(name);
        self.response.remove_header(name)?;
        Ok(values)
    }

    pub fn get(&self, name: &str) -> Vec<HeaderValue> {
        self.response.header_values(name)
    }

    pub fn get_first(&self, name: &str) -> Option<HeaderValue> {
        self.response.header_values(name).into_iter().next()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        !self.response.header_values(name).is_empty()
    }

    pub fn keys(&self) -> Vec<HeaderName> {
        self.response.header_names()
    }

    pub fn len(&self) -> usize {
        self.response.header_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.header_names().is_empty()
    }

    /// Copies the current headers out of the container.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for name in self.response.header_names() {
            for value in self.response.header_values(name.as_str()) {
                map.append(name.clone(), value);
            }
        }
        map
    }
}

impl<R> Debug for OutputHeaders<R>
where
    R: ContainerResponse,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputHeaders").field("headers", &self.to_header_map()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_container::config::ContainerConfig;
    use micro_container::response::BufferedResponse;

    fn view() -> (Arc<BufferedResponse<Vec<u8>>>, OutputHeaders<BufferedResponse<Vec<u8>>>) {
        let response = Arc::new(BufferedResponse::with_config(Vec::new(), ContainerConfig::default()));
        let view = OutputHeaders::new(Arc::clone(&response));
        (response, view)
    }

    #[test]
    fn writes_reach_the_container() {
        let (response, view) = view();

        view.add("Content-Type", mime::APPLICATION_JSON).unwrap();
        view.add("vary", "accept").unwrap();
        view.add("vary", "origin").unwrap();

        assert_eq!(response.header_values("content-type"), vec!["application/json"]);
        assert_eq!(response.header_values("vary"), vec!["accept", "origin"]);

        view.put_single("vary", "*").unwrap();
        assert_eq!(response.header_values("vary"), vec!["*"]);

        view.put("x-list", [1_u32, 2, 3]).unwrap();
        assert_eq!(response.header_values("x-list"), vec!["1", "2", "3"]);

        let removed = view.remove("x-list").unwrap();
        assert_eq!(removed.len(), 3);
        assert!(response.header_values("x-list").is_empty());
    }

    #[test]
    fn reads_observe_the_container() {
        let (response, view) = view();
        assert!(view.is_empty());

        response.add_header("etag", HeaderValue::from_static("\"v1\"")).unwrap();

        assert!(view.contains_key("ETag"));
        assert_eq!(view.get_first("etag").unwrap(), "\"v1\"");
        assert_eq!(view.keys(), vec![http::header::ETAG]);
        assert_eq!(view.len(), 1);
        assert_eq!(view.to_header_map().get(http::header::ETAG).unwrap(), "\"v1\"");
    }

    #[test]
    fn bad_value_leaves_header_untouched() {
        let (response, view) = view();
        view.add("x-a", "keep").unwrap();

        let result = view.put("x-a", ["ok", "bad\nvalue"]);
        assert!(matches!(result, Err(RestError::InvalidHeaderValue { .. })));
        assert_eq!(response.header_values("x-a"), vec!["keep"]);
    }

    #[test]
    fn container_rejects_bad_header_name() {
        let (_response, view) = view();

        let result = view.add("bad name", "v");
        assert!(matches!(result, Err(RestError::Container { .. })));
    }
}
