//! Conversion of typed values into header values.
//!
//! The output header view accepts anything implementing [`ToHeaderValue`], so resources
//! can put a media type, a cookie or a number into the response headers without
//! formatting it themselves.

use crate::cookie::NewCookie;
use crate::error::RestError;
use http::HeaderValue;
use mime::Mime;

pub trait ToHeaderValue {
    fn to_header_value(&self) -> Result<HeaderValue, RestError>;
}

impl ToHeaderValue for HeaderValue {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        Ok(self.clone())
    }
}

impl ToHeaderValue for str {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        HeaderValue::from_str(self).map_err(|e| RestError::invalid_header_value(format!("{self:?}: {e}")))
    }
}

impl ToHeaderValue for String {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        self.as_str().to_header_value()
    }
}

impl ToHeaderValue for Mime {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        self.as_ref().to_header_value()
    }
}

impl ToHeaderValue for NewCookie {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        self.to_string().to_header_value()
    }
}

impl<T: ToHeaderValue + ?Sized> ToHeaderValue for &T {
    fn to_header_value(&self) -> Result<HeaderValue, RestError> {
        (**self).to_header_value()
    }
}

macro_rules! number_to_header_value {
    ($($t:ty),*) => {
        $(
            impl ToHeaderValue for $t {
                fn to_header_value(&self) -> Result<HeaderValue, RestError> {
                    Ok(HeaderValue::from(*self))
                }
            }
        )*
    };
}

number_to_header_value!(u16, i16, u32, i32, u64, i64, usize, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_typed_values() {
        assert_eq!(mime::APPLICATION_JSON.to_header_value().unwrap(), "application/json");
        assert_eq!(42_u64.to_header_value().unwrap(), "42");
        assert_eq!((-1_i32).to_header_value().unwrap(), "-1");
        assert_eq!("gzip".to_header_value().unwrap(), "gzip");
        assert_eq!(NewCookie::new("a", "b").to_header_value().unwrap(), "a=b;Version=1");
    }

    #[test]
    fn reject_invalid_value() {
        let result = "line\r\nbreak".to_header_value();
        assert!(matches!(result, Err(RestError::InvalidHeaderValue { .. })));
    }
}
