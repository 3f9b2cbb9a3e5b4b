//! Metadata accompanying a single message body conversion.
//!
//! A [`ConversionContext`] is created for every attempt to read or write a message
//! body and handed to the handlers taking part in it. Its accessors mirror the inputs
//! of the conversion itself:
//!
//! - `properties`: free-form values shared between handlers
//! - `annotations`: attributes declared on the target parameter, `None` on the client side
//! - `declared_type` / `generic_type`: the Rust type being converted
//! - `media_type`: the media type of the entity
//! - `headers`: the entity headers, mutable so handlers can inject or remove headers
//!
//! No accessor validates or parses anything, handlers may change any field freely.

use http::HeaderMap;
use mime::Mime;

mod annotation;
mod properties;
mod type_info;

pub use annotation::Annotation;
pub use properties::Properties;
pub use type_info::TypeInfo;

#[derive(Debug)]
pub struct ConversionContext {
    properties: Properties,
    annotations: Option<Vec<Annotation>>,
    declared_type: TypeInfo,
    generic_type: TypeInfo,
    media_type: Option<Mime>,
    headers: HeaderMap,
}

impl ConversionContext {
    /// Creates a context for converting `T` with no annotations, media type or headers.
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self::builder::<T>().build()
    }

    pub fn builder<T: ?Sized + 'static>() -> ConversionContextBuilder {
        ConversionContextBuilder::new(TypeInfo::of::<T>())
    }

    /// The property map; mutations made through [`Self::properties_mut`] are visible here
    /// until the map is replaced with [`Self::set_properties`].
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }

    pub fn annotations(&self) -> Option<&[Annotation]> {
        self.annotations.as_deref()
    }

    pub fn set_annotations(&mut self, annotations: Option<Vec<Annotation>>) {
        self.annotations = annotations;
    }

    /// Looks up an annotation by name, `None` when there is no annotation set at all.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations()?.iter().find(|annotation| annotation.name() == name)
    }

    pub fn declared_type(&self) -> TypeInfo {
        self.declared_type
    }

    pub fn set_declared_type(&mut self, declared_type: TypeInfo) {
        self.declared_type = declared_type;
    }

    pub fn generic_type(&self) -> TypeInfo {
        self.generic_type
    }

    pub fn set_generic_type(&mut self, generic_type: TypeInfo) {
        self.generic_type = generic_type;
    }

    pub fn media_type(&self) -> Option<&Mime> {
        self.media_type.as_ref()
    }

    pub fn set_media_type(&mut self, media_type: Option<Mime>) {
        self.media_type = media_type;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

#[derive(Debug)]
pub struct ConversionContextBuilder {
    declared_type: TypeInfo,
    generic_type: Option<TypeInfo>,
    properties: Properties,
    annotations: Option<Vec<Annotation>>,
    media_type: Option<Mime>,
    headers: HeaderMap,
}

impl ConversionContextBuilder {
    fn new(declared_type: TypeInfo) -> Self {
        Self {
            declared_type,
            generic_type: None,
            properties: Properties::new(),
            annotations: None,
            media_type: None,
            headers: HeaderMap::new(),
        }
    }

    /// Defaults to the declared type.
    pub fn generic_type(mut self, generic_type: TypeInfo) -> Self {
        self.generic_type = Some(generic_type);
        self
    }

    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    pub fn media_type(mut self, media_type: Mime) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn build(self) -> ConversionContext {
        ConversionContext {
            properties: self.properties,
            annotations: self.annotations,
            declared_type: self.declared_type,
            generic_type: self.generic_type.unwrap_or(self.declared_type),
            media_type: self.media_type,
            headers: self.headers,
        }
    }
}
