/// An attribute declared on the parameter that is the target of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_attributes() {
        let annotation = Annotation::new("form_param").with_attribute("value", "name").with_attribute("encoded", "true");

        assert_eq!(annotation.name(), "form_param");
        assert_eq!(annotation.attribute("value"), Some("name"));
        assert_eq!(annotation.attribute("missing"), None);
        assert_eq!(annotation.attributes().len(), 2);
    }
}
