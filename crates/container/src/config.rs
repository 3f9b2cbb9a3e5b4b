//! Container configuration.

use http::Version;

/// Default size of the response body buffer, a response is committed once it is full.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// What a committed response does with a status, header or cookie mutation.
///
/// Once the head is on the wire such a mutation can not take effect anymore.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CommittedPolicy {
    /// Log the mutation and drop it, the call succeeds.
    #[default]
    Ignore,
    /// Fail the call with [`ResponseError::Committed`](crate::protocol::ResponseError::Committed).
    Reject,
}

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    buffer_size: usize,
    committed_policy: CommittedPolicy,
    date_header: bool,
    version: Version,
}

impl ContainerConfig {
    pub fn builder() -> ContainerConfigBuilder {
        ContainerConfigBuilder::new()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn committed_policy(&self) -> CommittedPolicy {
        self.committed_policy
    }

    pub fn date_header(&self) -> bool {
        self.date_header
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfigBuilder::new().build()
    }
}

#[derive(Debug)]
pub struct ContainerConfigBuilder {
    buffer_size: usize,
    committed_policy: CommittedPolicy,
    date_header: bool,
    version: Version,
}

impl ContainerConfigBuilder {
    fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            committed_policy: CommittedPolicy::default(),
            date_header: true,
            version: Version::HTTP_11,
        }
    }

    /// A zero sized buffer commits the response on the first body write.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn committed_policy(mut self, committed_policy: CommittedPolicy) -> Self {
        self.committed_policy = committed_policy;
        self
    }

    /// Whether a `Date` header is added at commit when the response has none.
    pub fn date_header(mut self, date_header: bool) -> Self {
        self.date_header = date_header;
        self
    }

    /// Protocol version of the status line, HTTP/1.0 or HTTP/1.1.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> ContainerConfig {
        ContainerConfig {
            buffer_size: self.buffer_size,
            committed_policy: self.committed_policy,
            date_header: self.date_header,
            version: self.version,
        }
    }
}
