//! Resource table module
//!
//! The fixed, read-only set of in-memory resources served by path.

use hyper::body::Bytes;

/// Greeting served at `/`
pub const GREETING: &str = "Hello from service";

/// Body of the `/status` health endpoint
pub const STATUS_OK: &str = "OK";

/// Sample CSV served at `/data.csv`
pub const CSV_DATA: &str = "id,name,city,age
1,Alice,New York,30
2,Bob,Los Angeles,25
3,Charlie,Chicago,35
4,Diana,Boston,28
5,Eve,Seattle,32
";

/// Immutable resource: content bytes plus media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    content: Bytes,
    media_type: String,
}

impl Resource {
    pub fn new(content: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media_type: media_type.into(),
        }
    }

    /// Full content; cloning the returned `Bytes` is a reference count bump
    pub const fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A single path registration
#[derive(Debug, Clone)]
struct Entry {
    path: String,
    resource: Resource,
}

/// Ordered path → resource table, matched by exact path in registration order
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    entries: Vec<Entry>,
}

impl ResourceTable {
    pub fn builder() -> ResourceTableBuilder {
        ResourceTableBuilder::default()
    }

    /// The fixture endpoints used by tunnel integration tests
    ///
    /// | Path        | Media type   |
    /// |-------------|--------------|
    /// | `/`         | `text/plain` |
    /// | `/data.csv` | `text/csv`   |
    /// | `/status`   | `text/plain` |
    pub fn fixtures() -> Self {
        Self::builder()
            .resource("/", Resource::new(GREETING, "text/plain"))
            .resource("/data.csv", Resource::new(CSV_DATA, "text/csv"))
            .resource("/status", Resource::new(STATUS_OK, "text/plain"))
            .build()
    }

    /// Exact-match lookup; the first registration for a path wins
    pub fn lookup(&self, path: &str) -> Option<&Resource> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.resource)
    }

    /// Registered paths in registration order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder collecting registrations before the table is frozen
#[derive(Debug, Default)]
pub struct ResourceTableBuilder {
    entries: Vec<Entry>,
}

impl ResourceTableBuilder {
    #[must_use]
    pub fn resource(mut self, path: impl Into<String>, resource: Resource) -> Self {
        self.entries.push(Entry {
            path: path.into(),
            resource,
        });
        self
    }

    pub fn build(self) -> ResourceTable {
        ResourceTable {
            entries: self.entries,
        }
    }
}
