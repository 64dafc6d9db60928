use fshval_package::ResourcePayload;

/// Append-only, insertion-ordered collection of resources handed to the
/// validation engine.
///
/// No deduplication: the same resource may be present more than once.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    resources: Vec<ResourcePayload>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: ResourcePayload) {
        self.resources.push(resource);
    }

    pub fn all(&self) -> &[ResourcePayload] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourcePayload> {
        self.resources.iter()
    }
}

impl Extend<ResourcePayload> for ResourceStore {
    fn extend<I: IntoIterator<Item = ResourcePayload>>(&mut self, iter: I) {
        for resource in iter {
            self.add(resource);
        }
    }
}

impl<'a> IntoIterator for &'a ResourceStore {
    type Item = &'a ResourcePayload;
    type IntoIter = std::slice::Iter<'a, ResourcePayload>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
