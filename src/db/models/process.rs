/// Processes known to the store plus the caller's current selection.
///
/// Built fresh from the store each time it is needed; nothing here is cached
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCatalog {
    pub available: Vec<String>,
    pub current: Option<String>,
}

impl ProcessCatalog {
    /// `preferred` wins when the store knows it; otherwise the first known
    /// process is selected.
    pub fn new(available: Vec<String>, preferred: Option<&str>) -> Self {
        let current = preferred
            .filter(|name| available.iter().any(|known| known == name))
            .map(str::to_owned)
            .or_else(|| available.first().cloned());
        Self { available, current }
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}
