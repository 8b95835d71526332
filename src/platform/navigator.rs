use super::Navigator;

/// Address shown in the header bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBar {
    path: String,
}

impl AddressBar {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl Default for AddressBar {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for AddressBar {
    fn current_path(&self) -> &str {
        &self.path
    }

    fn set_path(&mut self, path: &str) {
        tracing::debug!(from = %self.path, to = path, "Address changed");
        self.path = path.to_string();
    }
}
