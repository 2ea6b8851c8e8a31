use derive_getters::Getters;

/// One mailbox as returned by `LIST`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ListEntry {
    name: String,
    delimiter: Option<String>,
    selectable: bool,
}

impl ListEntry {
    pub fn new(name: String, delimiter: Option<String>, selectable: bool) -> Self {
        Self {
            name,
            delimiter,
            selectable,
        }
    }
}
