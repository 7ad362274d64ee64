//! In-memory contact directory.
//!
//! Names are unique keys; iteration follows insertion order so the contact
//! list on screen is stable. Nothing is persisted.

use crate::error::{Error, Result};
use crate::types::{ADD_CONTACT_LABEL, ContactEntry};

/// Insertion-ordered name -> number map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDirectory {
    entries: Vec<ContactEntry>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from seed entries. Later duplicates overwrite earlier ones.
    pub fn seeded(seed: &[ContactEntry]) -> Self {
        let mut directory = Self::new();
        for entry in seed {
            directory.upsert(&entry.name, &entry.number);
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Contact names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Names followed by the synthetic "Add Contact" entry.
    pub fn list(&self) -> Vec<String> {
        let mut items = self.names();
        items.push(ADD_CONTACT_LABEL.to_string());
        items
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].number.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert a new contact. Existing names are never overwritten here.
    pub fn add(&mut self, name: &str, number: &str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::DuplicateKey(name.to_string()));
        }
        self.entries.push(ContactEntry::new(name, number));
        Ok(())
    }

    /// Remove `old_name`, then store `new_number` under `new_name` (or
    /// `old_name` again when `new_name` is empty).
    ///
    /// The edited entry moves to the end of the list. Renaming onto another
    /// existing contact overwrites that contact in place.
    pub fn edit(&mut self, old_name: &str, new_name: &str, new_number: &str) -> Result<()> {
        let index = self
            .position(old_name)
            .ok_or_else(|| Error::NotFound(old_name.to_string()))?;
        self.entries.remove(index);

        let target = if new_name.is_empty() { old_name } else { new_name };
        self.upsert(target, new_number);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.entries.remove(index);
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    fn upsert(&mut self, name: &str, number: &str) {
        match self.position(name) {
            Some(i) => self.entries[i].number = number.to_string(),
            None => self.entries.push(ContactEntry::new(name, number)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionConfig;

    fn defaults() -> ContactDirectory {
        ContactDirectory::seeded(&SessionConfig::default().contacts)
    }

    #[test]
    fn list_appends_add_contact() {
        let directory = defaults();
        assert_eq!(
            directory.list(),
            vec!["Mom", "Dad", "Doctor", "Add Contact"]
        );
    }

    #[test]
    fn empty_directory_lists_only_add_contact() {
        assert_eq!(ContactDirectory::new().list(), vec!["Add Contact"]);
    }

    #[test]
    fn add_then_list_and_get() {
        let mut directory = defaults();
        directory.add("Eve", "1112223333").unwrap();
        assert!(directory.list().contains(&"Eve".to_string()));
        assert_eq!(directory.get("Eve"), Some("1112223333"));
        assert_eq!(directory.names().last().map(String::as_str), Some("Eve"));
    }

    #[test]
    fn add_existing_name_is_duplicate_and_leaves_directory_unchanged() {
        let mut directory = defaults();
        let before = directory.clone();
        let err = directory.add("Mom", "0000000000").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(name) if name == "Mom"));
        assert_eq!(directory, before);
        assert_eq!(directory.get("Mom"), Some("1234567890"));
    }

    #[test]
    fn remove_then_edit_is_not_found() {
        let mut directory = defaults();
        directory.add("Eve", "1112223333").unwrap();
        directory.remove("Eve").unwrap();
        let err = directory.edit("Eve", "Eva", "1112223333").unwrap_err();
        assert!(matches!(err, Error::NotFound(name) if name == "Eve"));
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut directory = defaults();
        assert!(matches!(directory.remove("Zed"), Err(Error::NotFound(_))));
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn edit_with_empty_name_keeps_old_name_and_moves_to_end() {
        let mut directory = defaults();
        directory.edit("Dad", "", "2223334444").unwrap();
        assert_eq!(directory.names(), vec!["Mom", "Doctor", "Dad"]);
        assert_eq!(directory.get("Dad"), Some("2223334444"));
    }

    #[test]
    fn edit_renames_contact() {
        let mut directory = defaults();
        directory.edit("Dad", "PAPA", "2223334444").unwrap();
        assert!(!directory.contains("Dad"));
        assert_eq!(directory.get("PAPA"), Some("2223334444"));
        assert_eq!(directory.names(), vec!["Mom", "Doctor", "PAPA"]);
    }

    #[test]
    fn edit_onto_existing_name_overwrites_it() {
        let mut directory = defaults();
        directory.edit("Dad", "Mom", "9999999999").unwrap();
        assert_eq!(directory.names(), vec!["Mom", "Doctor"]);
        assert_eq!(directory.get("Mom"), Some("9999999999"));
    }

    #[test]
    fn seeded_with_repeated_name_keeps_last_number() {
        let seed = vec![
            ContactEntry::new("A", "1"),
            ContactEntry::new("A", "2"),
        ];
        let directory = ContactDirectory::seeded(&seed);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get("A"), Some("2"));
    }
}
