//! Working list of identities a shared file is granted to.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GranteeListEditor {
    identities: Vec<String>,
}

impl GranteeListEditor {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut editor = Self::default();
        for identity in identities {
            editor.add(identity);
        }
        editor
    }

    /// Appends `identity` unless it is blank or already listed.
    pub fn add(&mut self, identity: impl Into<String>) -> bool {
        let identity: String = identity.into();
        let identity = identity.trim();
        if identity.is_empty() || self.contains(identity) {
            return false;
        }
        self.identities.push(identity.to_string());
        true
    }

    /// Replaces the list with the comma separated identities in `raw`.
    pub fn set_from_input(&mut self, raw: &str) {
        self.identities.clear();
        for identity in raw.split(',') {
            self.add(identity);
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.iter().any(|existing| existing == identity)
    }

    /// The list as it would be after removing `identity`. Unchanged when
    /// `identity` is not listed.
    pub fn without(&self, identity: &str) -> Vec<String> {
        self.identities
            .iter()
            .filter(|existing| existing.as_str() != identity)
            .cloned()
            .collect()
    }

    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    pub fn to_submit(&self) -> Vec<String> {
        self.identities.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
