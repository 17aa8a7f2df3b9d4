use crate::types::RowValues;

/// Named argument values for a procedure call.
///
/// Insertion order is preserved and names are stored without the `:` prefix, so
/// `"key"` and `":key"` address the same parameter. Inserting a name twice
/// replaces the earlier value.
///
/// ```rust
/// use sql_procedures::prelude::*;
///
/// let args = Arguments::new().with(":key", "f82ba7sMc1");
/// assert_eq!(args.len(), 1);
/// assert_eq!(args.get("key").and_then(RowValues::as_text), Some("f82ba7sMc1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, RowValues)>,
}

fn normalize(name: &str) -> &str {
    name.strip_prefix(':').unwrap_or(name)
}

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Arguments::insert`].
    #[must_use]
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<RowValues>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<RowValues>) {
        let name = normalize(name.as_ref());
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        let name = normalize(name);
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: AsRef<str>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Arguments
where
    K: AsRef<str>,
    V: Into<RowValues>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_prefix_is_ignored() {
        let args = Arguments::from([(":key", "a")]);
        assert!(args.contains("key"));
        assert!(args.contains(":key"));
        assert_eq!(args.names(), vec!["key"]);
    }

    #[test]
    fn reinserting_replaces_in_place() {
        let mut args: Arguments = [("a", 1_i64), ("b", 2_i64)].into_iter().collect();
        args.insert(":a", 3_i64);
        assert_eq!(args.len(), 2);
        assert_eq!(args.names(), vec!["a", "b"]);
        assert_eq!(args.get("a"), Some(&RowValues::Int(3)));
    }

    #[test]
    fn empty_is_a_real_value() {
        let args = Arguments::new();
        assert!(args.is_empty());
        assert_eq!(args, Arguments::default());
    }
}
