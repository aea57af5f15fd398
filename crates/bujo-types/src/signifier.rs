use std::collections::HashMap;

use crate::entry::Signifier;
use crate::error::{Error, Result};

/// Bidirectional character ↔ signifier table.
///
/// Built once when configuration is loaded and validated there, so the parser
/// never has to interpret raw config strings. Both directions must be
/// injective: one character per signifier, one signifier per character.
#[derive(Debug, Clone)]
pub struct SignifierMap {
    by_char: HashMap<char, Signifier>,
    by_signifier: HashMap<Signifier, char>,
}

impl SignifierMap {
    /// Build from a config-style `char string -> signifier name` table.
    pub fn from_config(table: &HashMap<String, String>) -> Result<Self> {
        let mut by_char = HashMap::new();
        let mut by_signifier: HashMap<Signifier, char> = HashMap::new();

        for (key, name) in table {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(Error::InvalidSignifierChar(key.clone())),
            };

            let signifier =
                Signifier::parse(name).ok_or_else(|| Error::UnknownSignifier(name.clone()))?;

            if let Some(&existing) = by_signifier.get(&signifier)
                && existing != c
            {
                return Err(Error::DuplicateSignifier {
                    name: signifier.as_str().to_string(),
                    chars: (existing, c),
                });
            }

            by_char.insert(c, signifier);
            by_signifier.insert(signifier, c);
        }

        Ok(Self { by_char, by_signifier })
    }

    pub fn signifier_for(&self, c: char) -> Option<Signifier> {
        self.by_char.get(&c).copied()
    }

    pub fn char_for(&self, signifier: Signifier) -> Option<char> {
        self.by_signifier.get(&signifier).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_char.is_empty()
    }
}

impl Default for SignifierMap {
    /// The standard table: `*` priority, `!` inspiration, `?` explore,
    /// `@` waiting, `#` delegated.
    fn default() -> Self {
        let mut by_char = HashMap::new();
        by_char.insert('*', Signifier::Priority);
        by_char.insert('!', Signifier::Inspiration);
        by_char.insert('?', Signifier::Explore);
        by_char.insert('@', Signifier::Waiting);
        by_char.insert('#', Signifier::Delegated);

        let by_signifier = by_char.iter().map(|(&c, &s)| (s, c)).collect();

        Self { by_char, by_signifier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_map_is_bidirectional() {
        let map = SignifierMap::default();
        assert_eq!(map.signifier_for('*'), Some(Signifier::Priority));
        assert_eq!(map.char_for(Signifier::Priority), Some('*'));
        assert_eq!(map.signifier_for('%'), None);
    }

    #[test]
    fn test_from_config_custom_char() {
        let map = SignifierMap::from_config(&table(&[("+", "priority")])).unwrap();
        assert_eq!(map.signifier_for('+'), Some(Signifier::Priority));
        assert_eq!(map.char_for(Signifier::Priority), Some('+'));
        assert_eq!(map.signifier_for('*'), None);
    }

    #[test]
    fn test_from_config_rejects_multi_char_key() {
        let err = SignifierMap::from_config(&table(&[("**", "priority")])).unwrap_err();
        assert!(matches!(err, Error::InvalidSignifierChar(_)));
    }

    #[test]
    fn test_from_config_rejects_unknown_name() {
        let err = SignifierMap::from_config(&table(&[("*", "urgency")])).unwrap_err();
        assert!(matches!(err, Error::UnknownSignifier(_)));
    }

    #[test]
    fn test_from_config_rejects_duplicate_assignment() {
        let err =
            SignifierMap::from_config(&table(&[("*", "priority"), ("+", "priority")])).unwrap_err();
        assert!(matches!(err, Error::DuplicateSignifier { .. }));
    }
}
