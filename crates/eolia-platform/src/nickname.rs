//! Nickname rename table

use eolia_config::RenameEntry;
use indexmap::IndexMap;

/// Immutable mapping from a device's factory nickname to its display alias
///
/// Built once at startup. Later entries for the same nickname overwrite
/// earlier ones; aliases are not checked for uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicknameMap {
    aliases: IndexMap<String, String>,
}

impl NicknameMap {
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a RenameEntry>) -> Self {
        Self::from_pairs(
            entries
                .into_iter()
                .map(|e| (e.nickname.clone(), e.alias.clone())),
        )
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut aliases = IndexMap::new();
        for (nickname, alias) in pairs {
            aliases.insert(nickname, alias);
        }
        Self { aliases }
    }

    /// Alias for a nickname; an empty alias counts as no alias
    pub fn alias(&self, nickname: &str) -> Option<&str> {
        self.aliases
            .get(nickname)
            .map(String::as_str)
            .filter(|alias| !alias.is_empty())
    }

    /// Display name for a nickname
    pub fn resolve<'a>(&'a self, nickname: &'a str) -> &'a str {
        self.alias(nickname).unwrap_or(nickname)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Display name for `nickname` under `map`
pub fn resolve(nickname: &str, map: &NicknameMap) -> String {
    map.resolve(nickname).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(nickname: &str, alias: &str) -> RenameEntry {
        RenameEntry {
            nickname: nickname.to_string(),
            alias: alias.to_string(),
        }
    }

    #[test]
    fn test_resolve() {
        let map = NicknameMap::build(&[entry("Living Room", "Lounge")]);

        assert_eq!(resolve("Living Room", &map), "Lounge");
        assert_eq!(resolve("Bedroom", &map), "Bedroom");
    }

    #[test]
    fn test_last_write_wins() {
        let map = NicknameMap::build(&[
            entry("Living Room", "Lounge"),
            entry("Bedroom", "Master"),
            entry("Living Room", "Den"),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("Living Room"), "Den");
    }

    #[test]
    fn test_duplicate_aliases_allowed() {
        let map = NicknameMap::build(&[entry("A", "Same"), entry("B", "Same")]);
        assert_eq!(map.resolve("A"), "Same");
        assert_eq!(map.resolve("B"), "Same");
    }

    #[test]
    fn test_empty_alias_keeps_nickname() {
        let map = NicknameMap::build(&[entry("Living Room", "")]);
        assert_eq!(map.alias("Living Room"), None);
        assert_eq!(map.resolve("Living Room"), "Living Room");
    }

    #[test]
    fn test_empty_map() {
        let map = NicknameMap::default();
        assert!(map.is_empty());
        assert_eq!(map.resolve("Anything"), "Anything");
    }
}
