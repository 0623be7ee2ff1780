use super::{FieldOption, OptionEntry, OptionValue};

/// Key of a normalized option entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Bare token, keyed by its position in the declaration
    Index(usize),
    /// `name:value` token or keyed list entry
    Name(String),
}

impl OptionKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            OptionKey::Name(name) => Some(name),
            OptionKey::Index(_) => None,
        }
    }
}

/// Ordered option entries of one field. Duplicate keys are kept so that
/// callers can reject them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionMap {
    entries: Vec<(OptionKey, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: OptionKey, value: OptionValue) {
        self.entries.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(OptionKey, OptionValue)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &OptionValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.name() == Some(name))
            .map(|(_, v)| v)
    }

    /// True when `token` appears as a bare positional token.
    pub fn has_flag(&self, token: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| matches!(k, OptionKey::Index(_)) && v.as_str() == Some(token))
    }
}

/// Result of token parsing: a bare boolean passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Flag(bool),
    Options(OptionMap),
}

impl Normalized {
    pub fn options(&self) -> Option<&OptionMap> {
        match self {
            Normalized::Options(map) => Some(map),
            Normalized::Flag(_) => None,
        }
    }
}

/// Normalizes a raw field option.
///
/// Strings are split on `|`. Every string token containing `:` is split on its
/// first `:` into a named entry, other tokens keep their key (position or list key).
pub fn parse_option(option: &FieldOption) -> Normalized {
    match option {
        FieldOption::Flag(b) => Normalized::Flag(*b),
        FieldOption::Tokens(s) => {
            let mut map = OptionMap::new();
            for (i, token) in s.split('|').enumerate() {
                push_token(&mut map, OptionKey::Index(i), OptionValue::Str(token.to_string()));
            }
            Normalized::Options(map)
        }
        FieldOption::List(entries) => {
            let mut map = OptionMap::new();
            for (i, entry) in entries.iter().enumerate() {
                match entry {
                    OptionEntry::Positional(value) => {
                        push_token(&mut map, OptionKey::Index(i), value.clone())
                    }
                    OptionEntry::Keyed(key, value) => {
                        push_token(&mut map, OptionKey::Name(key.clone()), value.clone())
                    }
                }
            }
            Normalized::Options(map)
        }
    }
}

fn push_token(map: &mut OptionMap, key: OptionKey, value: OptionValue) {
    if let OptionValue::Str(token) = &value {
        if let Some((name, rest)) = token.split_once(':') {
            map.push(OptionKey::Name(name.to_string()), OptionValue::Str(rest.to_string()));
            return;
        }
    }
    map.push(key, value);
}
