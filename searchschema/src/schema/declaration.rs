use crate::options::FieldOption;

/// The author-facing schema of a record type: field names (and collection
/// settings) mapped to their raw options, in declaration order.
///
/// ```
/// use searchschema::schema::SchemaDeclaration;
///
/// let schema = SchemaDeclaration::new()
///     .field("name", "string|searchable|infix:false")
///     .field("email", ["string", "searchable:true", "locale:ja"])
///     .field("created_at", "int32")
///     .field("token_separators", "@#")
///     .field("default_sorting_field", "created_at");
/// assert_eq!(schema.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDeclaration {
    entries: Vec<(String, FieldOption)>,
}

impl SchemaDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, option: impl Into<FieldOption>) -> Self {
        self.insert(name, option);
        self
    }

    /// Inserts or replaces an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, option: impl Into<FieldOption>) {
        let name = name.into();
        let option = option.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = option,
            None => self.entries.push((name, option)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldOption> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldOption)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SchemaDeclaration
where
    K: Into<String>,
    V: Into<FieldOption>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut schema = SchemaDeclaration::new();
        for (name, option) in iter {
            schema.insert(name, option);
        }
        schema
    }
}
