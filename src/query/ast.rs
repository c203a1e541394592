//! Query Descriptor
//!
//! Defines the structured description of an Arweave `transactions` query:
//! filter predicates, field-inclusion directives and the sort order.
//!
//! A descriptor is assembled fresh from the current form inputs every time
//! something changes. It is never mutated after `build()`.
//!
//! # Example
//!
//! ```rust
//! use permadash::query::{build_query, QueryFields, QueryFilters, Tag};
//!
//! let filters = QueryFilters {
//!     owner: "owner-address".to_string(),
//!     tags: vec![Tag::new("App-Name", "aos")],
//!     ..Default::default()
//! };
//!
//! let descriptor = build_query(&filters, &QueryFields::default(), 10);
//! assert_eq!(descriptor.predicates.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{QueryError, QueryResult};

/// A key/value tag condition
///
/// Insertion order is preserved and duplicates are allowed; both affect the
/// serialized query layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Append a tag when both name and value are non-empty.
///
/// Returns `true` if the tag was added.
pub fn add_tag(tags: &mut Vec<Tag>, name: &str, value: &str) -> bool {
    if name.is_empty() || value.is_empty() {
        return false;
    }
    tags.push(Tag::new(name, value));
    true
}

/// Remove the tag at `index`, if present.
pub fn remove_tag(tags: &mut Vec<Tag>, index: usize) -> Option<Tag> {
    if index < tags.len() {
        Some(tags.remove(index))
    } else {
        None
    }
}

/// Transaction fields that can be requested
///
/// `Field::ALL` is the fixed enumeration order used when emitting
/// inclusion directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Owner,
    Recipient,
    Tags,
    Block,
    Data,
    Fee,
    Quantity,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Owner,
        Field::Recipient,
        Field::Tags,
        Field::Block,
        Field::Data,
        Field::Fee,
        Field::Quantity,
    ];

    /// Field name as used in the GraphQL schema
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Recipient => "recipient",
            Self::Tags => "tags",
            Self::Block => "block",
            Self::Data => "data",
            Self::Fee => "fee",
            Self::Quantity => "quantity",
        }
    }

    /// Sub-selections rendered under the field (empty for scalars)
    pub fn sub_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Owner => &["address", "key"],
            Self::Recipient => &[],
            Self::Tags => &["name", "value"],
            Self::Block => &["id", "timestamp", "height", "previous"],
            Self::Data => &["size", "type"],
            Self::Fee | Self::Quantity => &["winston", "ar"],
        }
    }
}

impl std::str::FromStr for Field {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-inclusion toggles. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFields {
    pub owner: bool,
    pub recipient: bool,
    pub tags: bool,
    pub block: bool,
    pub data: bool,
    pub fee: bool,
    pub quantity: bool,
}

impl Default for QueryFields {
    fn default() -> Self {
        Self {
            owner: true,
            recipient: true,
            tags: true,
            block: true,
            data: true,
            fee: true,
            quantity: true,
        }
    }
}

impl QueryFields {
    /// All toggles off
    pub fn none() -> Self {
        Self {
            owner: false,
            recipient: false,
            tags: false,
            block: false,
            data: false,
            fee: false,
            quantity: false,
        }
    }

    fn slot(&mut self, field: Field) -> &mut bool {
        match field {
            Field::Owner => &mut self.owner,
            Field::Recipient => &mut self.recipient,
            Field::Tags => &mut self.tags,
            Field::Block => &mut self.block,
            Field::Data => &mut self.data,
            Field::Fee => &mut self.fee,
            Field::Quantity => &mut self.quantity,
        }
    }

    pub fn is_enabled(&self, field: Field) -> bool {
        match field {
            Field::Owner => self.owner,
            Field::Recipient => self.recipient,
            Field::Tags => self.tags,
            Field::Block => self.block,
            Field::Data => self.data,
            Field::Fee => self.fee,
            Field::Quantity => self.quantity,
        }
    }

    pub fn set(&mut self, field: Field, enabled: bool) {
        *self.slot(field) = enabled;
    }

    /// Flip a single toggle, returning the new state
    pub fn toggle(&mut self, field: Field) -> bool {
        let slot = self.slot(field);
        *slot = !*slot;
        *slot
    }

    /// Enabled fields in enumeration order
    pub fn enabled(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

/// User-supplied filter criteria. Empty strings mean "not applied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilters {
    pub id: String,
    pub owner: String,
    pub recipient: String,
    pub tags: Vec<Tag>,
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    /// Newest block first
    #[default]
    HeightDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeightDesc => "HEIGHT_DESC",
        }
    }
}

/// A single filter predicate of the descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Id(String),
    Owner(String),
    Recipient(String),
    Tags(Vec<Tag>),
    Limit(u32),
}

/// Assembled query: predicates in the order id, owner, recipient, tags,
/// limit; inclusion directives in `Field::ALL` order; fixed sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    pub predicates: Vec<Predicate>,
    pub fields: Vec<Field>,
    pub sort: SortOrder,
}

impl QueryDescriptor {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    pub fn limit(&self) -> Option<u32> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Limit(n) => Some(*n),
            _ => None,
        })
    }

    pub fn includes(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

/// Builder for query descriptors
///
/// Calls may come in any order; `build()` always lays predicates and
/// fields out in their fixed order.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    id: Option<String>,
    owner: Option<String>,
    recipient: Option<String>,
    tags: Vec<Tag>,
    limit: Option<u32>,
    fields: QueryFields,
    sort: SortOrder,
}

impl QueryBuilder {
    /// Start with no fields selected
    pub fn new() -> Self {
        Self {
            id: None,
            owner: None,
            recipient: None,
            tags: Vec::new(),
            limit: None,
            fields: QueryFields::none(),
            sort: SortOrder::default(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn tags(mut self, tags: &[Tag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.set(field, true);
        self
    }

    pub fn sort_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn build(self) -> QueryDescriptor {
        let mut predicates = Vec::with_capacity(5);

        if let Some(id) = self.id {
            predicates.push(Predicate::Id(id));
        }
        if let Some(owner) = self.owner {
            predicates.push(Predicate::Owner(owner));
        }
        if let Some(recipient) = self.recipient {
            predicates.push(Predicate::Recipient(recipient));
        }
        if !self.tags.is_empty() {
            predicates.push(Predicate::Tags(self.tags));
        }
        if let Some(limit) = self.limit {
            predicates.push(Predicate::Limit(limit));
        }

        QueryDescriptor {
            predicates,
            fields: self.fields.enabled(),
            sort: self.sort,
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble a descriptor from form inputs.
///
/// Empty filter strings and an empty tag list are skipped. A `limit` of zero
/// or below emits no limit directive. Sort is always `HEIGHT_DESC`.
pub fn build_query(filters: &QueryFilters, fields: &QueryFields, limit: i64) -> QueryDescriptor {
    let mut builder = QueryBuilder::new();

    if !filters.id.is_empty() {
        builder = builder.id(filters.id.as_str());
    }
    if !filters.owner.is_empty() {
        builder = builder.owner(filters.owner.as_str());
    }
    if !filters.recipient.is_empty() {
        builder = builder.recipient(filters.recipient.as_str());
    }
    if !filters.tags.is_empty() {
        builder = builder.tags(&filters.tags);
    }
    if limit > 0 {
        builder = builder.limit(u32::try_from(limit).unwrap_or(u32::MAX));
    }

    for field in fields.enabled() {
        builder = builder.with_field(field);
    }

    builder.sort_by(SortOrder::HeightDesc).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_default_all_enabled() {
        let fields = QueryFields::default();
        assert_eq!(fields.enabled(), Field::ALL.to_vec());
    }

    #[test]
    fn test_toggle_field() {
        let mut fields = QueryFields::default();
        assert!(!fields.toggle(Field::Fee));
        assert!(!fields.is_enabled(Field::Fee));
        assert!(fields.toggle(Field::Fee));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Quantity".parse::<Field>().unwrap(), Field::Quantity);
        assert_eq!(" tags ".parse::<Field>().unwrap(), Field::Tags);
        assert!("weight".parse::<Field>().is_err());
    }

    #[test]
    fn test_add_tag_requires_name_and_value() {
        let mut tags = Vec::new();
        assert!(!add_tag(&mut tags, "Action", ""));
        assert!(!add_tag(&mut tags, "", "Eval"));
        assert!(add_tag(&mut tags, "Action", "Eval"));
        assert!(add_tag(&mut tags, "Action", "Eval"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_remove_tag() {
        let mut tags = vec![Tag::new("a", "1"), Tag::new("b", "2")];
        assert_eq!(remove_tag(&mut tags, 0), Some(Tag::new("a", "1")));
        assert_eq!(remove_tag(&mut tags, 5), None);
        assert_eq!(tags, vec![Tag::new("b", "2")]);
    }

    #[test]
    fn test_build_query_predicate_order() {
        let filters = QueryFilters {
            id: "tx".to_string(),
            owner: "own".to_string(),
            recipient: "rcp".to_string(),
            tags: vec![Tag::new("App-Name", "aos")],
        };

        let descriptor = build_query(&filters, &QueryFields::default(), 10);

        assert_eq!(
            descriptor.predicates,
            vec![
                Predicate::Id("tx".to_string()),
                Predicate::Owner("own".to_string()),
                Predicate::Recipient("rcp".to_string()),
                Predicate::Tags(vec![Tag::new("App-Name", "aos")]),
                Predicate::Limit(10),
            ]
        );
        assert_eq!(descriptor.sort, SortOrder::HeightDesc);
    }

    #[test]
    fn test_build_query_without_filters() {
        let descriptor = build_query(&QueryFilters::default(), &QueryFields::default(), 0);

        assert!(descriptor.predicates.is_empty());
        assert_eq!(descriptor.fields.len(), 7);
        assert_eq!(descriptor.sort, SortOrder::HeightDesc);
    }

    #[test]
    fn test_negative_limit_is_dropped() {
        let descriptor = build_query(&QueryFilters::default(), &QueryFields::default(), -5);
        assert_eq!(descriptor.limit(), None);
    }

    #[test]
    fn test_disabled_fields_are_omitted() {
        let mut fields = QueryFields::default();
        fields.set(Field::Data, false);
        fields.set(Field::Owner, false);

        let descriptor = build_query(&QueryFilters::default(), &fields, 5);

        assert!(!descriptor.includes(Field::Data));
        assert!(!descriptor.includes(Field::Owner));
        assert_eq!(
            descriptor.fields,
            vec![
                Field::Recipient,
                Field::Tags,
                Field::Block,
                Field::Fee,
                Field::Quantity
            ]
        );
    }

    #[test]
    fn test_builder_call_order_does_not_matter() {
        let a = QueryBuilder::new()
            .limit(3)
            .with_field(Field::Fee)
            .owner("o")
            .id("i")
            .with_field(Field::Owner)
            .build();
        let b = QueryBuilder::new()
            .id("i")
            .owner("o")
            .with_field(Field::Owner)
            .with_field(Field::Fee)
            .limit(3)
            .build();

        assert_eq!(a, b);
    }

    #[test]
    fn test_tags_keep_insertion_order_and_duplicates() {
        let filters = QueryFilters {
            tags: vec![
                Tag::new("b", "2"),
                Tag::new("a", "1"),
                Tag::new("b", "2"),
            ],
            ..Default::default()
        };

        let descriptor = build_query(&filters, &QueryFields::none(), 0);

        assert_eq!(descriptor.predicates, vec![Predicate::Tags(filters.tags.clone())]);
        assert!(descriptor.fields.is_empty());
    }
}
