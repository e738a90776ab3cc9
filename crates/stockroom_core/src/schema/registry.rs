//! Entity/operation declarations and lookup.

use crate::model::entity::EntityKind;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Semantic type of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Text,
    Decimal,
    /// Unix epoch milliseconds.
    Timestamp,
    /// Identifier of a record of the given kind.
    Reference(EntityKind),
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Text => f.write_str("string"),
            Self::Decimal => f.write_str("decimal"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Reference(kind) => write!(f, "reference to {kind}"),
        }
    }
}

/// Declaration of one exposed entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required_on_create: bool,
    /// Assigned by the store (`id`, `date_created`); ignored in caller input.
    pub store_assigned: bool,
}

impl FieldSpec {
    const fn assigned(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required_on_create: false,
            store_assigned: true,
        }
    }

    const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required_on_create: true,
            store_assigned: false,
        }
    }

    const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required_on_create: false,
            store_assigned: false,
        }
    }
}

/// Field list of one entity.
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields a caller may supply on create/update.
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields.iter().filter(|field| !field.store_assigned)
    }

    /// Fields that must be present (and non-null) on create.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields.iter().filter(|field| field.required_on_create)
    }
}

static CATEGORY: EntitySchema = EntitySchema {
    kind: EntityKind::Category,
    fields: &[
        FieldSpec::assigned("id", FieldType::Integer),
        FieldSpec::required("title", FieldType::Text),
    ],
};

static BOOK: EntitySchema = EntitySchema {
    kind: EntityKind::Book,
    fields: &[
        FieldSpec::assigned("id", FieldType::Integer),
        FieldSpec::required("title", FieldType::Text),
        FieldSpec::required("author", FieldType::Text),
        FieldSpec::optional("isbn", FieldType::Text),
        FieldSpec::optional("pages", FieldType::Integer),
        FieldSpec::required("price", FieldType::Decimal),
        FieldSpec::required("quantity", FieldType::Integer),
        FieldSpec::optional("description", FieldType::Text),
        FieldSpec::optional("status", FieldType::Text),
        FieldSpec::assigned("date_created", FieldType::Timestamp),
    ],
};

static GROCERY: EntitySchema = EntitySchema {
    kind: EntityKind::Grocery,
    fields: &[
        FieldSpec::assigned("id", FieldType::Integer),
        FieldSpec::optional("product_tag", FieldType::Text),
        FieldSpec::required("name", FieldType::Text),
        FieldSpec::optional("category", FieldType::Reference(EntityKind::Category)),
        FieldSpec::required("price", FieldType::Decimal),
        FieldSpec::required("quantity", FieldType::Integer),
        FieldSpec::optional("image_url", FieldType::Text),
        FieldSpec::optional("status", FieldType::Text),
        FieldSpec::assigned("date_created", FieldType::Timestamp),
    ],
};

/// Returns the static schema of `kind`.
pub fn entity_schema(kind: EntityKind) -> &'static EntitySchema {
    match kind {
        EntityKind::Category => &CATEGORY,
        EntityKind::Book => &BOOK,
        EntityKind::Grocery => &GROCERY,
    }
}

/// Gateway operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    ListAll,
    GetById,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::ListAll,
        OperationKind::GetById,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    /// Log/diagnostic label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ListAll => "list_all",
            Self::GetById => "get_by_id",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Registered operation name for `kind`, e.g. `allBooks` or `createGrocery`.
    pub fn operation_name(self, kind: EntityKind) -> String {
        match self {
            Self::ListAll => format!("all{}", kind.plural()),
            Self::GetById => format!("single{}", kind.plural()),
            Self::Create => format!("create{}", kind.name()),
            Self::Update => format!("update{}", kind.name()),
            Self::Delete => format!("delete{}", kind.name()),
        }
    }
}

/// Declared result shape of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    List(EntityKind),
    Single(EntityKind),
    /// Success carries no record.
    Void,
}

/// One declared operation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    /// Alternate argument keys accepted in place of `name`.
    pub aliases: &'static [&'static str],
}

impl InputField {
    fn from_spec(field: &FieldSpec, required: bool) -> Self {
        Self {
            name: field.name,
            ty: field.ty,
            required,
            aliases: &[],
        }
    }
}

/// Declared shape of one named operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: String,
    pub kind: OperationKind,
    pub entity: EntityKind,
    pub input_fields: Vec<InputField>,
    pub output: OutputType,
}

impl OperationSpec {
    fn build(kind: OperationKind, entity: EntityKind) -> Self {
        let schema = entity_schema(entity);
        let id_field = InputField {
            name: "id",
            ty: FieldType::Integer,
            required: true,
            aliases: &[],
        };

        let (input_fields, output) = match kind {
            OperationKind::ListAll => (Vec::new(), OutputType::List(entity)),
            OperationKind::GetById => (
                vec![InputField {
                    aliases: lookup_id_aliases(entity),
                    ..id_field
                }],
                OutputType::Single(entity),
            ),
            OperationKind::Create => (
                schema
                    .input_fields()
                    .map(|field| InputField::from_spec(field, field.required_on_create))
                    .collect(),
                OutputType::Single(entity),
            ),
            OperationKind::Update => (
                std::iter::once(id_field)
                    .chain(
                        schema
                            .input_fields()
                            .map(|field| InputField::from_spec(field, false)),
                    )
                    .collect(),
                OutputType::Single(entity),
            ),
            OperationKind::Delete => (vec![id_field], OutputType::Void),
        };

        Self {
            name: kind.operation_name(entity),
            kind,
            entity,
            input_fields,
            output,
        }
    }

    pub fn input_field(&self, name: &str) -> Option<&InputField> {
        self.input_fields.iter().find(|field| field.name == name)
    }

    /// Reads the declared argument `name` from `args`, trying its aliases
    /// after the canonical key. Undeclared arguments read as `None`.
    pub fn argument<'a>(&self, name: &str, args: &'a Value) -> Option<&'a Value> {
        let field = self.input_field(name)?;
        std::iter::once(field.name)
            .chain(field.aliases.iter().copied())
            .find_map(|key| args.get(key))
    }
}

/// Per-entity id keys of the single-record lookups (`singleBooks(book_id:)`).
fn lookup_id_aliases(entity: EntityKind) -> &'static [&'static str] {
    match entity {
        EntityKind::Category => &["category_id"],
        EntityKind::Book => &["book_id"],
        EntityKind::Grocery => &["grocery_id", "geoceries_id"],
    }
}

/// Registry lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown entity: `{0}`")]
    UnknownEntity(String),
    #[error("unknown operation: `{0}`")]
    UnknownOperation(String),
}

/// Immutable table of entity and operation declarations.
#[derive(Debug)]
pub struct SchemaRegistry {
    operations: BTreeMap<String, OperationSpec>,
}

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::build);

/// Returns the process-wide registry.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

impl SchemaRegistry {
    fn build() -> Self {
        let operations = EntityKind::ALL
            .into_iter()
            .flat_map(|entity| {
                OperationKind::ALL
                    .into_iter()
                    .map(move |kind| OperationSpec::build(kind, entity))
            })
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self { operations }
    }

    /// Looks up the field list of an entity by caller-supplied name.
    pub fn describe_entity(&self, name: &str) -> Result<&'static EntitySchema, SchemaError> {
        EntityKind::parse(name)
            .map(entity_schema)
            .ok_or_else(|| SchemaError::UnknownEntity(name.to_string()))
    }

    /// Looks up an operation by its exact registered name.
    pub fn describe_operation(&self, name: &str) -> Result<&OperationSpec, SchemaError> {
        self.operations
            .get(name)
            .ok_or_else(|| SchemaError::UnknownOperation(name.to_string()))
    }

    /// Registered operations sorted by name.
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{registry, FieldType, OperationKind, OutputType, SchemaError};
    use crate::model::entity::EntityKind;
    use serde_json::json;

    #[test]
    fn describe_entity_lists_declared_fields() {
        let schema = registry()
            .describe_entity("Grocery")
            .expect("Grocery is registered");
        let names: Vec<_> = schema.fields.iter().map(|field| field.name).collect();
        assert_eq!(
            names,
            [
                "id",
                "product_tag",
                "name",
                "category",
                "price",
                "quantity",
                "image_url",
                "status",
                "date_created"
            ]
        );
        assert_eq!(
            schema.field("category").map(|field| field.ty),
            Some(FieldType::Reference(EntityKind::Category))
        );
    }

    #[test]
    fn describe_entity_rejects_unknown_name() {
        let err = registry()
            .describe_entity("Author")
            .expect_err("Author is not an entity");
        assert_eq!(err, SchemaError::UnknownEntity("Author".to_string()));
    }

    #[test]
    fn store_assigned_fields_are_not_inputs() {
        let schema = registry()
            .describe_entity("Book")
            .expect("Book is registered");
        assert!(schema
            .input_fields()
            .all(|field| field.name != "id" && field.name != "date_created"));
        let required: Vec<_> = schema.required_fields().map(|field| field.name).collect();
        assert_eq!(required, ["title", "author", "price", "quantity"]);
    }

    #[test]
    fn every_entity_has_the_full_operation_set() {
        assert_eq!(registry().operations().count(), 15);
        for name in [
            "allCategories",
            "singleBooks",
            "createGrocery",
            "updateBook",
            "deleteCategory",
        ] {
            assert!(registry().describe_operation(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn describe_operation_reports_inputs_and_output() {
        let create = registry()
            .describe_operation("createCategory")
            .expect("createCategory is registered");
        assert_eq!(create.kind, OperationKind::Create);
        assert_eq!(create.output, OutputType::Single(EntityKind::Category));
        assert!(create.input_field("title").expect("title argument").required);
        assert!(create.input_field("id").is_none());

        let update = registry()
            .describe_operation("updateBook")
            .expect("updateBook is registered");
        assert!(update.input_field("id").expect("id argument").required);
        assert!(!update.input_field("price").expect("price argument").required);

        let delete = registry()
            .describe_operation("deleteGrocery")
            .expect("deleteGrocery is registered");
        assert_eq!(delete.output, OutputType::Void);
    }

    #[test]
    fn single_lookups_accept_entity_id_keys() {
        let single = registry()
            .describe_operation("singleGroceries")
            .expect("singleGroceries is registered");
        assert_eq!(single.argument("id", &json!({"id": 3})), Some(&json!(3)));
        assert_eq!(
            single.argument("id", &json!({"geoceries_id": 4})),
            Some(&json!(4))
        );
        assert_eq!(
            single.argument("id", &json!({"grocery_id": 5, "id": 6})),
            Some(&json!(6))
        );
        assert_eq!(single.argument("id", &json!({"book_id": 1})), None);

        let delete = registry()
            .describe_operation("deleteBook")
            .expect("deleteBook is registered");
        assert_eq!(delete.argument("id", &json!({"book_id": 1})), None);
        assert_eq!(delete.argument("title", &json!({"title": "Dune"})), None);
    }

    #[test]
    fn describe_operation_rejects_unknown_name() {
        let err = registry()
            .describe_operation("dropTables")
            .expect_err("dropTables is not an operation");
        assert_eq!(err, SchemaError::UnknownOperation("dropTables".to_string()));
    }
}
