use convert_case::{Case, Casing};

/// Struct-level `#[doccrate(...)]` settings.
#[derive(Debug, Default)]
pub(super) struct ResourceMeta {
    pub(super) name_singular: Option<String>,
    pub(super) name_plural: Option<String>,
    pub(super) collection: Option<String>,
    pub(super) description: Option<String>,
}

/// Names after defaults are applied.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct ResourceNames {
    pub(super) singular: String,
    pub(super) plural: String,
    pub(super) collection: String,
    pub(super) description: String,
}

impl ResourceMeta {
    /// Singular defaults to the snake-case struct name, plural to singular
    /// plus `s`, collection to plural.
    pub(super) fn with_defaults(self, struct_name: &str) -> ResourceNames {
        let singular = self
            .name_singular
            .unwrap_or_else(|| struct_name.to_case(Case::Snake));
        let plural = self.name_plural.unwrap_or_else(|| format!("{singular}s"));
        let collection = self.collection.unwrap_or_else(|| plural.clone());
        ResourceNames {
            singular,
            plural,
            collection,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Field-level `#[doccrate(...)]` settings.
pub(super) struct FieldOptions {
    pub(super) in_create: bool,
    pub(super) in_update: bool,
    /// `on_create = <expr>`: written on create when the caller gave no value.
    pub(super) on_create: Option<syn::Expr>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            in_create: true,
            in_update: true,
            on_create: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_struct_name() {
        let names = ResourceMeta::default().with_defaults("StockItem");
        assert_eq!(names.singular, "stock_item");
        assert_eq!(names.plural, "stock_items");
        assert_eq!(names.collection, "stock_items");
        assert_eq!(names.description, "");
    }

    #[test]
    fn test_explicit_plural_drives_collection() {
        let meta = ResourceMeta {
            name_singular: Some("person".into()),
            name_plural: Some("people".into()),
            ..ResourceMeta::default()
        };
        let names = meta.with_defaults("Person");
        assert_eq!(names.plural, "people");
        assert_eq!(names.collection, "people");
    }
}
