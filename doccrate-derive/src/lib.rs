mod attribute_parser;
mod code_generator;
mod field_analyzer;
mod structs;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Generates `{Name}Create`, `{Name}Update` and `impl CRUDResource for {Name}`
/// from a record struct with an `id` field.
///
/// ```rust,ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, DocumentToModels)]
/// #[doccrate(name_singular = "widget", collection = "shelf")]
/// pub struct Widget {
///     pub id: String,
///     pub name: String,
///     /// Nullable: `{"size": null}` clears it, omitting it leaves it alone.
///     pub size: Option<i64>,
///     #[doccrate(exclude(update))]
///     pub sku: String,
/// }
/// ```
///
/// Struct attributes, all optional:
///
/// - `name_singular`: defaults to the snake-case struct name
/// - `name_plural`: defaults to `name_singular` + `s`
/// - `collection`: defaults to `name_plural`
/// - `description`: shown in the OpenAPI document
///
/// Field attributes:
///
/// - `exclude(create)`, `exclude(update)`, or the longhand
///   `create_model = false` / `update_model = false`
/// - `on_create = <expr>`: value written on create when the caller sends none.
///   Fields excluded from create always get it.
///
/// A field excluded from create must have `on_create`, an `Option<_>` type or
/// `#[serde(default)]`, otherwise stored records could not be read back.
#[proc_macro_derive(DocumentToModels, attributes(doccrate))]
pub fn document_to_models(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    code_generator::expand_document_to_models(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
