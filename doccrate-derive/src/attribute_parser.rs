use syn::parse::Parser;
use syn::{Lit, Meta, punctuated::Punctuated, token::Comma};

use super::structs::{FieldOptions, ResourceMeta};

const ATTRIBUTE: &str = "doccrate";

fn doccrate_metas(attrs: &[syn::Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs {
        if attr.path().is_ident(ATTRIBUTE) {
            let list = attr.meta.require_list()?;
            metas.extend(Punctuated::<Meta, Comma>::parse_terminated.parse2(list.tokens.clone())?);
        }
    }
    Ok(metas)
}

fn string_value(nv: &syn::MetaNameValue) -> syn::Result<String> {
    if let syn::Expr::Lit(expr_lit) = &nv.value
        && let Lit::Str(s) = &expr_lit.lit
    {
        return Ok(s.value());
    }
    Err(syn::Error::new_spanned(&nv.value, "expected a string literal"))
}

fn bool_value(nv: &syn::MetaNameValue) -> syn::Result<bool> {
    if let syn::Expr::Lit(expr_lit) = &nv.value
        && let Lit::Bool(b) = &expr_lit.lit
    {
        return Ok(b.value());
    }
    Err(syn::Error::new_spanned(&nv.value, "expected `true` or `false`"))
}

/// Parses `#[doccrate(name_singular = "...", name_plural = "...", collection = "...",
/// description = "...")]` on the record struct.
pub(crate) fn parse_resource_meta(attrs: &[syn::Attribute]) -> syn::Result<ResourceMeta> {
    let mut meta = ResourceMeta::default();

    for item in doccrate_metas(attrs)? {
        let Meta::NameValue(nv) = &item else {
            return Err(syn::Error::new_spanned(item, "expected `key = \"value\"`"));
        };
        let value = string_value(nv)?;
        if nv.path.is_ident("name_singular") {
            meta.name_singular = Some(value);
        } else if nv.path.is_ident("name_plural") {
            meta.name_plural = Some(value);
        } else if nv.path.is_ident("collection") {
            meta.collection = Some(value);
        } else if nv.path.is_ident("description") {
            meta.description = Some(value);
        } else {
            return Err(syn::Error::new_spanned(
                &nv.path,
                "unknown doccrate attribute; expected one of `name_singular`, `name_plural`, `collection`, `description`",
            ));
        }
    }
    Ok(meta)
}

/// Parses field-level `#[doccrate(exclude(create, update))]`, the
/// equivalent `create_model = false` / `update_model = false`, and
/// `on_create = <expr>`.
pub(crate) fn parse_field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for item in doccrate_metas(&field.attrs)? {
        match &item {
            Meta::List(list) if list.path.is_ident("exclude") => {
                let targets =
                    Punctuated::<syn::Ident, Comma>::parse_terminated.parse2(list.tokens.clone())?;
                for target in targets {
                    if target == "create" {
                        options.in_create = false;
                    } else if target == "update" {
                        options.in_update = false;
                    } else {
                        return Err(syn::Error::new_spanned(
                            target,
                            "expected `create` or `update`",
                        ));
                    }
                }
            }
            Meta::NameValue(nv) if nv.path.is_ident("create_model") => {
                options.in_create = bool_value(nv)?;
            }
            Meta::NameValue(nv) if nv.path.is_ident("update_model") => {
                options.in_update = bool_value(nv)?;
            }
            Meta::NameValue(nv) if nv.path.is_ident("on_create") => {
                options.on_create = Some(nv.value.clone());
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    item,
                    "unknown doccrate field attribute; expected `exclude(...)`, `create_model`, `update_model` or `on_create`",
                ));
            }
        }
    }
    Ok(options)
}

/// Serde keys that only rename a field and can be carried over to the update
/// model without clashing with its own `default`/`skip_serializing_if`/`with`.
const FIELD_RENAME_KEYS: &[&str] = &["rename", "alias"];
const CONTAINER_RENAME_KEYS: &[&str] = &["rename_all"];

fn serde_metas(attrs: &[syn::Attribute], keys: &[&str]) -> syn::Result<Vec<Meta>> {
    let mut kept = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("serde") {
            let list = attr.meta.require_list()?;
            for meta in Punctuated::<Meta, Comma>::parse_terminated.parse2(list.tokens.clone())? {
                if keys.iter().any(|key| meta.path().is_ident(key)) {
                    kept.push(meta);
                }
            }
        }
    }
    Ok(kept)
}

/// Whether `#[serde(default)]` (or `default = "...")`) lets the record
/// deserialize without this key.
pub(crate) fn has_serde_default(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    Ok(!serde_metas(attrs, &["default"])?.is_empty())
}

/// `#[serde(...)]` renames of a field, for the update model.
pub(crate) fn rename_only_serde_attrs(field: &syn::Field) -> syn::Result<Vec<Meta>> {
    serde_metas(&field.attrs, FIELD_RENAME_KEYS)
}

/// `#[serde(rename_all = "...")]` of the record, for both generated models.
pub(crate) fn container_rename_attrs(attrs: &[syn::Attribute]) -> syn::Result<Vec<Meta>> {
    serde_metas(attrs, CONTAINER_RENAME_KEYS)
}
