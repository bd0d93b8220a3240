use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, punctuated::Punctuated, token::Comma};

use crate::attribute_parser::{
    container_rename_attrs, has_serde_default, parse_field_options, parse_resource_meta,
    rename_only_serde_attrs,
};
use crate::field_analyzer::{
    doc_attrs, extract_inner_type_for_update, field_is_optional, is_id_field, serde_attrs,
};
use crate::structs::FieldOptions;

fn named_fields(input: &DeriveInput) -> syn::Result<&Punctuated<syn::Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(&named.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "DocumentToModels only supports structs with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "DocumentToModels can only be derived for structs",
        )),
    }
}

fn create_field(field: &syn::Field) -> TokenStream {
    let ident = &field.ident;
    let ty = &field.ty;
    let docs = doc_attrs(field);
    let serde = serde_attrs(&field.attrs);
    quote! {
        #(#docs)*
        #(#serde)*
        pub #ident: #ty
    }
}

/// A field the caller may leave out. Used by the update model, and by the
/// create model for fields with an `on_create` default.
fn optional_field(field: &syn::Field) -> syn::Result<TokenStream> {
    let ident = &field.ident;
    let docs = doc_attrs(field);
    let renames = rename_only_serde_attrs(field)?;
    let renames = if renames.is_empty() {
        quote! {}
    } else {
        quote! { #[serde(#(#renames),*)] }
    };

    // `None` = not supplied. Nullable fields take `Some(None)` for an explicit
    // null; everywhere else a null is a deserialization error.
    let tokens = if field_is_optional(field) {
        let inner = extract_inner_type_for_update(&field.ty);
        quote! {
            #(#docs)*
            #renames
            #[serde(
                default,
                skip_serializing_if = "::core::option::Option::is_none",
                with = "::doccrate::serde_with::rust::double_option"
            )]
            pub #ident: ::core::option::Option<::core::option::Option<#inner>>
        }
    } else {
        let ty = &field.ty;
        quote! {
            #(#docs)*
            #renames
            #[serde(
                default,
                skip_serializing_if = "::core::option::Option::is_none",
                with = "::doccrate::serde_with::rust::unwrap_or_skip"
            )]
            pub #ident: ::core::option::Option<#ty>
        }
    };
    Ok(tokens)
}

struct OnCreate<'a> {
    field: &'a syn::Field,
    expr: syn::Expr,
}

/// Overrides `create_document` so `on_create` values fill the keys the
/// caller left out.
fn create_document_fn(defaults: &[OnCreate<'_>], container_serde: &TokenStream) -> syn::Result<TokenStream> {
    if defaults.is_empty() {
        return Ok(quote! {});
    }
    let mut fields = Vec::new();
    let mut values = Vec::new();
    for OnCreate { field, expr } in defaults {
        let ident = &field.ident;
        let ty = &field.ty;
        let renames = rename_only_serde_attrs(field)?;
        let renames = if renames.is_empty() {
            quote! {}
        } else {
            quote! { #[serde(#(#renames),*)] }
        };
        fields.push(quote! { #renames #ident: #ty });
        values.push(quote! { #ident: (#expr).into() });
    }

    Ok(quote! {
        #[allow(clippy::useless_conversion)]
        fn create_document(
            data: &Self::CreateModel,
        ) -> ::core::result::Result<::doccrate::Document, ::doccrate::StoreError> {
            #[derive(::doccrate::serde::Serialize)]
            #[serde(crate = "::doccrate::serde")]
            #container_serde
            struct OnCreate {
                #(#fields),*
            }

            let mut document = ::doccrate::core::document::write_document(data)?;
            let defaults = ::doccrate::core::document::to_document(&OnCreate {
                #(#values),*
            })?;
            for (key, value) in defaults {
                document.entry(key).or_insert(value);
            }
            ::core::result::Result::Ok(document)
        }
    })
}

pub(crate) fn expand_document_to_models(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "DocumentToModels does not support generic structs",
        ));
    }

    let name = &input.ident;
    let vis = &input.vis;
    let create_name = format_ident!("{}Create", name);
    let update_name = format_ident!("{}Update", name);

    let fields = named_fields(input)?;
    if !fields.iter().any(is_id_field) {
        return Err(syn::Error::new_spanned(
            name,
            "DocumentToModels requires an `id` field holding the record identifier",
        ));
    }

    let container_default = has_serde_default(&input.attrs)?;
    let mut create_fields = Vec::new();
    let mut update_fields = Vec::new();
    let mut defaults = Vec::new();
    for field in fields.iter().filter(|field| !is_id_field(field)) {
        let FieldOptions {
            in_create,
            in_update,
            on_create,
        } = parse_field_options(field)?;
        match (in_create, on_create) {
            (true, None) => create_fields.push(create_field(field)),
            (true, Some(expr)) => {
                create_fields.push(optional_field(field)?);
                defaults.push(OnCreate { field, expr });
            }
            (false, Some(expr)) => defaults.push(OnCreate { field, expr }),
            (false, None) => {
                // Nothing would ever write this key, so no stored record could be read back.
                if !field_is_optional(field) && !container_default && !has_serde_default(&field.attrs)? {
                    return Err(syn::Error::new_spanned(
                        field,
                        "a required field excluded from the create model needs `on_create = <expr>`, \
                         an `Option<_>` type or `#[serde(default)]`",
                    ));
                }
            }
        }
        if in_update {
            update_fields.push(optional_field(field)?);
        }
    }

    let names = parse_resource_meta(&input.attrs)?.with_defaults(&name.to_string());
    let singular = &names.singular;
    let plural = &names.plural;
    let collection = &names.collection;
    let description = &names.description;

    let container_renames = container_rename_attrs(&input.attrs)?;
    let container_serde = if container_renames.is_empty() {
        quote! {}
    } else {
        quote! { #[serde(#(#container_renames),*)] }
    };
    let create_document = create_document_fn(&defaults, &container_serde)?;

    let create_doc = format!("Input for creating a [`{name}`]; the identifier is assigned by the store.");
    let update_doc = format!("Partial update of a [`{name}`]; only supplied fields are written.");

    Ok(quote! {
        #[doc = #create_doc]
        #[derive(Clone, Debug, PartialEq, ::doccrate::serde::Serialize, ::doccrate::serde::Deserialize)]
        #[serde(crate = "::doccrate::serde")]
        #container_serde
        #vis struct #create_name {
            #(#create_fields),*
        }

        #[doc = #update_doc]
        #[derive(Clone, Debug, Default, PartialEq, ::doccrate::serde::Serialize, ::doccrate::serde::Deserialize)]
        #[serde(crate = "::doccrate::serde")]
        #container_serde
        #vis struct #update_name {
            #(#update_fields),*
        }

        impl ::doccrate::CRUDResource for #name {
            type CreateModel = #create_name;
            type UpdateModel = #update_name;

            const RESOURCE_NAME_SINGULAR: &'static str = #singular;
            const RESOURCE_NAME_PLURAL: &'static str = #plural;
            const COLLECTION_NAME: &'static str = #collection;
            const RESOURCE_DESCRIPTION: &'static str = #description;

            #create_document
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_required_field_excluded_from_create_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Part {
                id: String,
                name: String,
                #[doccrate(exclude(create))]
                sku: String,
            }
        };
        let err = expand_document_to_models(&input).unwrap_err();
        assert!(err.to_string().contains("on_create"));
    }

    #[test]
    fn test_excluded_field_with_a_fallback_is_accepted() {
        let inputs: [DeriveInput; 4] = [
            parse_quote! {
                struct Part { id: String, #[doccrate(exclude(create), on_create = "unassigned")] sku: String }
            },
            parse_quote! {
                struct Part { id: String, #[doccrate(exclude(create))] sku: Option<String> }
            },
            parse_quote! {
                struct Part { id: String, #[doccrate(exclude(create))] #[serde(default)] sku: String }
            },
            parse_quote! {
                #[serde(default)]
                struct Part { id: String, #[doccrate(create_model = false)] sku: String }
            },
        ];
        for input in &inputs {
            assert!(expand_document_to_models(input).is_ok());
        }
    }

    #[test]
    fn test_create_document_is_only_overridden_with_defaults() {
        let plain: DeriveInput = parse_quote! {
            struct Part { id: String, name: String }
        };
        let tokens = expand_document_to_models(&plain).unwrap().to_string();
        assert!(!tokens.contains("fn create_document"));

        let defaulted: DeriveInput = parse_quote! {
            struct Part { id: String, #[doccrate(on_create = 1)] count: i64 }
        };
        let tokens = expand_document_to_models(&defaulted).unwrap().to_string();
        assert!(tokens.contains("fn create_document"));
    }
}
