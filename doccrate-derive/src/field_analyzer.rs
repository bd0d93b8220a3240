/// Returns true if the field's type is `Option<…>` (including `std::option::Option<…>`).
pub(crate) fn field_is_optional(field: &syn::Field) -> bool {
    if let syn::Type::Path(type_path) = &field.ty
        && let Some(last_seg) = type_path.path.segments.last()
    {
        last_seg.ident == "Option"
    } else {
        false
    }
}

/// `Option<T>` → `T`; any other type is returned unchanged.
pub(crate) fn extract_inner_type_for_update(ty: &syn::Type) -> syn::Type {
    if let syn::Type::Path(type_path) = ty
        && let Some(last_seg) = type_path.path.segments.last()
        && last_seg.ident == "Option"
        && let syn::PathArguments::AngleBracketed(args) = &last_seg.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return inner.clone();
    }
    ty.clone()
}

pub(crate) fn is_id_field(field: &syn::Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "id")
}

/// `///` doc comments on a field, carried over to the generated models.
pub(crate) fn doc_attrs(field: &syn::Field) -> Vec<&syn::Attribute> {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .collect()
}

pub(crate) fn serde_attrs(attrs: &[syn::Attribute]) -> Vec<&syn::Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;
    use syn::parse_quote;

    #[test]
    fn test_field_is_optional() {
        let field: syn::Field = parse_quote!(size: Option<i64>);
        assert!(field_is_optional(&field));
        let field: syn::Field = parse_quote!(size: std::option::Option<i64>);
        assert!(field_is_optional(&field));
        let field: syn::Field = parse_quote!(size: i64);
        assert!(!field_is_optional(&field));
    }

    #[test]
    fn test_extract_inner_type() {
        let ty: syn::Type = parse_quote!(Option<Vec<String>>);
        let inner = extract_inner_type_for_update(&ty);
        assert_eq!(quote!(#inner).to_string(), quote!(Vec<String>).to_string());
    }
}
