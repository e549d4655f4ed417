//! Attribute parsing for the Reflect derive macro

use syn::{DeriveInput, Field, Ident, LitStr};

/// Parsed struct-level `#[reflect(...)]` options
#[derive(Debug, Default, Clone)]
pub struct ReflectTypeAttribute {
    /// Registered type name, defaults to the struct name
    pub name: Option<String>,
    /// Factory category
    pub category: Option<String>,
    /// Method returning `Option<Aabb>` for pickable components
    pub drawable: Option<Ident>,
}

/// Parsed field-level `#[reflect(...)]` options
#[derive(Debug, Default, Clone)]
pub struct ReflectFieldAttribute {
    pub rename: Option<String>,
    pub skip: bool,
    pub readonly: bool,
}

/// Parse the struct-level reflect attribute
pub fn parse_type_attributes(input: &DeriveInput) -> syn::Result<ReflectTypeAttribute> {
    let mut attrs = ReflectTypeAttribute::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("category") {
                attrs.category = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("drawable") {
                let method = meta.value()?.parse::<LitStr>()?;
                attrs.drawable = Some(method.parse()?);
            } else {
                return Err(meta.error("unsupported reflect option"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// Parse the reflect attribute of a single field
pub fn parse_field_attributes(field: &Field) -> syn::Result<ReflectFieldAttribute> {
    let mut attrs = ReflectFieldAttribute::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                attrs.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("readonly") {
                attrs.readonly = true;
            } else {
                return Err(meta.error("unsupported reflect field option"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}
