//! Generate the Reflect and TypeInfo implementations for a component struct

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::reflect_attributes::{parse_field_attributes, parse_type_attributes};

/// One reflected field with its attribute name
struct ReflectedField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    name: String,
    readonly: bool,
}

pub fn generate_reflect_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let type_attrs = parse_type_attributes(input)?;
    let ident = &input.ident;
    let type_name = type_attrs.name.clone().unwrap_or_else(|| ident.to_string());

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Reflect cannot be derived for unit structs",
                ))
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Reflect requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Reflect can only be derived for structs",
            ))
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let attrs = parse_field_attributes(field)?;
        if attrs.skip {
            continue;
        }
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        fields.push(ReflectedField {
            ident: field_ident,
            ty: &field.ty,
            name: attrs.rename.unwrap_or_else(|| field_ident.to_string()),
            readonly: attrs.readonly,
        });
    }

    let infos = fields.iter().map(|f| {
        let name = &f.name;
        let ty = f.ty;
        if f.readonly {
            quote! {
                ::engine::reflect::AttributeInfo::read_only(
                    #name,
                    <#ty as ::engine::reflect::ReflectValue>::KIND,
                ),
            }
        } else {
            quote! {
                ::engine::reflect::AttributeInfo::new(
                    #name,
                    <#ty as ::engine::reflect::ReflectValue>::KIND,
                ),
            }
        }
    });

    let get_arms = fields.iter().map(|f| {
        let name = &f.name;
        let field = f.ident;
        quote! {
            #name => Some(::engine::reflect::ReflectValue::to_variant(&self.#field)),
        }
    });

    let set_arms = fields.iter().map(|f| {
        let name = &f.name;
        let field = f.ident;
        if f.readonly {
            quote! {
                #name => Err(::engine::reflect::ReflectError::ReadOnly(#name.to_string())),
            }
        } else {
            quote! {
                #name => ::engine::reflect::assign(&mut self.#field, #name, value),
            }
        }
    });

    let category = match &type_attrs.category {
        Some(category) => quote! { Some(#category) },
        None => quote! { None },
    };

    let drawable = type_attrs.drawable.as_ref().map(|method| {
        quote! {
            fn drawable_bounds(&self) -> Option<::engine::core::math::Aabb> {
                self.#method()
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::engine::reflect::TypeInfo for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const CATEGORY: Option<&'static str> = #category;
        }

        impl #impl_generics ::engine::reflect::Reflect for #ident #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn attributes(&self) -> &'static [::engine::reflect::AttributeInfo] {
                const ATTRIBUTES: &[::engine::reflect::AttributeInfo] = &[#(#infos)*];
                ATTRIBUTES
            }

            fn attribute(&self, name: &str) -> Option<::engine::variant::Variant> {
                match name {
                    #(#get_arms)*
                    _ => None,
                }
            }

            fn set_attribute(
                &mut self,
                name: &str,
                value: ::engine::variant::Variant,
            ) -> Result<(), ::engine::reflect::ReflectError> {
                match name {
                    #(#set_arms)*
                    _ => {
                        drop(value);
                        Err(::engine::reflect::ReflectError::UnknownAttribute {
                            type_name: #type_name.to_string(),
                            attribute: name.to_string(),
                        })
                    }
                }
            }

            #drawable

            fn clone_boxed(&self) -> Box<dyn ::engine::reflect::Reflect> {
                Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    })
}
