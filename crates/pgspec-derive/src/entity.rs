//! Entity derive macro implementation
//!
//! ## Module Structure
//!
//! - `attrs`: struct- and field-level attribute parsing

mod attrs;

use attrs::{RelationKind, parse_field_attrs, parse_struct_attrs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input)?;
    let table = struct_attrs.table.clone().ok_or_else(|| {
        syn::Error::new_spanned(
            &input,
            "Entity requires #[orm(table = \"table_name\")] attribute",
        )
    })?;
    let entity_name = struct_attrs
        .name
        .clone()
        .unwrap_or_else(|| name.to_string());

    let mut calls = Vec::new();
    let mut primary_key: Option<String> = None;

    for field in fields {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();
        let column = attrs.column.unwrap_or_else(|| field_name.clone());

        if attrs.is_id {
            if primary_key.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Entity supports a single #[orm(id)] field",
                ));
            }
            primary_key = Some(column.clone());
        }
        calls.push(quote! { .column_as(#field_name, #column) });
    }

    let pk_call = primary_key.map(|pk| quote! { .primary_key(#pk) });

    for rel in &struct_attrs.relations {
        let model = &rel.model;
        let field = &rel.name;
        let target = quote! { <#model as ::pgspec::Entity>::entity_name() };
        calls.push(match &rel.kind {
            RelationKind::BelongsTo { foreign_key } => {
                quote! { .belongs_to(#field, #target, #foreign_key) }
            }
            RelationKind::HasOne { foreign_key } => {
                quote! { .has_one(#field, #target, #foreign_key) }
            }
            RelationKind::HasMany { foreign_key } => {
                quote! { .has_many(#field, #target, #foreign_key) }
            }
            RelationKind::ManyToMany {
                through,
                self_key,
                other_key,
            } => {
                quote! { .many_to_many(#field, #target, #through, #self_key, #other_key) }
            }
        });
    }

    for coll in &struct_attrs.collections {
        let field = &coll.name;
        let table = &coll.table;
        let foreign_key = &coll.foreign_key;
        let column = &coll.column;
        calls.push(quote! { .element_collection(#field, #table, #foreign_key, #column) });
    }

    Ok(quote! {
        impl #impl_generics ::pgspec::Entity for #name #ty_generics #where_clause {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn entity_meta() -> ::pgspec::EntityMeta {
                ::pgspec::EntityMeta::new(#entity_name, #table)
                    #(#calls)*
                    #pk_call
            }
        }
    })
}
