mod decode_entity;
mod decode_field;

use decode_entity::decode_entity;
use decode_field::FieldKind;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Implement `tabula::Entity` for a struct with named fields.
///
/// ```ignore
/// #[derive(Entity)]
/// #[tabula(table = "depot")]
/// struct Depot {
///     #[tabula("primary_key:inc;start:90000000")]
///     depot_num: i64,
///     #[tabula("default:YYC")]
///     region: String,
///     #[tabula("-")]
///     in_memory: u32,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(tabula))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let metadata = match decode_entity(&input) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let ident = &metadata.ident;
    let table = &metadata.table;
    let mut fields_def = Vec::<TokenStream2>::with_capacity(metadata.fields.len());
    let mut values = Vec::<TokenStream2>::with_capacity(metadata.fields.len());
    let mut load = Vec::<TokenStream2>::with_capacity(metadata.fields.len());
    let mut zeroed = Vec::<TokenStream2>::with_capacity(metadata.fields.len());
    for field in &metadata.fields {
        let field_ident = &field.ident;
        let ty = &field.ty;
        let name = &field.name;
        let storage_name = &field.storage_name;
        let declared_type = &field.declared_type;
        match &field.kind {
            FieldKind::Column(decoded) => {
                let inner = &decoded.inner;
                let nullable = decoded.nullable;
                let attributes = field.annotation.attributes.iter().map(|(k, v)| {
                    quote!((#k, #v))
                });
                fields_def.push(quote! {
                    fields.push(::tabula::FieldDef {
                        name: #name,
                        storage_name: #storage_name,
                        declared_type: #declared_type,
                        value: <#inner as ::tabula::AsValue>::as_empty_value(),
                        nullable_type: #nullable,
                        persisted: true,
                        attributes: ::std::vec![#(#attributes),*],
                    });
                });
                values.push(quote! {
                    values.push(::tabula::AsValue::as_value(::std::clone::Clone::clone(&self.#field_ident)));
                });
                load.push(quote! {
                    if let ::std::option::Option::Some(value) = row.get_column(#storage_name) {
                        self.#field_ident = ::tabula::decode_field::<#ty>(value, #name)?;
                    }
                });
                zeroed.push(quote!(#field_ident: <#ty as ::tabula::ZeroValue>::zero_value()));
            }
            FieldKind::Embedded => {
                fields_def.push(quote! {
                    fields.extend(<#ty as ::tabula::Entity>::fields().iter().cloned());
                });
                values.push(quote! {
                    values.extend(::tabula::Entity::values(&self.#field_ident));
                });
                load.push(quote! {
                    ::tabula::Entity::load(&mut self.#field_ident, row)?;
                });
                zeroed.push(quote!(#field_ident: <#ty as ::tabula::Entity>::zeroed()));
            }
            FieldKind::NotPersisted => {
                fields_def.push(quote! {
                    fields.push(::tabula::FieldDef {
                        name: #name,
                        storage_name: #storage_name,
                        declared_type: #declared_type,
                        value: ::tabula::Value::Null,
                        nullable_type: false,
                        persisted: false,
                        attributes: ::std::vec::Vec::new(),
                    });
                });
                values.push(quote!(values.push(::tabula::Value::Null);));
                zeroed.push(quote!(#field_ident: ::std::default::Default::default()));
            }
        }
    }
    quote! {
        impl ::tabula::Entity for #ident {
            fn table_name() -> &'static str {
                #table
            }
            fn fields() -> &'static [::tabula::FieldDef] {
                static FIELDS: ::std::sync::LazyLock<::std::vec::Vec<::tabula::FieldDef>> =
                    ::std::sync::LazyLock::new(|| {
                        let mut fields = ::std::vec::Vec::new();
                        #(#fields_def)*
                        fields
                    });
                &FIELDS
            }
            fn values(&self) -> ::std::vec::Vec<::tabula::Value> {
                let mut values = ::std::vec::Vec::new();
                #(#values)*
                values
            }
            fn load(&mut self, row: &::tabula::RowLabeled) -> ::tabula::Result<()> {
                #(#load)*
                ::std::result::Result::Ok(())
            }
            fn zeroed() -> Self {
                Self {
                    #(#zeroed),*
                }
            }
        }
    }
    .into()
}
