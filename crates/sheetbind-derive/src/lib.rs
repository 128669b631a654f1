//! # sheetbind-derive
//!
//! `#[derive(Record)]` builds a record descriptor from a struct's fields.
//!
//! Field attributes, all inside `#[sheet(...)]`:
//! - `name = "value"` - a tag; `excel = "Header"` binds the field to the
//!   column with that header under the default tag name
//! - `unmarshal` - read through `UnmarshalCell`, write through `IntoCellValue`
//! - `from_str` - read through `FromStr` on the raw text, write through `Display`
//!
//! Primitive fields (`String`, `bool`, integers, floats), chrono date/time
//! fields and `Option`s of either are handled without attributes.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments,
    Type,
};

const PRIMITIVES: &[&str] = &[
    "String", "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64",
];

const DATETIMES: &[&str] = &["NaiveDateTime", "NaiveDate", "DateTime"];

#[proc_macro_derive(Record, attributes(sheet))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };

    let name = &input.ident;
    let type_name = name.to_string();
    let descriptors = fields
        .iter()
        .map(|field| field_descriptor(name, field))
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::sheetbind::Record for #name {
            fn descriptor() -> &'static ::sheetbind::RecordDescriptor<Self> {
                static DESCRIPTOR: ::std::sync::OnceLock<::sheetbind::RecordDescriptor<#name>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    ::sheetbind::RecordDescriptor::new(
                        #type_name,
                        ::std::vec![#(#descriptors),*],
                    )
                })
            }
        }
    })
}

#[derive(Default)]
struct FieldAttrs {
    tags: Vec<(String, String)>,
    unmarshal: bool,
    from_str: bool,
}

fn parse_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("sheet")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("unmarshal") {
                attrs.unmarshal = true;
                return Ok(());
            }
            if meta.path.is_ident("from_str") {
                attrs.from_str = true;
                return Ok(());
            }
            let key = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected `tag = \"value\"`, `unmarshal` or `from_str`"))?
                .to_string();
            let value: LitStr = meta.value()?.parse()?;
            attrs.tags.push((key, value.value()));
            Ok(())
        })?;
    }
    Ok(attrs)
}

enum Shape<'a> {
    Primitive(&'a Type),
    DateTime,
    Other,
}

fn last_ident(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_ident(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

fn shape(ty: &Type) -> Shape<'_> {
    match last_ident(ty) {
        Some(segment) if PRIMITIVES.iter().any(|p| segment.ident == p) => Shape::Primitive(ty),
        Some(segment) if DATETIMES.iter().any(|d| segment.ident == d) => Shape::DateTime,
        _ => Shape::Other,
    }
}

fn field_descriptor(record: &syn::Ident, field: &Field) -> syn::Result<TokenStream2> {
    let attrs = parse_attrs(field)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let ident_str = ident.to_string();
    let ty = &field.ty;

    let tag_keys = attrs.tags.iter().map(|(k, _)| k);
    let tag_values = attrs.tags.iter().map(|(_, v)| v);
    let mut chain = quote! {
        ::sheetbind::FieldDescriptor::<#record>::new(#ident_str)
            .tags(&[#((#tag_keys, #tag_values)),*])
    };
    let mut marshal = None;

    if attrs.unmarshal {
        chain.extend(quote! {
            .cell_unmarshaler(|record, cell, params| {
                ::sheetbind::unmarshal::apply_cell_unmarshaler(&mut record.#ident, cell, params)
            })
        });
        marshal = Some(quote! {
            ::sheetbind::value::IntoCellValue::to_cell_value(&record.#ident)
        });
    }
    if attrs.from_str {
        chain.extend(quote! {
            .text_unmarshaler(|record, text| {
                ::sheetbind::unmarshal::apply_from_str(&mut record.#ident, text)
            })
        });
        marshal.get_or_insert_with(|| {
            quote! {
                ::sheetbind::CellValue::String(::std::string::ToString::to_string(&record.#ident))
            }
        });
    }

    let (inner, pointer) = match option_inner(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    };
    let setter = if pointer {
        quote!(::sheetbind::value::coerce_pointer)
    } else {
        quote!(::sheetbind::value::coerce_into)
    };
    let builtin = match shape(inner) {
        Shape::Primitive(scalar) => Some(quote! {
            .primitive(
                <#scalar as ::sheetbind::value::FromScalar>::KIND,
                #pointer,
                |record, cell, params| #setter(&mut record.#ident, cell, params),
            )
        }),
        Shape::DateTime => Some(quote! {
            .datetime(|record, cell, params| #setter(&mut record.#ident, cell, params))
        }),
        Shape::Other => None,
    };
    if let Some(builtin) = builtin {
        chain.extend(builtin);
        marshal.get_or_insert_with(|| {
            quote! {
                ::sheetbind::value::IntoCellValue::to_cell_value(&record.#ident)
            }
        });
    }

    if let Some(marshal) = marshal {
        chain.extend(quote! {
            .marshal(|record| #marshal)
        });
    }
    Ok(chain)
}
