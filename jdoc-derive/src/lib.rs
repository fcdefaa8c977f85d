// Copyright 2024 the jdoc authors.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `#[derive(RawLayout)]`: generates little-endian `parse_bytes`/`write_bytes`
//! for the small set of fixed-size header structs in `jdoc-types::header`.
//!
//! Unlike a general-purpose binary-serialization derive, this macro only
//! needs to understand a handful of field types (`u8`, `u16`, `u32`, `u64`,
//! `i16`, `i32`, `i64`, `f32`, `f64`, and the crate's own [`U24`] offset
//! type) because the wire format defines exactly three fixed-size header
//! shapes (§4.1.1, §4.1.2). Anything with trailing variable-length data
//! (keys, strings, nested regions) is walked by hand in `jdoc-core` instead.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

#[proc_macro_derive(RawLayout)]
pub fn derive_raw_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    &input.ident,
                    "RawLayout only supports structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input.ident, "RawLayout only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut parse_stmts = Vec::new();
    let mut field_names = Vec::new();
    let mut write_stmts = Vec::new();
    let mut size_terms = Vec::new();

    for field in fields {
        let field_ident = field
            .ident
            .as_ref()
            .expect("named field has an identifier");
        let kind = match FieldKind::from_type(&field.ty) {
            Some(kind) => kind,
            None => {
                return syn::Error::new_spanned(
                    &field.ty,
                    "RawLayout does not know how to encode this field type",
                )
                .to_compile_error()
                .into();
            }
        };

        field_names.push(field_ident.clone());
        size_terms.push(kind.byte_len());

        let parse_fn = kind.parse_fn();
        let write_fn = kind.write_fn();

        parse_stmts.push(match kind {
            FieldKind::U24 => quote! {
                let #field_ident: crate::pod::U24 =
                    ::core::convert::TryInto::try_into(crate::pod::parse_u24(offset, data)?)?;
            },
            _ => quote! {
                let #field_ident = crate::pod::#parse_fn(offset, data)?;
            },
        });

        write_stmts.push(match kind {
            FieldKind::U24 => quote! {
                crate::pod::write_u24(buf, ::core::convert::From::from(self.#field_ident));
            },
            _ => quote! {
                crate::pod::#write_fn(buf, self.#field_ident);
            },
        });
    }

    let total_size = size_terms
        .into_iter()
        .fold(quote! { 0usize }, |acc, term| quote! { #acc + #term });

    let expanded = quote! {
        impl #name {
            /// Total encoded byte size of this fixed-size header.
            pub const ENCODED_SIZE: usize = #total_size;

            /// Parse an instance starting at `*offset`, advancing `*offset`
            /// past it.
            pub fn parse_bytes(
                offset: &mut usize,
                data: &[u8],
            ) -> ::core::result::Result<Self, crate::error::ParseError> {
                #( #parse_stmts )*
                Ok(Self { #( #field_names ),* })
            }

            /// Append the little-endian encoding of this header to `buf`.
            pub fn write_bytes(&self, buf: &mut alloc::vec::Vec<u8>) {
                #( #write_stmts )*
            }
        }
    };

    expanded.into()
}

#[derive(Clone, Copy)]
enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I16,
    I32,
    I64,
    F32,
    F64,
    U24,
}

impl FieldKind {
    fn from_type(ty: &Type) -> Option<Self> {
        let Type::Path(path) = ty else {
            return None;
        };
        let ident = path.path.segments.last()?.ident.to_string();
        Some(match ident.as_str() {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "U24" => Self::U24,
            _ => return None,
        })
    }

    fn byte_len(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::U24 => 3,
        }
    }

    fn parse_fn(self) -> syn::Ident {
        let name = match self {
            Self::U8 => "parse_u8",
            Self::U16 => "parse_le_u16",
            Self::U32 => "parse_le_u32",
            Self::U64 => "parse_le_u64",
            Self::I16 => "parse_le_i16",
            Self::I32 => "parse_le_i32",
            Self::I64 => "parse_le_i64",
            Self::F32 => "parse_le_f32",
            Self::F64 => "parse_le_f64",
            Self::U24 => "parse_u24",
        };
        syn::Ident::new(name, proc_macro2::Span::call_site())
    }

    fn write_fn(self) -> syn::Ident {
        let name = match self {
            Self::U8 => "write_u8",
            Self::U16 => "write_u16",
            Self::U32 => "write_u32",
            Self::U64 => "write_u64",
            Self::I16 => "write_i16",
            Self::I32 => "write_i32",
            Self::I64 => "write_i64",
            Self::F32 => "write_f32",
            Self::F64 => "write_f64",
            Self::U24 => "write_u24",
        };
        syn::Ident::new(name, proc_macro2::Span::call_site())
    }
}
