use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Member, parse_macro_input};

/// Derives `WriteBytesBe` and `WriteBytesLe` by writing every field in
/// declaration order.
///
/// A field marked `#[bytes(u24)]` is written as a 3-byte integer through
/// `byteorder::U24`; it must be a `u32`.
///
/// The generated impls refer to `crate::byteorder`, so the deriving crate must
/// provide that module.
#[proc_macro_derive(ToBytes, attributes(bytes))]
pub fn derive_to_bytes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Struct(s) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "ToBytes can only be derived for structs",
        ));
    };

    let fields: Vec<(Member, bool)> = match &s.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|f| -> syn::Result<(Member, bool)> {
                let ident = f.ident.clone().ok_or_else(|| missing_ident(f))?;
                Ok((Member::from(ident), is_u24(f)?))
            })
            .collect::<syn::Result<_>>()?,
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| -> syn::Result<(Member, bool)> {
                Ok((Member::from(syn::Index::from(i)), is_u24(f)?))
            })
            .collect::<syn::Result<_>>()?,
        Fields::Unit => Vec::new(),
    };

    let values: Vec<TokenStream2> = fields
        .iter()
        .map(|(member, u24)| {
            if *u24 {
                quote!(&crate::byteorder::U24(self.#member))
            } else {
                quote!(&self.#member)
            }
        })
        .collect();

    Ok(quote! {
        impl crate::byteorder::WriteBytesBe for #name {
            fn write_be(&self, dst: &mut Vec<u8>) {
                #( crate::byteorder::WriteBytesBe::write_be(#values, dst); )*
            }
        }

        impl crate::byteorder::WriteBytesLe for #name {
            fn write_le(&self, dst: &mut Vec<u8>) {
                #( crate::byteorder::WriteBytesLe::write_le(#values, dst); )*
            }
        }
    })
}

fn missing_ident(field: &Field) -> syn::Error {
    syn::Error::new_spanned(field, "expected a named field")
}

fn is_u24(field: &Field) -> syn::Result<bool> {
    let mut u24 = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bytes")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("u24") {
                u24 = true;
                Ok(())
            } else {
                Err(meta.error("unsupported bytes attribute, expected `u24`"))
            }
        })?;
    }

    Ok(u24)
}
