use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use proc_macro::TokenStream;

/// Derives `WriteBytesLe` and `FixedWidth` for a struct by
/// visiting its fields in declaration order.
///
/// The generated code lives in `crate::utils::byteorder`, so the derive is only
/// usable inside the `pcmwav` crate.
#[proc_macro_derive(ToBytes)]
pub fn derive_to_bytes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let (fields, types): (Vec<syn::Member>, Vec<syn::Type>) = match input.data {
        Data::Struct(ref s) => match s.fields {
            Fields::Named(ref nf) => nf
                .named
                .iter()
                .filter_map(|f| f.ident.clone().map(|id| (id.into(), f.ty.clone())))
                .unzip(),
            Fields::Unnamed(ref uf) => uf
                .unnamed
                .iter()
                .enumerate()
                .map(|(i, f)| (syn::Index::from(i).into(), f.ty.clone()))
                .unzip(),
            Fields::Unit => (Vec::new(), Vec::new()),
        },
        _ => {
            return TokenStream::from(
                syn::Error::new_spanned(&name, "ToBytes can only be derived for structs")
                    .to_compile_error(),
            );
        }
    };

    let expanded = quote! {
        impl crate::utils::byteorder::WriteBytesLe for #name {
            fn write_le(&self, dst: &mut Vec<u8>) {
                #( crate::utils::byteorder::WriteBytesLe::write_le(&self.#fields, dst); )*
            }
        }

        impl crate::utils::byteorder::FixedWidth for #name {
            const WIDTH: usize = 0 #( + <#types as crate::utils::byteorder::FixedWidth>::WIDTH )*;
        }
    };

    TokenStream::from(expanded)
}
