//! Derive macro for `tagtable::Tagged`.
//!
//! `#[derive(Tagged)]` maps every variant of an enum onto the variant of the same
//! name in a field-less tag enum. By default the tag enum is `<Name>Discriminants`,
//! which is what `strum::EnumDiscriminants` generates; use
//! `#[tagged(tag = path::ToTag)]` to name another one.
//!
//! The expansion refuses to compile unless both enums declare exactly the same
//! variant names.
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Path, parse_macro_input};

struct TaggedInput {
    tag: Path,
    variants: Vec<syn::Ident>,
}

impl TaggedInput {
    fn from_derive(input: &DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "`Tagged` can only be derived for enums",
            ));
        };

        if data.variants.is_empty() {
            return Err(syn::Error::new(
                input.ident.span(),
                "`Tagged` requires at least one variant",
            ));
        }

        let mut tag = None;
        for attr in input.attrs.iter().filter(|a| a.path().is_ident("tagged")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("tag") {
                    tag = Some(meta.value()?.parse::<Path>()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported `tagged` option, expected `tag = ...`"))
                }
            })?;
        }

        let tag = match tag {
            Some(tag) => tag,
            None => format_ident!("{}Discriminants", input.ident).into(),
        };

        Ok(TaggedInput {
            tag,
            variants: data.variants.iter().map(|v| v.ident.clone()).collect(),
        })
    }
}

#[proc_macro_derive(Tagged, attributes(tagged))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let TaggedInput { tag, variants } = TaggedInput::from_derive(input)?;
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let check_fn = format_ident!("__tagtable_{}_tag_is_covered", ident);

    // `Variant { .. }` matches unit, tuple and struct variants alike
    let expanded = quote! {
        impl #impl_generics ::tagtable::Tagged for #ident #ty_generics #where_clause {
            type Tag = #tag;

            fn discriminant(&self) -> &str {
                match self {
                    #( Self::#variants { .. } => ::tagtable::Tag::name(#tag::#variants), )*
                }
            }

            fn tag(&self) -> ::core::option::Option<#tag> {
                ::core::option::Option::Some(match self {
                    #( Self::#variants { .. } => #tag::#variants, )*
                })
            }
        }

        // Fails to compile if the tag enum declares a variant the value enum lacks.
        const _: () = {
            #[allow(non_snake_case, dead_code)]
            fn #check_fn(tag: #tag) {
                match tag {
                    #( #tag::#variants => {} )*
                }
            }
        };
    };

    Ok(expanded)
}
