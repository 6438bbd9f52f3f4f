//! Compile-time dependency injection derives for distbom.
//!
//! - `#[derive(Context)]` on the root struct emits one `FromRef<Root>` impl
//!   per field type, cloning that field out of the root.
//! - `#[derive(FromContext)]` on a service emits `FromRef<Context>` by
//!   extracting every field from the context.
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! re-export the trait at its root.
//!
//! ```ignore
//! #[derive(Context, Clone)]
//! pub struct Context {
//!     pub catalog: AppCatalog,
//!     pub config: Arc<Config>,
//! }
//!
//! #[derive(FromContext, Clone)]
//! pub struct PointService {
//!     catalog: AppCatalog,
//!     config: Arc<Config>,
//! }
//! ```
//!
//! `FromContext` output names the root as `Context`, so that type must be in
//! scope where the derive is used.

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

/// Derive `FromRef<Self>` for the type of every named field.
///
/// Field types must be `Clone` and pairwise distinct.
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let fields = match named_fields(&input, "Context") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let impls = fields.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;

        quote! {
            impl #impl_generics crate::FromRef<#name #ty_generics> for #field_type #where_clause {
                fn from_ref(ctx: &#name #ty_generics) -> Self {
                    ctx.#field_name.clone()
                }
            }
        }
    });

    TokenStream::from(quote! { #(#impls)* })
}

/// Derive `FromRef<Context>` by resolving each field from the context.
#[proc_macro_derive(FromContext)]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let fields = match named_fields(&input, "FromContext") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_inits = fields.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;

        quote! {
            #field_name: <#field_type as crate::FromRef<Context>>::from_ref(ctx)
        }
    });

    TokenStream::from(quote! {
        impl #impl_generics crate::FromRef<Context> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &Context) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{} can only be derived for structs with named fields", derive),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{} can only be derived for structs", derive),
        )),
    }
}
