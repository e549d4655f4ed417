use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod reflect_attributes;
mod reflect_generator;

/// Derive macro for the engine's `Reflect` and `TypeInfo` traits
///
/// Every named field becomes an attribute whose value kind follows the field
/// type. Struct options: `name`, `category`, `drawable = "method"`. Field
/// options: `rename`, `skip`, `readonly`. The type must implement `Clone`
/// and `Debug`.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match reflect_generator::generate_reflect_impl(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
