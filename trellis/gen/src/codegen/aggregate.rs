//! The aggregate file of a batch.
//!
//! The aggregate is the one file a schema crate includes. It pulls in every
//! adapter file of the batch and registers each adapter's factory, keyed by
//! the schema trait object type.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::Codegen;
use super::adapter::GeneratedAdapter;
use crate::model::EntityKind;

/// Generates the aggregate for the adapters that were written successfully.
///
/// ## Examples
///
/// ```ignore
/// include!("person_impl.rs");
/// include!("knows_impl.rs");
///
/// pub fn register_adapters(registry: &mut ::trellis::Registry) {
///     registry.register_vertex::<dyn Person>("Person", PersonImpl::LABEL, PersonImpl::boxed);
///     registry.register_edge::<dyn Knows>("Knows", KnowsImpl::LABEL, KnowsImpl::boxed);
/// }
///
/// pub fn adapter_registry() -> ::trellis::Registry { .. }
/// ```
pub fn generate_aggregate(cg: Codegen<'_>, adapters: &[&GeneratedAdapter]) -> TokenStream {
    let runtime = cg.runtime;

    let includes = adapters.iter().map(|adapter| {
        let file_name = &adapter.file_name;
        quote!(include!(#file_name);)
    });

    let registry = if adapters.is_empty() {
        format_ident!("_registry")
    } else {
        format_ident!("registry")
    };
    let registrations = adapters.iter().map(|adapter| {
        let schema = &adapter.schema;
        let trait_name = format_ident!("{}", adapter.schema);
        let adapter_ident = format_ident!("{}", adapter.adapter);
        let register = match adapter.kind {
            EntityKind::Vertex => format_ident!("register_vertex"),
            EntityKind::Edge => format_ident!("register_edge"),
        };
        quote! {
            #registry.#register::<dyn #trait_name>(#schema, #adapter_ident::LABEL, #adapter_ident::boxed);
        }
    });

    quote! {
        #(#includes)*

        /// Registers every generated adapter with `registry`.
        pub fn register_adapters(#registry: &mut #runtime::Registry) {
            #(#registrations)*
        }

        /// Creates a registry holding every generated adapter.
        pub fn adapter_registry() -> #runtime::Registry {
            let mut registry = #runtime::Registry::new();
            register_adapters(&mut registry);
            registry
        }
    }
}
