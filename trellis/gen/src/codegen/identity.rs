//! Identity impls for generated adapters.
//!
//! Two adapters are equal when they wrap the same graph element, whatever
//! their schema type. Equality is only defined between adapters of the same
//! entity kind: a vertex adapter compares against any `FramedVertex`, an
//! edge adapter against any `FramedEdge`.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use super::Codegen;
use crate::model::{EntityKind, SchemaType};

/// Generates `PartialEq`, `Eq`, `Hash`, `Display` and `Debug` for the
/// adapter, plus `PartialEq`, `Eq` and `Hash` for `dyn Schema`.
///
/// ## Examples
///
/// ```ignore
/// impl<T: ::trellis::FramedVertex + ?Sized> PartialEq<T> for PersonImpl {
///     fn eq(&self, other: &T) -> bool {
///         self.vertex == *other.vertex()
///     }
/// }
///
/// impl ::std::fmt::Display for PersonImpl {
///     fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
///         ::std::write!(f, "{}[{}]", self.vertex.label(), self.vertex.id())
///     }
/// }
/// ```
pub fn generate_identity(cg: Codegen<'_>, schema: &SchemaType, adapter: &Ident) -> TokenStream {
    let runtime = cg.runtime;
    let trait_name = format_ident!("{}", schema.name);
    let field = format_ident!("{}", schema.kind.field_name());
    let framed = match schema.kind {
        EntityKind::Vertex => quote!(#runtime::FramedVertex),
        EntityKind::Edge => quote!(#runtime::FramedEdge),
    };
    let adapter_name = adapter.to_string();
    let field_name = schema.kind.field_name();

    quote! {
        impl<T: #framed + ?Sized> PartialEq<T> for #adapter {
            fn eq(&self, other: &T) -> bool {
                self.#field == *other.#field()
            }
        }

        impl Eq for #adapter {}

        impl ::std::hash::Hash for #adapter {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(&self.#field, state);
            }
        }

        impl ::std::fmt::Display for #adapter {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}[{}]", self.#field.label(), self.#field.id())
            }
        }

        impl ::std::fmt::Debug for #adapter {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(#adapter_name)
                    .field(#field_name, &self.#field)
                    .finish()
            }
        }

        impl PartialEq for dyn #trait_name {
            fn eq(&self, other: &Self) -> bool {
                #framed::#field(self) == #framed::#field(other)
            }
        }

        impl Eq for dyn #trait_name {}

        impl ::std::hash::Hash for dyn #trait_name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(#framed::#field(self), state);
            }
        }
    }
}
