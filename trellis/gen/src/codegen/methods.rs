//! Method generation for resolved accessor bindings.
//!
//! Every abstract accessor becomes exactly one method. The emitted
//! signature is the declared one; parameter patterns are normalised to a
//! plain identifier (or `_` for stubs) so the body can refer to them.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, Pat, PatIdent, PatWild, Signature};

use super::Codegen;
use crate::model::{AccessorDeclaration, Direction, EntityKind};
use crate::naming::adapter_name;
use crate::resolve::{
    Access, AdderBinding, Binding, Cardinality, CollectionShape, Passing, Primitive,
    PropertyBinding, RelationshipBinding, ValueKind,
};

/// Generates the method implementing `decl` in an adapter of `kind`.
///
/// ## Examples
///
/// For `fn get_age(&self) -> i32;` on a vertex schema:
/// ```ignore
/// fn get_age(&self) -> i32 {
///     self.vertex.property::<i32>("age").unwrap_or(0i32)
/// }
/// ```
pub fn generate_method(
    cg: Codegen<'_>,
    kind: EntityKind,
    decl: &AccessorDeclaration,
    binding: &Binding,
) -> TokenStream {
    let stub = matches!(binding, Binding::Unsupported { .. });
    let (sig, param) = normalise_signature(&decl.sig, stub);
    let field = format_ident!("{}", kind.field_name());

    let body = match binding {
        Binding::Property(property) => property_body(cg, &field, property, param.as_ref()),
        Binding::Relationship(relationship) => relationship_body(cg, &field, decl, relationship),
        Binding::Adder(adder) => adder_body(cg, &field, adder, param.as_ref()),
        Binding::Unsupported { code, .. } => {
            let message = format!("{}: not yet supported: {}", code, decl.descriptor());
            quote!(::std::unimplemented!("{}", #message))
        }
    };

    quote! {
        #sig {
            #body
        }
    }
}

/// Rewrites parameter patterns and returns the first parameter's name.
fn normalise_signature(sig: &Signature, stub: bool) -> (Signature, Option<Ident>) {
    let mut sig = sig.clone();
    let mut first = None;

    for arg in sig.inputs.iter_mut() {
        let FnArg::Typed(typed) = arg else {
            continue;
        };
        if stub {
            *typed.pat = Pat::Wild(PatWild {
                attrs: Vec::new(),
                underscore_token: Default::default(),
            });
            continue;
        }
        let ident = match typed.pat.as_ref() {
            Pat::Ident(PatIdent {
                ident,
                by_ref: None,
                subpat: None,
                ..
            }) => ident.clone(),
            _ => {
                let ident = format_ident!("value");
                *typed.pat = Pat::Ident(PatIdent {
                    attrs: Vec::new(),
                    by_ref: None,
                    mutability: None,
                    ident: ident.clone(),
                    subpat: None,
                });
                ident
            }
        };
        first.get_or_insert(ident);
    }

    (sig, first)
}

fn property_key(cg: Codegen<'_>, property: &PropertyBinding) -> TokenStream {
    let key = &property.key;
    let runtime = cg.runtime;
    if property.hidden {
        quote!(&#runtime::hide(#key))
    } else {
        quote!(#key)
    }
}

fn default_literal(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Bool => quote!(false),
        Primitive::Char => quote!('\0'),
        Primitive::I8 => quote!(0i8),
        Primitive::I16 => quote!(0i16),
        Primitive::I32 => quote!(0i32),
        Primitive::I64 => quote!(0i64),
        Primitive::U8 => quote!(0u8),
        Primitive::U16 => quote!(0u16),
        Primitive::U32 => quote!(0u32),
        Primitive::U64 => quote!(0u64),
        Primitive::F32 => quote!(0.0f32),
        Primitive::F64 => quote!(0.0f64),
    }
}

fn property_body(
    cg: Codegen<'_>,
    field: &Ident,
    property: &PropertyBinding,
    param: Option<&Ident>,
) -> TokenStream {
    let key = property_key(cg, property);

    match (property.access, param) {
        (Access::Read, _) => {
            let value_ty = &property.value_ty;
            let read = quote!(self.#field.property::<#value_ty>(#key));
            match property.kind {
                ValueKind::Nullable => read,
                ValueKind::Primitive(primitive) => {
                    let default = default_literal(primitive);
                    quote!(#read.unwrap_or(#default))
                }
                ValueKind::Defaulted => quote!(#read.unwrap_or_default()),
            }
        }
        (Access::Write, Some(param)) if property.kind == ValueKind::Nullable => quote! {
            match #param {
                Some(value) => self.#field.set_property(#key, value),
                None => {
                    self.#field.remove_property(#key);
                }
            }
        },
        (Access::Write, Some(param)) => quote! {
            self.#field.set_property(#key, #param);
        },
        // Setters always have a parameter once classified.
        (Access::Write, None) => TokenStream::new(),
    }
}

fn direction_tokens(cg: Codegen<'_>, direction: Direction) -> TokenStream {
    let runtime = cg.runtime;
    match direction {
        Direction::Out => quote!(#runtime::Direction::Out),
        Direction::In => quote!(#runtime::Direction::In),
    }
}

fn relationship_body(
    cg: Codegen<'_>,
    field: &Ident,
    decl: &AccessorDeclaration,
    relationship: &RelationshipBinding,
) -> TokenStream {
    let direction = direction_tokens(cg, relationship.direction);
    let adapter = format_ident!("{}", adapter_name(&relationship.target.name));
    let object_ty = &relationship.target.object_ty;

    match relationship.cardinality {
        Cardinality::Single { optional } => {
            let framed = quote! {
                self.#field
                    .adjacent_vertex(#direction)
                    .map(|vertex| Box::new(#adapter::new(vertex, self.graph.clone())) as #object_ty)
            };
            if optional {
                framed
            } else {
                let method = format!("{}::{}", decl.owner, decl.sig.ident);
                quote! {
                    match #framed {
                        Some(framed) => framed,
                        None => ::std::panic!(
                            "{}: {} has no adjacent vertex in direction {}",
                            #method,
                            self,
                            #direction
                        ),
                    }
                }
            }
        }
        Cardinality::Collection(shape) => {
            let label = relationship.label.as_deref().unwrap_or_default();
            let step = match relationship.target.kind {
                EntityKind::Vertex => quote!(vertices),
                EntityKind::Edge => quote!(edges),
            };
            let elements = quote!(self.#field.#step(#direction, #label).into_iter());
            match shape {
                CollectionShape::Lazy => quote! {
                    let graph = self.graph.clone();
                    Box::new(#elements.map(move |element| {
                        Box::new(#adapter::new(element, graph.clone())) as #object_ty
                    }))
                },
                CollectionShape::Sequence | CollectionShape::Set | CollectionShape::Unordered => {
                    quote! {
                        #elements
                            .map(|element| Box::new(#adapter::new(element, self.graph.clone())) as #object_ty)
                            .collect()
                    }
                }
            }
        }
    }
}

fn adder_body(
    cg: Codegen<'_>,
    field: &Ident,
    adder: &AdderBinding,
    param: Option<&Ident>,
) -> TokenStream {
    let Some(param) = param else {
        return TokenStream::new();
    };
    let runtime = cg.runtime;
    let label = &adder.label;
    let other = match adder.passing {
        Passing::Reference => quote!(#param),
        Passing::Boxed => quote!(&*#param),
        Passing::BoxedReference => quote!(&**#param),
    };
    quote! {
        self.#field.add_edge(#label, #runtime::FramedVertex::vertex(#other));
    }
}
