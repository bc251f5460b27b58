//! Accessor classification by syntactic shape.
//!
//! Only the method name prefix, receiver, parameter count, generics and
//! return type are considered here; what the types mean is decided by
//! [`crate::resolve`].

use syn::{FnArg, ReturnType, Signature, Type};

use crate::model::AccessorDeclaration;
use crate::naming::derived_name;

/// The shape of one abstract accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    /// `get_x(&self) -> T`
    Getter { name: String },
    /// `set_x(&self, value: T)`
    Setter { name: String },
    /// `add_x(&self, value: T)`
    Adder { name: String },
    /// Anything else, with the reason it was rejected.
    Unsupported { reason: String },
}

pub fn classify(decl: &AccessorDeclaration) -> AccessorKind {
    let sig = &decl.sig;
    let method = sig.ident.to_string();

    if let Some(reason) = general_shape_problem(sig) {
        return AccessorKind::Unsupported { reason };
    }

    let params = parameter_count(sig);

    if let Some(name) = derived_name(&method, "get_") {
        return match (params, &sig.output) {
            (0, ReturnType::Type(_, ty)) if !is_unit(ty) => AccessorKind::Getter { name },
            (0, _) => AccessorKind::Unsupported {
                reason: "getters must return a value".to_string(),
            },
            _ => AccessorKind::Unsupported {
                reason: "keyed getters with parameters are not supported".to_string(),
            },
        };
    }

    for (prefix, setter) in [("set_", true), ("add_", false)] {
        if let Some(name) = derived_name(&method, prefix) {
            if params != 1 {
                return AccessorKind::Unsupported {
                    reason: format!("`{prefix}` methods take exactly one parameter"),
                };
            }
            if !returns_unit(&sig.output) {
                return AccessorKind::Unsupported {
                    reason: format!("`{prefix}` methods must not return a value"),
                };
            }
            return if setter {
                AccessorKind::Setter { name }
            } else {
                AccessorKind::Adder { name }
            };
        }
    }

    AccessorKind::Unsupported {
        reason: "method name does not start with `get_`, `set_` or `add_`".to_string(),
    }
}

fn general_shape_problem(sig: &Signature) -> Option<String> {
    if sig.receiver().is_none() {
        return Some("accessors must take `&self`".to_string());
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Some("generic accessors are not supported".to_string());
    }
    if sig.asyncness.is_some() {
        return Some("async accessors are not supported".to_string());
    }
    if sig.unsafety.is_some() || sig.variadic.is_some() {
        return Some("unsafe or variadic accessors are not supported".to_string());
    }
    None
}

fn parameter_count(sig: &Signature) -> usize {
    sig.inputs
        .iter()
        .filter(|arg| matches!(arg, FnArg::Typed(_)))
        .count()
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn returns_unit(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => true,
        ReturnType::Type(_, ty) => is_unit(ty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::declaration;
    use quote::quote;

    fn kind_of(tokens: proc_macro2::TokenStream) -> AccessorKind {
        classify(&declaration("Person", tokens))
    }

    #[test]
    fn getters() {
        assert_eq!(
            kind_of(quote!(fn get_name(&self) -> Option<String>;)),
            AccessorKind::Getter { name: "name".to_string() }
        );
        assert_eq!(
            kind_of(quote!(fn get_friends(&self) -> Vec<Box<dyn Person>>;)),
            AccessorKind::Getter { name: "friends".to_string() }
        );
    }

    #[test]
    fn setters_and_adders() {
        assert_eq!(
            kind_of(quote!(fn set_age(&self, age: i32);)),
            AccessorKind::Setter { name: "age".to_string() }
        );
        assert_eq!(
            kind_of(quote!(fn set_age(&self, age: i32) -> ();)),
            AccessorKind::Setter { name: "age".to_string() }
        );
        assert_eq!(
            kind_of(quote!(fn add_friend(&self, friend: &dyn Person);)),
            AccessorKind::Adder { name: "friend".to_string() }
        );
    }

    #[test]
    fn keyed_getter_is_unsupported() {
        let kind = kind_of(quote!(fn get_knows(&self, person: &dyn Person) -> bool;));
        assert!(matches!(kind, AccessorKind::Unsupported { reason } if reason.contains("keyed")));
    }

    #[test]
    fn unit_getter_is_unsupported() {
        assert!(matches!(
            kind_of(quote!(fn get_nothing(&self);)),
            AccessorKind::Unsupported { .. }
        ));
    }

    #[test]
    fn bare_prefix_is_unsupported() {
        assert!(matches!(
            kind_of(quote!(fn get_(&self) -> i32;)),
            AccessorKind::Unsupported { .. }
        ));
    }

    #[test]
    fn shape_problems() {
        for tokens in [
            quote!(fn get_name() -> String;),
            quote!(fn get_value<T>(&self) -> T;),
            quote!(async fn get_name(&self) -> String;),
            quote!(fn set_pair(&self, a: i32, b: i32);),
            quote!(fn set_age(&self, age: i32) -> bool;),
            quote!(fn remove_friend(&self, friend: &dyn Person);),
        ] {
            assert!(
                matches!(kind_of(tokens.clone()), AccessorKind::Unsupported { .. }),
                "expected unsupported: {tokens}"
            );
        }
    }
}
