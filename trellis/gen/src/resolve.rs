//! Binding resolution: what each abstract accessor means.
//!
//! Every abstract accessor resolves to exactly one [`Binding`]. Accessors
//! that cannot be implemented resolve to [`Binding::Unsupported`] with a
//! [`DiagnosticCode`], so the adapter still gets a (panicking) method.
//!
//! ## Recognised getter return types
//!
//! | Return type                           | Binding                          |
//! |---------------------------------------|----------------------------------|
//! | `Box<dyn S>`                          | single relationship              |
//! | `Option<Box<dyn S>>`                  | optional single relationship     |
//! | `Vec<Box<dyn S>>`                     | collection, sequence             |
//! | `HashSet<Box<dyn S>>`                 | collection, set                  |
//! | `Box<[Box<dyn S>]>`                   | collection, unordered            |
//! | `Box<dyn Iterator<Item = Box<dyn S>>>`| collection, lazy                 |
//! | `Option<T>`                           | nullable property                |
//! | `bool`, `char`, integers, floats      | property with a zero default     |
//! | `String`                              | property defaulted to `""`       |
//! | anything else                         | unsupported (003)                |

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::{FnArg, GenericArgument, PathArguments, ReturnType, Type, TypeParamBound};

use crate::classify::{AccessorKind, classify};
use crate::diagnostics::DiagnosticCode;
use crate::inflection::infer_edge_label;
use crate::model::{
    AccessorDeclaration, Catalog, Direction, EntityKind, LinkMarker, SchemaType, render_tokens,
};

/// The resolved semantics of one abstract accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Property(PropertyBinding),
    Relationship(RelationshipBinding),
    Adder(AdderBinding),
    Unsupported { code: DiagnosticCode, reason: String },
}

impl Binding {
    fn unsupported(code: DiagnosticCode, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            code,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Primitive property types, which default to zero when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl Primitive {
    pub fn from_type(ty: &Type) -> Option<Self> {
        let Type::Path(path) = ty else {
            return None;
        };
        if path.qself.is_some() {
            return None;
        }
        let ident = path.path.get_ident()?;
        Some(match ident.to_string().as_str() {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            _ => return None,
        })
    }
}

/// How an absent property is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `Option<T>`: absent reads as `None`; writing `None` removes.
    Nullable,
    /// A primitive with a zero default.
    Primitive(Primitive),
    /// `String` (or a borrowed string in a setter), defaulted with
    /// `Default::default()`.
    Defaulted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBinding {
    pub access: Access,
    pub key: String,
    pub hidden: bool,
    /// The stored value type (`T` for `Option<T>`).
    pub value_ty: Type,
    pub kind: ValueKind,
}

/// The schema type at the other end of a relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub kind: EntityKind,
    /// The declared `Box<dyn S>` type.
    pub object_ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    /// `Vec<T>`
    Sequence,
    /// `HashSet<T>`
    Set,
    /// `Box<[T]>`
    Unordered,
    /// `Box<dyn Iterator<Item = T>>`
    Lazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single { optional: bool },
    Collection(CollectionShape),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipBinding {
    pub direction: Direction,
    /// Edge label; `None` for single-valued getters, which take any edge.
    pub label: Option<String>,
    /// The plural derived name the label was singularised from.
    pub inferred_from: Option<String>,
    pub target: Target,
    pub cardinality: Cardinality,
}

/// How an adder receives the other vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passing {
    /// `&dyn S`
    Reference,
    /// `Box<dyn S>`
    Boxed,
    /// `&Box<dyn S>`
    BoxedReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdderBinding {
    pub label: String,
    pub target: Target,
    pub passing: Passing,
}

/// Resolves one abstract accessor of the adapter being generated for `schema`.
pub fn resolve(catalog: &Catalog, schema: &SchemaType, decl: &AccessorDeclaration) -> Binding {
    match classify(decl) {
        AccessorKind::Getter { name } => resolve_getter(catalog, schema, decl, name),
        AccessorKind::Setter { name } => resolve_setter(catalog, decl, name),
        AccessorKind::Adder { name } => resolve_adder(catalog, schema, decl, name),
        AccessorKind::Unsupported { reason } => {
            Binding::unsupported(DiagnosticCode::UnsupportedShape, reason)
        }
    }
}

fn resolve_getter(
    catalog: &Catalog,
    schema: &SchemaType,
    decl: &AccessorDeclaration,
    name: String,
) -> Binding {
    let ReturnType::Type(_, ty) = &decl.sig.output else {
        return Binding::unsupported(DiagnosticCode::UnsupportedShape, "getters must return a value");
    };
    let ty = ty.as_ref();

    if let Some(target) = schema_object(catalog, ty) {
        return single(decl, target, ty, false);
    }
    if let Some(inner) = single_type_arg("Option", ty) {
        if let Some(target) = schema_object(catalog, inner) {
            return single(decl, target, inner, true);
        }
        if mentions_schema(catalog, inner.to_token_stream()) {
            return Binding::unsupported(
                DiagnosticCode::UnsupportedShape,
                "`Option` can only wrap a single `Box<dyn Schema>`",
            );
        }
    }

    match container(ty) {
        Some(Container::Recognised { shape, elements }) => {
            let [element] = elements.as_slice() else {
                return Binding::unsupported(
                    DiagnosticCode::TypeArgumentCount,
                    format!(
                        "collection relationships take exactly one type argument, found {}",
                        elements.len()
                    ),
                );
            };
            let Some(target) = schema_object(catalog, element) else {
                return Binding::unsupported(
                    DiagnosticCode::UnrecognizedElement,
                    "collection elements must be `Box<dyn Schema>` for a vertex or edge schema",
                );
            };
            collection(schema, decl, name, target, element, shape)
        }
        Some(Container::Unrecognised(container)) => Binding::unsupported(
            DiagnosticCode::UnrecognizedContainer,
            format!("`{container}` is not a supported relationship container"),
        ),
        None if mentions_schema(catalog, ty.to_token_stream()) => {
            if is_generic(ty) {
                Binding::unsupported(
                    DiagnosticCode::UnrecognizedContainer,
                    "schema objects can only be returned in `Vec`, `HashSet`, `Box<[_]>` or a boxed iterator",
                )
            } else {
                Binding::unsupported(
                    DiagnosticCode::UnsupportedShape,
                    "relationship getters must return `Box<dyn Schema>` or a supported collection",
                )
            }
        }
        None => property(decl, name, ty, Access::Read),
    }
}

fn single(decl: &AccessorDeclaration, target: &SchemaType, object_ty: &Type, optional: bool) -> Binding {
    if target.kind == EntityKind::Edge {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedShape,
            "single-valued edge relationships are not supported",
        );
    }
    let markers = &decl.markers;
    let inbound = markers.inbound
        || markers
            .linked_vertex
            .as_ref()
            .is_some_and(|link| link.direction == Some(Direction::In));

    Binding::Relationship(RelationshipBinding {
        direction: if inbound { Direction::In } else { Direction::Out },
        label: None,
        inferred_from: None,
        target: target_of(target, object_ty),
        cardinality: Cardinality::Single { optional },
    })
}

fn collection(
    schema: &SchemaType,
    decl: &AccessorDeclaration,
    name: String,
    target: &SchemaType,
    object_ty: &Type,
    shape: CollectionShape,
) -> Binding {
    if schema.kind == EntityKind::Edge {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedShape,
            "collection relationships are only supported on vertex schemas",
        );
    }

    let markers = &decl.markers;
    let (link, stray) = match target.kind {
        EntityKind::Vertex => (&markers.linked_vertex, markers.linked_edge.is_some()),
        EntityKind::Edge => (&markers.linked_edge, markers.linked_vertex.is_some()),
    };
    if stray {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedShape,
            format!(
                "relationship marker does not match the {} target `{}`",
                target.kind, target.name
            ),
        );
    }

    let LinkMarker { label, direction } = link.clone().unwrap_or_default();
    let (label, inferred_from) = match (label, target.kind) {
        (Some(label), _) => (label, None),
        (None, EntityKind::Edge) => (target.label.clone(), None),
        (None, EntityKind::Vertex) => {
            let (label, changed) = infer_edge_label(&name);
            (label, changed.then_some(name))
        }
    };

    Binding::Relationship(RelationshipBinding {
        direction: direction.unwrap_or_default(),
        label: Some(label),
        inferred_from,
        target: target_of(target, object_ty),
        cardinality: Cardinality::Collection(shape),
    })
}

fn resolve_setter(catalog: &Catalog, decl: &AccessorDeclaration, name: String) -> Binding {
    let Some(ty) = first_param_type(decl) else {
        return Binding::unsupported(DiagnosticCode::UnsupportedShape, "setters take one parameter");
    };
    if mentions_schema(catalog, ty.to_token_stream()) {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedShape,
            "setters cannot take schema objects, use an `add_` method",
        );
    }
    property(decl, name, ty, Access::Write)
}

fn property(decl: &AccessorDeclaration, name: String, ty: &Type, access: Access) -> Binding {
    let (value_ty, kind) = match single_type_arg("Option", ty) {
        Some(inner) => (inner.clone(), ValueKind::Nullable),
        None => match Primitive::from_type(ty) {
            Some(primitive) => (ty.clone(), ValueKind::Primitive(primitive)),
            None => (ty.clone(), ValueKind::Defaulted),
        },
    };
    if !is_storable(&value_ty, access) {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedShape,
            format!(
                "`{}` is not a storable property type; use a primitive or `String`",
                render_tokens(value_ty.to_token_stream())
            ),
        );
    }
    Binding::Property(PropertyBinding {
        access,
        key: name,
        hidden: decl.markers.hidden,
        value_ty,
        kind,
    })
}

fn resolve_adder(
    catalog: &Catalog,
    schema: &SchemaType,
    decl: &AccessorDeclaration,
    name: String,
) -> Binding {
    if schema.kind == EntityKind::Edge {
        return Binding::unsupported(
            DiagnosticCode::UnsupportedAdder,
            "adders are only supported on vertex schemas",
        );
    }
    let Some(ty) = first_param_type(decl) else {
        return Binding::unsupported(DiagnosticCode::UnsupportedAdder, "adders take one parameter");
    };

    let resolved = match ty {
        Type::Reference(reference) if reference.mutability.is_none() => {
            match dyn_schema(catalog, &reference.elem) {
                Some(target) => Some((target, Passing::Reference, ty.clone())),
                None => schema_object(catalog, &reference.elem)
                    .map(|target| (target, Passing::BoxedReference, (*reference.elem).clone())),
            }
        }
        _ => schema_object(catalog, ty).map(|target| (target, Passing::Boxed, ty.clone())),
    };

    match resolved {
        Some((target, passing, object_ty)) if target.kind == EntityKind::Vertex => {
            Binding::Adder(AdderBinding {
                label: name,
                target: target_of(target, &object_ty),
                passing,
            })
        }
        Some((target, ..)) => Binding::unsupported(
            DiagnosticCode::UnsupportedAdder,
            format!("adders link vertices, but `{}` is an edge schema", target.name),
        ),
        None => Binding::unsupported(
            DiagnosticCode::UnsupportedAdder,
            "adders take `&dyn Schema`, `Box<dyn Schema>` or `&Box<dyn Schema>` for a vertex schema",
        ),
    }
}

/// Whether the graph's value set can hold `ty`. Setters may also borrow a
/// string as `&str` or `&String`.
fn is_storable(ty: &Type, access: Access) -> bool {
    if Primitive::from_type(ty).is_some() || is_plain("String", ty) {
        return true;
    }
    match (ty, access) {
        (Type::Reference(reference), Access::Write) if reference.mutability.is_none() => {
            is_plain("str", &reference.elem) || is_plain("String", &reference.elem)
        }
        _ => false,
    }
}

fn is_plain(name: &str, ty: &Type) -> bool {
    match ty {
        Type::Path(path) => {
            path.qself.is_none()
                && path.path.segments.last().is_some_and(|segment| {
                    segment.ident == name && segment.arguments.is_none()
                })
        }
        _ => false,
    }
}

fn target_of(target: &SchemaType, object_ty: &Type) -> Target {
    Target {
        name: target.name.clone(),
        kind: target.kind,
        object_ty: object_ty.clone(),
    }
}

fn first_param_type(decl: &AccessorDeclaration) -> Option<&Type> {
    decl.sig.inputs.iter().find_map(|arg| match arg {
        FnArg::Typed(pat) => Some(pat.ty.as_ref()),
        FnArg::Receiver(_) => None,
    })
}

/// Last path segment and its type arguments, for plain path types.
fn path_args(ty: &Type) -> Option<(String, Vec<&GenericArgument>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let args = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().collect(),
        _ => Vec::new(),
    };
    Some((segment.ident.to_string(), args))
}

fn single_type_arg<'a>(name: &str, ty: &'a Type) -> Option<&'a Type> {
    let (ident, args) = path_args(ty)?;
    match (ident == name, args.as_slice()) {
        (true, [GenericArgument::Type(inner)]) => Some(inner),
        _ => None,
    }
}

fn is_generic(ty: &Type) -> bool {
    path_args(ty).is_some_and(|(_, args)| !args.is_empty())
}

/// `dyn S` where `S` is a schema of the batch.
fn dyn_schema<'a>(catalog: &'a Catalog, ty: &Type) -> Option<&'a SchemaType> {
    let Type::TraitObject(object) = ty else {
        return None;
    };
    let mut traits = object.bounds.iter().filter_map(|bound| match bound {
        TypeParamBound::Trait(bound) => Some(bound),
        _ => None,
    });
    let first = traits.next()?;
    if traits.next().is_some() {
        return None;
    }
    catalog.get(&first.path.segments.last()?.ident.to_string())
}

/// `Box<dyn S>` where `S` is a schema of the batch.
fn schema_object<'a>(catalog: &'a Catalog, ty: &Type) -> Option<&'a SchemaType> {
    dyn_schema(catalog, single_type_arg("Box", ty)?)
}

fn mentions_schema(catalog: &Catalog, tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => catalog.contains(&ident.to_string()),
        TokenTree::Group(group) => mentions_schema(catalog, group.stream()),
        _ => false,
    })
}

enum Container<'a> {
    Recognised {
        shape: CollectionShape,
        elements: Vec<&'a Type>,
    },
    Unrecognised(String),
}

const UNSUPPORTED_CONTAINERS: [&str; 6] = [
    "VecDeque",
    "LinkedList",
    "BTreeSet",
    "BinaryHeap",
    "HashMap",
    "BTreeMap",
];

fn type_args<'a>(args: &[&'a GenericArgument]) -> Vec<&'a Type> {
    args.iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
        .collect()
}

fn container(ty: &Type) -> Option<Container<'_>> {
    let (ident, args) = path_args(ty)?;
    match ident.as_str() {
        "Vec" => Some(Container::Recognised {
            shape: CollectionShape::Sequence,
            elements: type_args(&args),
        }),
        "HashSet" => Some(Container::Recognised {
            shape: CollectionShape::Set,
            elements: type_args(&args),
        }),
        "Box" => boxed_container(&args),
        name if UNSUPPORTED_CONTAINERS.contains(&name) => Some(Container::Unrecognised(ident)),
        _ => None,
    }
}

fn boxed_container<'a>(args: &[&'a GenericArgument]) -> Option<Container<'a>> {
    let [GenericArgument::Type(inner)] = args else {
        return None;
    };
    match inner {
        Type::Slice(slice) => Some(Container::Recognised {
            shape: CollectionShape::Unordered,
            elements: vec![slice.elem.as_ref()],
        }),
        Type::TraitObject(object) => {
            let bound = object.bounds.iter().find_map(|bound| match bound {
                TypeParamBound::Trait(bound) => Some(bound),
                _ => None,
            })?;
            let segment = bound.path.segments.last()?;
            if segment.ident != "Iterator" {
                return None;
            }
            let elements = match &segment.arguments {
                PathArguments::AngleBracketed(args) => args
                    .args
                    .iter()
                    .map(|arg| match arg {
                        GenericArgument::AssocType(assoc) if assoc.ident == "Item" => Some(&assoc.ty),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
            Some(Container::Recognised {
                shape: CollectionShape::Lazy,
                elements,
            })
        }
        _ => None,
    }
}
