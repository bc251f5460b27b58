//! Adapter type generation.
//!
//! For a schema trait `Person` the adapter is `PersonImpl`: a struct holding
//! the framed graph and the wrapped element, the framing trait impls, one
//! impl block per trait of the schema chain, and the identity impls.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::debug;

use super::Codegen;
use super::identity::generate_identity;
use super::methods::generate_method;
use crate::diagnostics::Diagnostics;
use crate::errors::GeneratorError;
use crate::model::{EntityKind, SchemaType};
use crate::naming::{adapter_file_name, adapter_name};
use crate::resolve::{Binding, resolve};

/// The generated adapter for one schema type, not yet formatted.
#[derive(Debug, Clone)]
pub struct GeneratedAdapter {
    pub schema: String,
    /// `<Schema>Impl`
    pub adapter: String,
    /// `<schema>_impl.rs`
    pub file_name: String,
    pub kind: EntityKind,
    pub tokens: TokenStream,
    /// Number of accessor methods emitted, one per abstract accessor.
    pub method_count: usize,
}

/// Generates the adapter for `schema`.
///
/// Unsupported accessors are recorded in `diagnostics` and emitted as
/// panicking stubs, so the adapter always implements every trait of the
/// chain.
///
/// ## Errors
///
/// Returns the first extraction issue of the schema or one of its
/// ancestors, such as a malformed marker.
///
/// ## Examples
///
/// For `#[vertex] pub trait Person: FramedVertex { .. }`:
/// ```ignore
/// /// Graph-backed implementation of [`Person`].
/// pub struct PersonImpl {
///     graph: ::trellis::FramedGraph,
///     vertex: ::trellis::Vertex,
/// }
///
/// impl PersonImpl {
///     pub const LABEL: &'static str = "person";
///     pub fn new(vertex: ::trellis::Vertex, graph: ::trellis::FramedGraph) -> Self { .. }
///     pub fn boxed(vertex: ::trellis::Vertex, graph: ::trellis::FramedGraph) -> Box<dyn Person> { .. }
/// }
///
/// impl Person for PersonImpl { .. }
/// ```
pub fn generate_adapter(
    cg: Codegen<'_>,
    schema: &SchemaType,
    diagnostics: &mut Diagnostics,
) -> Result<GeneratedAdapter, GeneratorError> {
    let chain = cg.catalog.chain(schema);
    if let Some((owner, issue)) = chain
        .iter()
        .find_map(|member| member.issues.first().map(|issue| (member, issue)))
    {
        return Err(issue.clone().into_error(&owner.name));
    }

    let runtime = cg.runtime;
    let adapter = format_ident!("{}", adapter_name(&schema.name));
    let trait_name = format_ident!("{}", schema.name);
    let field = format_ident!("{}", schema.kind.field_name());
    let label = &schema.label;
    let (element_ty, framed_trait) = match schema.kind {
        EntityKind::Vertex => (quote!(#runtime::Vertex), quote!(#runtime::FramedVertex)),
        EntityKind::Edge => (quote!(#runtime::Edge), quote!(#runtime::FramedEdge)),
    };
    let doc = format!("Graph-backed implementation of [`{}`].", schema.name);

    let mut method_count = 0;
    let mut trait_impls = TokenStream::new();
    for member in &chain {
        let member_trait = format_ident!("{}", member.name);
        let mut methods = TokenStream::new();
        for decl in member.abstract_methods() {
            let binding = resolve(cg.catalog, schema, decl);
            let descriptor = decl.descriptor();
            debug!(schema = %schema.name, accessor = %descriptor, ?binding, "resolved accessor");

            match &binding {
                Binding::Unsupported { code, reason } => {
                    diagnostics.warn(*code, &schema.name, &descriptor, reason);
                }
                Binding::Relationship(relationship) => {
                    if let (Some(label), Some(plural)) =
                        (&relationship.label, &relationship.inferred_from)
                    {
                        diagnostics.note(
                            &schema.name,
                            &descriptor,
                            &format!("edge label `{label}` inferred from plural name `{plural}`"),
                        );
                    }
                }
                Binding::Property(_) | Binding::Adder(_) => {}
            }

            methods.extend(generate_method(cg, schema.kind, decl, &binding));
            method_count += 1;
        }
        trait_impls.extend(quote! {
            impl #member_trait for #adapter {
                #methods
            }
        });
    }

    let identity = generate_identity(cg, schema, &adapter);

    let tokens = quote! {
        #[doc = #doc]
        pub struct #adapter {
            graph: #runtime::FramedGraph,
            #field: #element_ty,
        }

        impl #adapter {
            /// Label of the elements this adapter frames.
            pub const LABEL: &'static str = #label;

            pub fn new(#field: #element_ty, graph: #runtime::FramedGraph) -> Self {
                Self { graph, #field }
            }

            /// Factory registered for the schema trait object.
            pub fn boxed(#field: #element_ty, graph: #runtime::FramedGraph) -> Box<dyn #trait_name> {
                Box::new(Self::new(#field, graph))
            }
        }

        impl #runtime::FramedElement for #adapter {
            fn graph(&self) -> &#runtime::FramedGraph {
                &self.graph
            }
        }

        impl #framed_trait for #adapter {
            fn #field(&self) -> &#element_ty {
                &self.#field
            }
        }

        #trait_impls

        #identity
    };

    Ok(GeneratedAdapter {
        schema: schema.name.clone(),
        adapter: adapter.to_string(),
        file_name: adapter_file_name(&schema.name),
        kind: schema.kind,
        tokens,
        method_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, Severity};
    use crate::extract::collect_accessors;
    use crate::model::Catalog;
    use crate::test_utils::{PERSON_SCHEMA, catalog_from};

    fn generate(catalog: &Catalog, name: &str) -> (GeneratedAdapter, Diagnostics) {
        let runtime = quote!(::trellis);
        let cg = Codegen {
            catalog,
            runtime: &runtime,
        };
        let mut diagnostics = Diagnostics::new();
        let adapter = generate_adapter(cg, catalog.get(name).unwrap(), &mut diagnostics).unwrap();
        (adapter, diagnostics)
    }

    fn formatted(adapter: &GeneratedAdapter) -> String {
        let file: syn::File = syn::parse2(adapter.tokens.clone()).expect("adapter should parse");
        prettyplease::unparse(&file)
    }

    #[test]
    fn person_adapter_structure() {
        let catalog = catalog_from(PERSON_SCHEMA);
        let (adapter, _) = generate(&catalog, "Person");
        let code = formatted(&adapter);

        assert_eq!(adapter.adapter, "PersonImpl");
        assert_eq!(adapter.file_name, "person_impl.rs");
        assert!(code.contains("pub struct PersonImpl"));
        assert!(code.contains("graph: ::trellis::FramedGraph"));
        assert!(code.contains("vertex: ::trellis::Vertex"));
        assert!(code.contains(r#"pub const LABEL: &'static str = "person";"#));
        assert!(code.contains("impl ::trellis::FramedElement for PersonImpl"));
        assert!(code.contains("impl ::trellis::FramedVertex for PersonImpl"));
        assert!(code.contains("impl Person for PersonImpl"));
        assert!(!code.contains("fn describe"));
    }

    #[test]
    fn edge_adapter_wraps_an_edge() {
        let catalog = catalog_from(PERSON_SCHEMA);
        let (adapter, diagnostics) = generate(&catalog, "Knows");
        let code = formatted(&adapter);

        assert_eq!(adapter.kind, EntityKind::Edge);
        assert!(code.contains("edge: ::trellis::Edge"));
        assert!(code.contains("impl ::trellis::FramedEdge for KnowsImpl"));
        assert!(code.contains(r#"pub const LABEL: &'static str = "knows";"#));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn method_count_matches_collected_accessors() {
        let catalog = catalog_from(PERSON_SCHEMA);
        for schema in &catalog {
            let (adapter, _) = generate(&catalog, &schema.name);
            assert_eq!(
                adapter.method_count,
                collect_accessors(&catalog, schema).len(),
                "{}",
                schema.name
            );
        }
    }

    #[test]
    fn inherited_accessors_get_their_own_impl_block() {
        let catalog = catalog_from(PERSON_SCHEMA);
        let (adapter, _) = generate(&catalog, "Employee");
        let code = formatted(&adapter);

        let employee = code.find("impl Employee for EmployeeImpl").unwrap();
        let person = code.find("impl Person for EmployeeImpl").unwrap();
        assert!(employee < person);
        assert!(code.contains("fn get_salary(&self) -> Option<f64>"));
        assert!(code.contains("fn get_age(&self) -> i32"));
        assert!(code.contains("Box<dyn Employee>"));
    }

    #[test]
    fn unsupported_accessors_are_reported_and_stubbed() {
        let catalog = catalog_from(PERSON_SCHEMA);
        let (adapter, diagnostics) = generate(&catalog, "Person");
        let code = formatted(&adapter);

        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, Some(DiagnosticCode::UnsupportedShape));
        assert_eq!(warnings[0].schema, "Person");
        assert!(code.contains("fn get_knows_person(&self, _: &dyn Person) -> bool"));
        assert!(code.contains("003: not yet supported"));
    }

    #[test]
    fn inferred_labels_are_noted() {
        let catalog = catalog_from(PERSON_SCHEMA);
        let (_, diagnostics) = generate(&catalog, "Person");
        let notes: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Note)
            .collect();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("`friend`"));
        assert!(notes[0].descriptor.starts_with("Person::get_friends"));
    }

    #[test]
    fn schema_issues_fail_the_type() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait Person: FramedVertex {
                #[linked_vertex(direction = Sideways)]
                fn get_friends(&self) -> Vec<Box<dyn Person>>;
            }

            #[vertex]
            pub trait Employee: Person {}
            "#,
        );
        let runtime = quote!(::trellis);
        let cg = Codegen {
            catalog: &catalog,
            runtime: &runtime,
        };
        let mut diagnostics = Diagnostics::new();
        for name in ["Person", "Employee"] {
            let err = generate_adapter(cg, catalog.get(name).unwrap(), &mut diagnostics).unwrap_err();
            assert!(matches!(
                err,
                GeneratorError::InvalidMarker { ref schema, ref method, .. }
                    if schema == "Person" && method == "get_friends"
            ));
        }
    }
}
