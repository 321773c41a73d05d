use darling::{ast, FromDeriveInput, FromField, FromMeta};
use proc_macro2::{Span, TokenStream};
use syn::{
    ext::IdentExt, parse_quote, spanned::Spanned, Attribute, DeriveInput, Error, GenericArgument, Ident,
    LitStr, Path, PathArguments, Result, Type,
};

#[derive(FromDeriveInput)]
#[darling(attributes(tracked), supports(struct_named), forward_attrs(serde))]
struct TrackedAttrs {
    ident: Ident,
    generics: syn::Generics,
    data: ast::Data<(), FieldAttrs>,
    attrs: Vec<Attribute>,
    #[darling(default)]
    crates: Crates,
    kind: Option<String>,
    #[darling(default)]
    group: String,
    version: Option<String>,
    plural: Option<String>,
    #[darling(default)]
    namespaced: bool,
    list_item: Option<ListItem>,
}

#[derive(FromMeta)]
struct ListItem {
    kind: String,
    version: String,
}

#[derive(FromField)]
#[darling(attributes(tracked), forward_attrs(serde, doc))]
struct FieldAttrs {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
    #[darling(default)]
    object: bool,
    merge_key: Option<String>,
    #[darling(default)]
    merge: bool,
    #[darling(default)]
    retain_keys: bool,
    #[darling(default)]
    required: bool,
}

#[derive(Debug, FromMeta)]
struct Crates {
    #[darling(default = "Self::default_kubemodel_core")]
    kubemodel_core: Path,
}

// Default is required when the subattribute isn't mentioned at all
// Delegate to darling rather than deriving, so that we can piggyback off the `#[darling(default)]` clauses
impl Default for Crates {
    fn default() -> Self {
        Self::from_list(&[]).unwrap()
    }
}

impl Crates {
    fn default_kubemodel_core() -> Path {
        parse_quote! { ::kubemodel::core } // by default must work well with people using facade crate
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Scalar,
    Object,
    List,
    Map,
}

impl Shape {
    fn ident(self) -> Ident {
        let name = match self {
            Shape::Scalar => "Scalar",
            Shape::Object => "Object",
            Shape::List => "List",
            Shape::Map => "Map",
        };
        Ident::new(name, Span::call_site())
    }
}

/// A classified field of the input struct
struct Field {
    ident: Ident,
    /// identifier without the `r#` prefix, used to build method names
    name: String,
    ty: Type,
    wire_name: String,
    shape: Shape,
    optional: bool,
    /// `T` in `Option<T>`, `TrackedList<T>` or `TrackedMap<T>`, otherwise the field type
    inner: Type,
    docs: Vec<Attribute>,
    object: bool,
    merge_key: Option<String>,
    merge: bool,
    retain_keys: bool,
    required: bool,
}

pub(crate) fn derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse2(input) {
        Err(err) => return err.to_compile_error(),
        Ok(di) => di,
    };
    let attrs = match TrackedAttrs::from_derive_input(&ast) {
        Err(err) => return err.write_errors(),
        Ok(attrs) => attrs,
    };
    match expand(attrs) {
        Err(err) => err.to_compile_error(),
        Ok(tokens) => tokens,
    }
}

fn expand(attrs: TrackedAttrs) -> Result<TokenStream> {
    let TrackedAttrs {
        ident,
        generics,
        data,
        attrs: serde_attrs,
        crates: Crates {
            kubemodel_core: core,
        },
        kind,
        group,
        version,
        plural,
        namespaced,
        list_item,
    } = attrs;

    if !generics.params.is_empty() {
        return Err(Error::new(
            generics.span(),
            "#[derive(Tracked)] does not support generic types",
        ));
    }
    let rename_all = container_rename_all(&serde_attrs)?;
    let camel = match rename_all.as_deref() {
        None => false,
        Some("camelCase") => true,
        Some(other) => {
            return Err(Error::new(
                ident.span(),
                format!("#[derive(Tracked)] supports rename_all = \"camelCase\" only, found {other:?}"),
            ))
        }
    };

    let fields = match data {
        ast::Data::Struct(fields) => fields.fields,
        ast::Data::Enum(_) => return Err(Error::new(ident.span(), "#[derive(Tracked)] only supports structs")),
    };

    let mut tracking: Option<Ident> = None;
    let mut model = Vec::new();
    for field in fields {
        let Some(field_ident) = field.ident.clone() else {
            continue;
        };
        if last_segment(&field.ty).is_some_and(|s| s.ident == "ModificationSet") {
            if tracking.is_some() {
                return Err(Error::new(field_ident.span(), "only one ModificationSet field is allowed"));
            }
            if !has_serde_flag(&field.attrs, "skip")? {
                return Err(Error::new(
                    field_ident.span(),
                    "the ModificationSet field must be marked #[serde(skip)]",
                ));
            }
            tracking = Some(field_ident);
            continue;
        }
        model.push(classify(field, field_ident, camel)?);
    }
    let Some(mods) = tracking else {
        return Err(Error::new(
            ident.span(),
            "#[derive(Tracked)] needs a field of type ModificationSet",
        ));
    };

    let type_name = ident.to_string();

    let resource = match &kind {
        Some(kind) => {
            let Some(version) = &version else {
                return Err(Error::new(ident.span(), "#[tracked(kind = ..)] requires a version"));
            };
            let plural = plural.clone().unwrap_or_else(|| to_plural(&kind.to_ascii_lowercase()));
            Some(ResourceInfo {
                api_version: if group.is_empty() {
                    version.clone()
                } else {
                    format!("{group}/{version}")
                },
                kind: kind.clone(),
                group: group.clone(),
                version: version.clone(),
                plural,
                namespaced,
            })
        }
        None => None,
    };

    let schema_resource = match &resource {
        Some(r) => {
            let ResourceInfo {
                group,
                version,
                kind,
                plural,
                namespaced,
                ..
            } = r;
            quote! {
                Some(#core::schema::ResourceKind {
                    group: #group,
                    version: #version,
                    kind: #kind,
                    plural: #plural,
                    namespaced: #namespaced,
                })
            }
        }
        None => quote! { None },
    };
    let schema_list_item = match &list_item {
        Some(ListItem { kind, version }) => quote! {
            Some(#core::schema::ListItemKind { kind: #kind, version: #version })
        },
        None => quote! { None },
    };
    let field_schemas = model.iter().map(|f| field_schema(&core, f));

    let accessors = model.iter().map(|f| accessors(&mods, f));

    let defaults = model.iter().map(|f| {
        let ident = &f.ident;
        let preset = resource.as_ref().and_then(|r| match f.wire_name.as_str() {
            "apiVersion" => Some(r.api_version.clone()),
            "kind" => Some(r.kind.clone()),
            _ => None,
        });
        match preset {
            Some(value) => quote! { #ident: ::std::string::String::from(#value) },
            None => quote! { #ident: ::std::default::Default::default() },
        }
    });

    let eq = model.iter().map(|f| {
        let ident = &f.ident;
        quote! { && self.#ident == other.#ident }
    });

    let changed = model.iter().filter(|f| matches!(f.shape, Shape::List | Shape::Map)).map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        quote! { #wire => self.#ident.is_changed(), }
    });

    let dirty = model.iter().filter_map(|f| {
        let ident = &f.ident;
        match (f.shape, f.object, f.optional) {
            (Shape::List | Shape::Map, true, _) => {
                Some(quote! { || self.#ident.is_changed() || self.#ident.any_dirty() })
            }
            (Shape::List | Shape::Map, false, _) => Some(quote! { || self.#ident.is_changed() }),
            (Shape::Object, _, true) => Some(quote! {
                || self.#ident.as_ref().is_some_and(|o| #core::tracking::Tracked::is_dirty(o))
            }),
            (Shape::Object, _, false) => Some(quote! { || #core::tracking::Tracked::is_dirty(&self.#ident) }),
            (Shape::Scalar, _, _) => None,
        }
    });

    let getters = model.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        quote! { #wire => #core::tracking::to_value(&self.#ident), }
    });

    let setters = model.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        let ty = &f.ty;
        match f.shape {
            Shape::List => quote! {
                #wire => {
                    let items: #ty = #core::tracking::from_value(value)?;
                    self.#ident.assign(items.into_vec());
                }
            },
            Shape::Map => quote! {
                #wire => {
                    let entries: #ty = #core::tracking::from_value(value)?;
                    self.#ident.assign(entries.into_inner());
                }
            },
            Shape::Scalar | Shape::Object => quote! {
                #wire => {
                    self.#ident = #core::tracking::from_value(value)?;
                }
            },
        }
    });

    let views = model.iter().map(|f| {
        let ident = &f.ident;
        let wire = &f.wire_name;
        let view = match (f.shape, f.object, f.optional) {
            (Shape::Scalar, _, _) => quote! {
                #core::tracking::FieldRef::Scalar(#core::tracking::to_value(&self.#ident)?)
            },
            (Shape::Object, _, true) => quote! {
                #core::tracking::FieldRef::Object(
                    self.#ident.as_ref().map(|o| o as &dyn #core::tracking::Tracked)
                )
            },
            (Shape::Object, _, false) => quote! {
                #core::tracking::FieldRef::Object(Some(&self.#ident as &dyn #core::tracking::Tracked))
            },
            (Shape::List, true, _) => quote! { #core::tracking::FieldRef::List(self.#ident.object_ref()) },
            (Shape::List, false, _) => quote! { #core::tracking::FieldRef::List(self.#ident.field_ref()?) },
            (Shape::Map, true, _) => quote! { #core::tracking::FieldRef::Map(self.#ident.object_ref()) },
            (Shape::Map, false, _) => quote! { #core::tracking::FieldRef::Map(self.#ident.field_ref()?) },
        };
        quote! { #wire => Ok(#view), }
    });

    let resource_impl = match &resource {
        Some(r) => {
            if !model.iter().any(|f| f.ident == "metadata") {
                return Err(Error::new(
                    ident.span(),
                    "#[tracked(kind = ..)] requires a `metadata: ObjectMeta` field",
                ));
            }
            let ResourceInfo {
                api_version,
                kind,
                group,
                version,
                plural,
                namespaced,
            } = r;
            quote! {
                impl #core::Resource for #ident {
                    const API_VERSION: &'static str = #api_version;
                    const GROUP: &'static str = #group;
                    const KIND: &'static str = #kind;
                    const NAMESPACED: bool = #namespaced;
                    const PLURAL: &'static str = #plural;
                    const VERSION: &'static str = #version;

                    fn meta(&self) -> &#core::metadata::ObjectMeta {
                        &self.metadata
                    }

                    fn meta_mut(&mut self) -> &mut #core::metadata::ObjectMeta {
                        &mut self.metadata
                    }
                }
            }
        }
        None => quote! {},
    };

    let schema_doc = format!("Static schema of `{type_name}`");
    Ok(quote! {
        #[automatically_derived]
        impl #ident {
            #[doc = #schema_doc]
            pub fn type_schema() -> &'static #core::schema::TypeSchema {
                static SCHEMA: #core::schema::TypeSchema = #core::schema::TypeSchema {
                    name: #type_name,
                    resource: #schema_resource,
                    list_item: #schema_list_item,
                    fields: &[#(#field_schemas),*],
                };
                &SCHEMA
            }

            #(#accessors)*
        }

        #[automatically_derived]
        impl ::std::default::Default for #ident {
            fn default() -> Self {
                Self {
                    #(#defaults,)*
                    #mods: #core::tracking::ModificationSet::new(),
                }
            }
        }

        #[automatically_derived]
        impl ::std::cmp::PartialEq for #ident {
            fn eq(&self, other: &Self) -> bool {
                true #(#eq)*
            }
        }

        #[automatically_derived]
        impl #core::tracking::Tracked for #ident {
            fn static_schema() -> &'static #core::schema::TypeSchema {
                Self::type_schema()
            }

            fn schema(&self) -> &'static #core::schema::TypeSchema {
                Self::type_schema()
            }

            fn modifications(&self) -> &#core::tracking::ModificationSet {
                &self.#mods
            }

            fn modifications_mut(&mut self) -> &mut #core::tracking::ModificationSet {
                &mut self.#mods
            }

            fn is_modified(&self, field: &str) -> #core::Result<bool> {
                let field = Self::type_schema().require(field)?;
                if self.#mods.contains(field.wire_name) {
                    return Ok(true);
                }
                #[allow(clippy::match_single_binding)]
                let changed = match field.wire_name {
                    #(#changed)*
                    _ => false,
                };
                Ok(changed)
            }

            fn is_dirty(&self) -> bool {
                !self.#mods.is_empty() #(#dirty)*
            }

            fn get(&self, field: &str) -> #core::Result<#core::tracking::Value> {
                let field = Self::type_schema().require(field)?;
                match field.wire_name {
                    #(#getters)*
                    _ => Err(#core::tracking::mismatch(Self::type_schema(), field.wire_name).into()),
                }
            }

            fn set(&mut self, field: &str, value: #core::tracking::Value) -> #core::Result<()> {
                let field = Self::type_schema().require(field)?;
                match field.wire_name {
                    #(#setters)*
                    _ => return Err(#core::tracking::mismatch(Self::type_schema(), field.wire_name).into()),
                }
                self.#mods.insert(field.wire_name);
                Ok(())
            }

            fn field(&self, field: &str) -> #core::Result<#core::tracking::FieldRef<'_>> {
                let field = Self::type_schema().require(field)?;
                match field.wire_name {
                    #(#views)*
                    _ => Err(#core::tracking::mismatch(Self::type_schema(), field.wire_name).into()),
                }
            }

            fn to_value(&self) -> #core::Result<#core::tracking::Value> {
                #core::tracking::to_value(self)
            }
        }

        #resource_impl
    })
}

struct ResourceInfo {
    api_version: String,
    kind: String,
    group: String,
    version: String,
    plural: String,
    namespaced: bool,
}

fn classify(field: FieldAttrs, ident: Ident, camel: bool) -> Result<Field> {
    let name = ident.unraw().to_string();
    let wire_name = match serde_rename(&field.attrs)? {
        Some(rename) => rename,
        None if camel => camel_case(&name),
        None => name.clone(),
    };

    let (shape, optional, inner) = if let Some(item) = generic_arg(&field.ty, "TrackedList") {
        (Shape::List, false, item.clone())
    } else if let Some(item) = generic_arg(&field.ty, "TrackedMap") {
        (Shape::Map, false, item.clone())
    } else if let Some(item) = generic_arg(&field.ty, "Option") {
        let shape = if field.object { Shape::Object } else { Shape::Scalar };
        (shape, true, item.clone())
    } else {
        let shape = if field.object { Shape::Object } else { Shape::Scalar };
        (shape, false, field.ty.clone())
    };

    if field.merge_key.is_some() && shape != Shape::List {
        return Err(Error::new(ident.span(), "merge_key is only valid on TrackedList fields"));
    }
    if field.merge && shape != Shape::List {
        return Err(Error::new(ident.span(), "merge is only valid on TrackedList fields"));
    }
    if field.required && !matches!(shape, Shape::List | Shape::Map) {
        return Err(Error::new(
            ident.span(),
            "required is only valid on TrackedList and TrackedMap fields",
        ));
    }

    let docs = field
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .cloned()
        .collect();

    Ok(Field {
        ident,
        name,
        ty: field.ty,
        wire_name,
        shape,
        optional,
        inner,
        docs,
        object: field.object,
        merge: field.merge || field.merge_key.is_some(),
        merge_key: field.merge_key,
        retain_keys: field.retain_keys,
        required: field.required,
    })
}

fn field_schema(core: &Path, f: &Field) -> TokenStream {
    let name = &f.name;
    let wire = &f.wire_name;
    let shape = f.shape.ident();
    let tracked = f.object;
    let merge = f.merge;
    let retain_keys = f.retain_keys;
    let required = f.required;
    let merge_key = match &f.merge_key {
        Some(key) => quote! { Some(#key) },
        None => quote! { None },
    };
    let inner = &f.inner;
    let item_schema = if f.object {
        quote! { Some(<#inner>::type_schema as fn() -> &'static #core::schema::TypeSchema) }
    } else {
        quote! { None }
    };
    quote! {
        #core::schema::FieldSchema {
            name: #name,
            wire_name: #wire,
            shape: #core::schema::FieldShape::#shape,
            tracked: #tracked,
            strategy: #core::schema::PatchStrategy { merge: #merge, retain_keys: #retain_keys },
            merge_key: #merge_key,
            required: #required,
            item_schema: #item_schema,
        }
    }
}

fn accessors(mods: &Ident, f: &Field) -> TokenStream {
    let ident = &f.ident;
    let wire = &f.wire_name;
    let inner = &f.inner;
    let ty = &f.ty;
    let setter = format_ident!("set_{}", f.name);
    let builder = format_ident!("with_{}", f.name);
    let clear = format_ident!("clear_{}", f.name);
    let mutator = format_ident!("{}_mut", f.name);
    let getter = format_ident!("{}", f.name);

    let getter_docs = if f.docs.is_empty() {
        let doc = format!("The `{wire}` field");
        vec![quote! { #[doc = #doc] }]
    } else {
        f.docs.iter().map(|d| quote! { #d }).collect()
    };

    let getter = match (f.optional, f.shape) {
        (true, _) if is_ident(inner, "String") => quote! {
            pub fn #getter(&self) -> Option<&str> {
                self.#ident.as_deref()
            }
        },
        (true, _) if is_copy_primitive(inner) => quote! {
            pub fn #getter(&self) -> Option<#inner> {
                self.#ident
            }
        },
        (true, _) => quote! {
            pub fn #getter(&self) -> Option<&#inner> {
                self.#ident.as_ref()
            }
        },
        (false, Shape::Scalar) if is_ident(ty, "String") => quote! {
            pub fn #getter(&self) -> &str {
                &self.#ident
            }
        },
        (false, Shape::Scalar) if is_copy_primitive(ty) => quote! {
            pub fn #getter(&self) -> #ty {
                self.#ident
            }
        },
        (false, _) => quote! {
            pub fn #getter(&self) -> &#ty {
                &self.#ident
            }
        },
    };

    let set_doc = format!("Set `{wire}` and mark it modified");
    let with_doc = format!("Builder form of [`Self::{setter}`]");
    let (setter_fn, builder_fn) = match f.shape {
        Shape::List => (
            quote! {
                #[doc = #set_doc]
                pub fn #setter<I>(&mut self, items: I)
                where
                    I: ::std::iter::IntoIterator,
                    I::Item: ::std::convert::Into<#inner>,
                {
                    self.#ident.assign(items.into_iter().map(::std::convert::Into::into));
                    self.#mods.insert(#wire);
                }
            },
            quote! {
                #[doc = #with_doc]
                #[must_use]
                pub fn #builder<I>(mut self, items: I) -> Self
                where
                    I: ::std::iter::IntoIterator,
                    I::Item: ::std::convert::Into<#inner>,
                {
                    self.#setter(items);
                    self
                }
            },
        ),
        Shape::Map => (
            quote! {
                #[doc = #set_doc]
                pub fn #setter<I, K, V>(&mut self, entries: I)
                where
                    I: ::std::iter::IntoIterator<Item = (K, V)>,
                    K: ::std::convert::Into<::std::string::String>,
                    V: ::std::convert::Into<#inner>,
                {
                    self.#ident.assign(entries.into_iter().map(|(k, v)| (k, v.into())));
                    self.#mods.insert(#wire);
                }
            },
            quote! {
                #[doc = #with_doc]
                #[must_use]
                pub fn #builder<I, K, V>(mut self, entries: I) -> Self
                where
                    I: ::std::iter::IntoIterator<Item = (K, V)>,
                    K: ::std::convert::Into<::std::string::String>,
                    V: ::std::convert::Into<#inner>,
                {
                    self.#setter(entries);
                    self
                }
            },
        ),
        Shape::Scalar | Shape::Object => {
            let store = if f.optional {
                quote! { self.#ident = Some(value.into()); }
            } else {
                quote! { self.#ident = value.into(); }
            };
            (
                quote! {
                    #[doc = #set_doc]
                    pub fn #setter(&mut self, value: impl ::std::convert::Into<#inner>) {
                        #store
                        self.#mods.insert(#wire);
                    }
                },
                quote! {
                    #[doc = #with_doc]
                    #[must_use]
                    pub fn #builder(mut self, value: impl ::std::convert::Into<#inner>) -> Self {
                        self.#setter(value);
                        self
                    }
                },
            )
        }
    };

    let clear_fn = if f.optional {
        let doc = format!("Set `{wire}` to null and mark it modified");
        quote! {
            #[doc = #doc]
            pub fn #clear(&mut self) {
                self.#ident = None;
                self.#mods.insert(#wire);
            }
        }
    } else {
        quote! {}
    };

    let mut_fn = match (f.shape, f.optional) {
        (Shape::Object, true) => {
            let doc = format!(
                "Mutable access to `{wire}`, creating it when unset\n\nCreating the value marks `{wire}` modified, edits to an existing value are tracked by the value itself."
            );
            quote! {
                #[doc = #doc]
                pub fn #mutator(&mut self) -> &mut #inner {
                    if self.#ident.is_none() {
                        self.#mods.insert(#wire);
                    }
                    self.#ident.get_or_insert_with(::std::default::Default::default)
                }
            }
        }
        (Shape::Object, false) | (Shape::List, _) | (Shape::Map, _) => {
            let doc = format!("Mutable access to `{wire}`\n\nChanges are tracked by the value itself.");
            quote! {
                #[doc = #doc]
                pub fn #mutator(&mut self) -> &mut #ty {
                    &mut self.#ident
                }
            }
        }
        (Shape::Scalar, _) => quote! {},
    };

    quote! {
        #(#getter_docs)*
        #getter

        #setter_fn
        #builder_fn
        #clear_fn
        #mut_fn
    }
}

fn container_rename_all(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename_all = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                rename_all = Some(value.value());
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(rename_all)
}

fn serde_rename(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }
    Ok(rename)
}

fn has_serde_flag(attrs: &[Attribute], flag: &str) -> Result<bool> {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag) && !meta.input.peek(syn::Token![=]) {
                found = true;
            }
            skip_meta(&meta)
        })?;
    }
    Ok(found)
}

// serde attributes we do not interpret still have to be consumed
fn skip_meta(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: TokenStream = content.parse()?;
    }
    Ok(())
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    }
}

fn generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let segment = last_segment(ty)?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_ident(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|s| s.ident == name && s.arguments.is_empty())
}

fn is_copy_primitive(ty: &Type) -> bool {
    const PRIMITIVES: &[&str] = &[
        "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
        "u128", "usize",
    ];
    PRIMITIVES.iter().any(|p| is_ident(ty, p))
}

/// serde's `rename_all = "camelCase"` for field names
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn to_plural(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else if let Some(stem) = word.strip_suffix('y').filter(|s| !s.ends_with(['a', 'e', 'i', 'o', 'u'])) {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}
