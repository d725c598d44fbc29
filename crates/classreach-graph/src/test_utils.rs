//! Test helpers that produce real class files and classpath layouts.
//!
//! Available in `cfg(test)` and behind the `test-utils` feature so that
//! downstream crates can drive the resolver against generated classpaths.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// Constant pool under construction, with de-duplication of utf8/class entries.
#[derive(Default)]
struct PoolBuilder {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolBuilder {
    fn new() -> Self {
        Self {
            next_index: 1,
            ..Self::default()
        }
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        self.bytes.push(1);
        self.bytes.extend((value.len() as u16).to_be_bytes());
        self.bytes.extend(value.as_bytes());
        let index = self.take_index(1);
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(index) = self.classes.get(name) {
            return *index;
        }
        let name_index = self.utf8(name);
        self.bytes.push(7);
        self.bytes.extend(name_index.to_be_bytes());
        let index = self.take_index(1);
        self.classes.insert(name.to_string(), index);
        index
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.bytes.push(12);
        self.bytes.extend(name_index.to_be_bytes());
        self.bytes.extend(descriptor_index.to_be_bytes());
        self.take_index(1)
    }

    fn method_type(&mut self, descriptor: &str) -> u16 {
        let descriptor_index = self.utf8(descriptor);
        self.bytes.push(16);
        self.bytes.extend(descriptor_index.to_be_bytes());
        self.take_index(1)
    }

    fn long(&mut self, value: i64) -> u16 {
        self.bytes.push(5);
        self.bytes.extend(value.to_be_bytes());
        self.take_index(2)
    }

    fn take_index(&mut self, width: u16) -> u16 {
        let index = self.next_index;
        self.next_index += width;
        index
    }
}

/// Annotation payload for generated class files.
#[derive(Debug, Clone)]
pub struct Annotation {
    type_descriptor: String,
    elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    pub fn new(type_descriptor: &str) -> Self {
        Self {
            type_descriptor: type_descriptor.to_string(),
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, name: &str, value: ElementValue) -> Self {
        self.elements.push((name.to_string(), value));
        self
    }
}

/// Annotation element value, mirroring the `element_value` tags.
#[derive(Debug, Clone)]
pub enum ElementValue {
    String(String),
    Enum { type_descriptor: String, constant: String },
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

struct Member {
    name: String,
    descriptor: String,
    signature: Option<String>,
    throws: Vec<String>,
    locals: Vec<(String, String)>,
    annotation_default: Option<ElementValue>,
    parameter_annotations: Vec<Annotation>,
    invisible_annotations: Vec<Annotation>,
    local_type_annotations: Vec<Annotation>,
}

impl Member {
    fn new(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            throws: Vec::new(),
            locals: Vec::new(),
            annotation_default: None,
            parameter_annotations: Vec::new(),
            invisible_annotations: Vec::new(),
            local_type_annotations: Vec::new(),
        }
    }
}

/// Builder for minimal, structurally valid class files.
///
/// ```ignore
/// use classreach_graph::test_utils::ClassFileBuilder;
/// use classreach_graph::parse_class;
///
/// let bytes = ClassFileBuilder::new("com/example/A").reference("com/example/B").build();
/// let refs = parse_class(&bytes).unwrap();
/// assert!(refs.names.contains("com/example/B"));
/// ```
pub struct ClassFileBuilder {
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    class_constants: Vec<String>,
    name_and_types: Vec<(String, String)>,
    method_types: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    annotations: Vec<Annotation>,
    type_annotations: Vec<Annotation>,
    inner_classes: Vec<(String, Option<String>)>,
    enclosing_class: Option<String>,
    nest_host: Option<String>,
    nest_members: Vec<String>,
    permitted_subclasses: Vec<String>,
    record_components: Vec<(String, String, Option<String>)>,
}

impl ClassFileBuilder {
    /// Start a class with the given internal name, extending `java/lang/Object`.
    pub fn new(this_class: &str) -> Self {
        Self {
            this_class: this_class.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            class_constants: Vec::new(),
            name_and_types: Vec::new(),
            method_types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            type_annotations: Vec::new(),
            inner_classes: Vec::new(),
            enclosing_class: None,
            nest_host: None,
            nest_members: Vec::new(),
            permitted_subclasses: Vec::new(),
            record_components: Vec::new(),
        }
    }

    pub fn super_class(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    /// Add a raw `CONSTANT_Class` entry (e.g. an array encoding).
    pub fn class_constant(mut self, name: &str) -> Self {
        self.class_constants.push(name.to_string());
        self
    }

    /// Reference another class the way a method body would: through the constant pool.
    pub fn reference(self, internal_name: &str) -> Self {
        self.class_constant(internal_name)
    }

    /// Add a `CONSTANT_NameAndType` entry, as a field or method reference would.
    pub fn name_and_type(mut self, name: &str, descriptor: &str) -> Self {
        self.name_and_types.push((name.to_string(), descriptor.to_string()));
        self
    }

    /// Add a `CONSTANT_MethodType` entry, as an `invokedynamic` bootstrap would.
    pub fn method_type(mut self, descriptor: &str) -> Self {
        self.method_types.push(descriptor.to_string());
        self
    }

    /// Add an `InnerClasses` entry.
    pub fn inner_class(mut self, inner: &str, outer: Option<&str>) -> Self {
        self.inner_classes.push((inner.to_string(), outer.map(str::to_string)));
        self
    }

    /// Set the `EnclosingMethod` attribute's class.
    pub fn enclosing_method(mut self, class: &str) -> Self {
        self.enclosing_class = Some(class.to_string());
        self
    }

    pub fn nest_host(mut self, host: &str) -> Self {
        self.nest_host = Some(host.to_string());
        self
    }

    pub fn nest_member(mut self, member: &str) -> Self {
        self.nest_members.push(member.to_string());
        self
    }

    pub fn permitted_subclass(mut self, subclass: &str) -> Self {
        self.permitted_subclasses.push(subclass.to_string());
        self
    }

    /// Add a `Record` component, optionally with a generic `Signature`.
    pub fn record_component(mut self, name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        self.record_components
            .push((name.to_string(), descriptor.to_string(), signature.map(str::to_string)));
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push(Member::new(name, descriptor));
        self
    }

    /// Attach a `Signature` attribute to the last added field.
    pub fn field_signature(mut self, signature: &str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.signature = Some(signature.to_string());
        }
        self
    }

    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push(Member::new(name, descriptor));
        self
    }

    /// Attach a `Signature` attribute to the last added method.
    pub fn method_signature(mut self, signature: &str) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.signature = Some(signature.to_string());
        }
        self
    }

    /// Add a checked exception to the last added method.
    pub fn throws(mut self, exception: &str) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.throws.push(exception.to_string());
        }
        self
    }

    /// Add a local variable table entry to the last added method's `Code`.
    pub fn local_variable(mut self, name: &str, descriptor: &str) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.locals.push((name.to_string(), descriptor.to_string()));
        }
        self
    }

    /// Set the `AnnotationDefault` of the last added method.
    pub fn annotation_default(mut self, value: ElementValue) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.annotation_default = Some(value);
        }
        self
    }

    /// Annotate the first parameter of the last added method.
    pub fn parameter_annotation(mut self, annotation: Annotation) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.parameter_annotations.push(annotation);
        }
        self
    }

    /// Add a runtime-invisible annotation to the last added method.
    pub fn method_annotation(mut self, annotation: Annotation) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.invisible_annotations.push(annotation);
        }
        self
    }

    /// Add a type annotation on a local variable of the last added method's `Code`.
    pub fn local_type_annotation(mut self, annotation: Annotation) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.local_type_annotations.push(annotation);
        }
        self
    }

    /// Add a runtime-visible class annotation, optionally with a class literal `value`.
    pub fn class_annotation(self, type_descriptor: &str, class_literal: Option<&str>) -> Self {
        let annotation = match class_literal {
            Some(literal) => Annotation::new(type_descriptor)
                .element("value", ElementValue::Class(literal.to_string())),
            None => Annotation::new(type_descriptor),
        };
        self.annotation(annotation)
    }

    /// Add a runtime-visible class annotation.
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a type annotation on the superclass (`extends` clause).
    pub fn supertype_annotation(mut self, annotation: Annotation) -> Self {
        self.type_annotations.push(annotation);
        self
    }

    /// Emit the class file bytes (version 52, Java 8).
    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::new();
        let mut body = Vec::new();

        // Exercises the two-slot constant pool rule.
        pool.long(42);
        for constant in &self.class_constants {
            pool.class(constant);
        }
        for (name, descriptor) in &self.name_and_types {
            pool.name_and_type(name, descriptor);
        }
        for descriptor in &self.method_types {
            pool.method_type(descriptor);
        }

        push_u2(&mut body, 0x0021);
        push_u2(&mut body, pool.class(&self.this_class));
        push_u2(&mut body, self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0));

        push_u2(&mut body, self.interfaces.len() as u16);
        for interface in &self.interfaces {
            push_u2(&mut body, pool.class(interface));
        }

        push_u2(&mut body, self.fields.len() as u16);
        for field in &self.fields {
            write_member(&mut body, &mut pool, field, false);
        }

        push_u2(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            write_member(&mut body, &mut pool, method, true);
        }

        let mut attributes: Vec<(&str, Vec<u8>)> = Vec::new();
        if !self.annotations.is_empty() {
            attributes.push((
                "RuntimeVisibleAnnotations",
                annotations_payload(&mut pool, &self.annotations),
            ));
        }
        if !self.type_annotations.is_empty() {
            let mut payload = Vec::new();
            push_u2(&mut payload, self.type_annotations.len() as u16);
            for annotation in &self.type_annotations {
                payload.push(0x10); // supertype_target
                push_u2(&mut payload, 0xFFFF); // the superclass
                payload.push(0); // empty type_path
                write_annotation(&mut payload, &mut pool, annotation);
            }
            attributes.push(("RuntimeVisibleTypeAnnotations", payload));
        }
        if !self.inner_classes.is_empty() {
            let mut payload = Vec::new();
            push_u2(&mut payload, self.inner_classes.len() as u16);
            for (inner, outer) in &self.inner_classes {
                push_u2(&mut payload, pool.class(inner));
                push_u2(&mut payload, outer.as_deref().map(|o| pool.class(o)).unwrap_or(0));
                push_u2(&mut payload, 0); // anonymous
                push_u2(&mut payload, 0x0008);
            }
            attributes.push(("InnerClasses", payload));
        }
        if let Some(class) = &self.enclosing_class {
            let mut payload = Vec::new();
            push_u2(&mut payload, pool.class(class));
            push_u2(&mut payload, 0);
            attributes.push(("EnclosingMethod", payload));
        }
        if let Some(host) = &self.nest_host {
            let mut payload = Vec::new();
            push_u2(&mut payload, pool.class(host));
            attributes.push(("NestHost", payload));
        }
        if !self.nest_members.is_empty() {
            attributes.push(("NestMembers", class_list(&mut pool, &self.nest_members)));
        }
        if !self.permitted_subclasses.is_empty() {
            attributes.push((
                "PermittedSubclasses",
                class_list(&mut pool, &self.permitted_subclasses),
            ));
        }
        if !self.record_components.is_empty() {
            let mut payload = Vec::new();
            push_u2(&mut payload, self.record_components.len() as u16);
            for (name, descriptor, signature) in &self.record_components {
                push_u2(&mut payload, pool.utf8(name));
                push_u2(&mut payload, pool.utf8(descriptor));
                match signature {
                    Some(signature) => {
                        push_u2(&mut payload, 1);
                        let index = pool.utf8(signature);
                        write_attribute(&mut payload, &mut pool, "Signature", &index.to_be_bytes());
                    }
                    None => push_u2(&mut payload, 0),
                }
            }
            attributes.push(("Record", payload));
        }

        push_u2(&mut body, attributes.len() as u16);
        for (name, payload) in attributes {
            write_attribute(&mut body, &mut pool, name, &payload);
        }

        let mut out = Vec::new();
        out.extend(0xCAFEBABE_u32.to_be_bytes());
        push_u2(&mut out, 0);
        push_u2(&mut out, 52);
        push_u2(&mut out, pool.next_index);
        out.extend(&pool.bytes);
        out.extend(&body);
        out
    }
}

fn push_u2(out: &mut Vec<u8>, value: u16) {
    out.extend(value.to_be_bytes());
}

fn write_attribute(out: &mut Vec<u8>, pool: &mut PoolBuilder, name: &str, payload: &[u8]) {
    push_u2(out, pool.utf8(name));
    out.extend((payload.len() as u32).to_be_bytes());
    out.extend(payload);
}

fn class_list(pool: &mut PoolBuilder, names: &[String]) -> Vec<u8> {
    let mut payload = Vec::new();
    push_u2(&mut payload, names.len() as u16);
    for name in names {
        push_u2(&mut payload, pool.class(name));
    }
    payload
}

fn annotations_payload(pool: &mut PoolBuilder, annotations: &[Annotation]) -> Vec<u8> {
    let mut payload = Vec::new();
    push_u2(&mut payload, annotations.len() as u16);
    for annotation in annotations {
        write_annotation(&mut payload, pool, annotation);
    }
    payload
}

fn write_annotation(out: &mut Vec<u8>, pool: &mut PoolBuilder, annotation: &Annotation) {
    push_u2(out, pool.utf8(&annotation.type_descriptor));
    push_u2(out, annotation.elements.len() as u16);
    for (name, value) in &annotation.elements {
        push_u2(out, pool.utf8(name));
        write_element_value(out, pool, value);
    }
}

fn write_element_value(out: &mut Vec<u8>, pool: &mut PoolBuilder, value: &ElementValue) {
    match value {
        ElementValue::String(value) => {
            out.push(b's');
            push_u2(out, pool.utf8(value));
        }
        ElementValue::Enum {
            type_descriptor,
            constant,
        } => {
            out.push(b'e');
            push_u2(out, pool.utf8(type_descriptor));
            push_u2(out, pool.utf8(constant));
        }
        ElementValue::Class(descriptor) => {
            out.push(b'c');
            push_u2(out, pool.utf8(descriptor));
        }
        ElementValue::Annotation(annotation) => {
            out.push(b'@');
            write_annotation(out, pool, annotation);
        }
        ElementValue::Array(values) => {
            out.push(b'[');
            push_u2(out, values.len() as u16);
            for value in values {
                write_element_value(out, pool, value);
            }
        }
    }
}

fn write_member(out: &mut Vec<u8>, pool: &mut PoolBuilder, member: &Member, is_method: bool) {
    push_u2(out, 0x0001);
    push_u2(out, pool.utf8(&member.name));
    push_u2(out, pool.utf8(&member.descriptor));

    let mut attributes: Vec<(&str, Vec<u8>)> = Vec::new();
    if let Some(signature) = &member.signature {
        let mut payload = Vec::new();
        push_u2(&mut payload, pool.utf8(signature));
        attributes.push(("Signature", payload));
    }
    if is_method && !member.throws.is_empty() {
        let mut payload = Vec::new();
        push_u2(&mut payload, member.throws.len() as u16);
        for exception in &member.throws {
            push_u2(&mut payload, pool.class(exception));
        }
        attributes.push(("Exceptions", payload));
    }
    if let Some(value) = &member.annotation_default {
        let mut payload = Vec::new();
        write_element_value(&mut payload, pool, value);
        attributes.push(("AnnotationDefault", payload));
    }
    if !member.invisible_annotations.is_empty() {
        attributes.push((
            "RuntimeInvisibleAnnotations",
            annotations_payload(pool, &member.invisible_annotations),
        ));
    }
    if !member.parameter_annotations.is_empty() {
        let mut payload = vec![1]; // num_parameters
        payload.extend(annotations_payload(pool, &member.parameter_annotations));
        attributes.push(("RuntimeVisibleParameterAnnotations", payload));
    }
    if is_method && (!member.locals.is_empty() || !member.local_type_annotations.is_empty()) {
        let mut nested: Vec<(&str, Vec<u8>)> = Vec::new();
        if !member.locals.is_empty() {
            let mut table = Vec::new();
            push_u2(&mut table, member.locals.len() as u16);
            for (slot, (name, descriptor)) in member.locals.iter().enumerate() {
                push_u2(&mut table, 0);
                push_u2(&mut table, 1);
                push_u2(&mut table, pool.utf8(name));
                push_u2(&mut table, pool.utf8(descriptor));
                push_u2(&mut table, slot as u16);
            }
            nested.push(("LocalVariableTable", table));
        }
        if !member.local_type_annotations.is_empty() {
            let mut payload = Vec::new();
            push_u2(&mut payload, member.local_type_annotations.len() as u16);
            for annotation in &member.local_type_annotations {
                payload.push(0x40); // localvar_target
                push_u2(&mut payload, 1);
                push_u2(&mut payload, 0); // start_pc
                push_u2(&mut payload, 1); // length
                push_u2(&mut payload, 0); // index
                payload.extend([1, 3, 0]); // type_path: one type argument step
                write_annotation(&mut payload, pool, annotation);
            }
            nested.push(("RuntimeInvisibleTypeAnnotations", payload));
        }

        let mut code = Vec::new();
        push_u2(&mut code, 1); // max_stack
        push_u2(&mut code, member.locals.len().max(1) as u16); // max_locals
        code.extend(1_u32.to_be_bytes());
        code.push(0xB1); // return
        push_u2(&mut code, 0); // exception table
        push_u2(&mut code, nested.len() as u16);
        for (name, payload) in nested {
            write_attribute(&mut code, pool, name, &payload);
        }
        attributes.push(("Code", code));
    }

    push_u2(out, attributes.len() as u16);
    for (name, payload) in attributes {
        write_attribute(out, pool, name, &payload);
    }
}

/// Write `<root>/<internal>.class` referencing `references` and return its path.
pub fn write_class(root: &Path, internal_name: &str, references: &[&str]) -> PathBuf {
    let builder = references
        .iter()
        .fold(ClassFileBuilder::new(internal_name), |b, r| b.reference(r));
    write_class_bytes(root, internal_name, &builder.build())
}

/// Write pre-built class bytes under `root` at the path matching `internal_name`.
pub fn write_class_bytes(root: &Path, internal_name: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(format!("{internal_name}.class"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create class directory");
    }
    fs::write(&path, bytes).expect("write class file");
    path
}

/// Write a jar at `path` containing `(internal_name, references)` classes.
pub fn write_jar(path: &Path, classes: &[(&str, &[&str])]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create jar directory");
    }
    let file = fs::File::create(path).expect("create jar");
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    writer
        .start_file("META-INF/MANIFEST.MF", options)
        .expect("start manifest");
    writer
        .write_all(b"Manifest-Version: 1.0\n")
        .expect("write manifest");
    for (internal_name, references) in classes {
        let bytes = references
            .iter()
            .fold(ClassFileBuilder::new(internal_name), |b, r| b.reference(r))
            .build();
        writer
            .start_file(format!("{internal_name}.class"), options)
            .expect("start class entry");
        writer.write_all(&bytes).expect("write class entry");
    }
    writer.finish().expect("finish jar");
    path.to_path_buf()
}
