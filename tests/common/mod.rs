//! A small class-file writer for integration tests.
//!
//! Covers what the tests need: access flags, super class, interfaces, `Signature` attributes
//! and methods with raw `Code`.

#![allow(dead_code)]

use std::collections::HashMap;

use jvmscope::{
    metadata::loader::{BufferTypeLoader, CompositeTypeLoader, TypeLoader},
    Buffer,
};

#[derive(Default)]
struct Pool {
    entries: Vec<Vec<u8>>,
    lookup: HashMap<Vec<u8>, u16>,
}

impl Pool {
    fn intern(&mut self, entry: Vec<u8>) -> u16 {
        if let Some(index) = self.lookup.get(&entry) {
            return *index;
        }
        self.entries.push(entry.clone());
        let index = self.entries.len() as u16;
        self.lookup.insert(entry, index);
        index
    }

    fn utf8(&mut self, text: &str) -> u16 {
        let mut entry = vec![1];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.intern(entry)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        let mut entry = vec![7];
        entry.extend_from_slice(&name.to_be_bytes());
        self.intern(entry)
    }
}

struct Method {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    code: Option<Vec<u8>>,
}

pub struct ClassWriter {
    pool: Pool,
    name: String,
    access: u16,
    super_name: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    methods: Vec<Method>,
}

impl ClassWriter {
    pub fn new(name: &str) -> Self {
        ClassWriter {
            pool: Pool::default(),
            name: name.to_string(),
            access: 0x0021,
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            methods: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn super_class(mut self, name: &str) -> Self {
        self.super_name = Some(name.to_string());
        self
    }

    pub fn no_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(Method {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            code: None,
        });
        self
    }

    pub fn generic_method(mut self, access: u16, name: &str, descriptor: &str, signature: &str) -> Self {
        self.methods.push(Method {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: Some(signature.to_string()),
            code: None,
        });
        self
    }

    /// A static initializer that instantiates each of `classes` and returns.
    pub fn static_initializer(mut self, classes: &[&str]) -> Self {
        let mut code = Vec::new();
        for class in classes {
            let index = self.pool.class(class);
            code.push(0xBB);
            code.extend_from_slice(&index.to_be_bytes());
            code.push(0x57);
        }
        code.push(0xB1);

        self.methods.push(Method {
            access: 0x0008,
            name: "<clinit>".to_string(),
            descriptor: "()V".to_string(),
            signature: None,
            code: Some(code),
        });
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let this_class = self.pool.class(&self.name);
        let super_class = self
            .super_name
            .clone()
            .map_or(0, |name| self.pool.class(&name));
        let interfaces: Vec<u16> = self
            .interfaces
            .clone()
            .iter()
            .map(|name| self.pool.class(name))
            .collect();
        let signature_name = self.pool.utf8("Signature");
        let code_name = self.pool.utf8("Code");
        let class_signature = self.signature.clone().map(|text| self.pool.utf8(&text));

        let mut methods = Vec::new();
        for method in &self.methods {
            let name = self.pool.utf8(&method.name);
            let descriptor = self.pool.utf8(&method.descriptor);
            let signature = method.signature.as_deref().map(|text| self.pool.utf8(text));
            methods.push((method.access, name, descriptor, signature, method.code.clone()));
        }

        let mut out = Buffer::new();
        out.write_be(0xCAFE_BABEu32);
        out.write_be(0u16);
        out.write_be(52u16);
        out.write_be(self.pool.entries.len() as u16 + 1);
        for entry in &self.pool.entries {
            out.write_bytes(entry);
        }

        out.write_be(self.access);
        out.write_be(this_class);
        out.write_be(super_class);
        out.write_be(interfaces.len() as u16);
        for interface in interfaces {
            out.write_be(interface);
        }
        out.write_be(0u16);

        out.write_be(methods.len() as u16);
        for (access, name, descriptor, signature, code) in methods {
            out.write_be(access);
            out.write_be(name);
            out.write_be(descriptor);
            out.write_be(u16::from(signature.is_some()) + u16::from(code.is_some()));
            if let Some(signature) = signature {
                out.write_be(signature_name);
                out.write_be(2u32);
                out.write_be(signature);
            }
            if let Some(code) = code {
                out.write_be(code_name);
                out.write_be(12 + code.len() as u32);
                out.write_be(4u16);
                out.write_be(4u16);
                out.write_be(code.len() as u32);
                out.write_bytes(&code);
                out.write_be(0u16);
                out.write_be(0u16);
            }
        }

        match class_signature {
            Some(signature) => {
                out.write_be(1u16);
                out.write_be(signature_name);
                out.write_be(2u32);
                out.write_be(signature);
            }
            None => out.write_be(0u16),
        }

        out.into_inner()
    }
}

/// A loader chain serving `classes`.
pub fn loader(classes: Vec<Vec<u8>>) -> CompositeTypeLoader {
    CompositeTypeLoader::new(
        classes
            .into_iter()
            .map(|bytes| Box::new(BufferTypeLoader::new(bytes)) as Box<dyn TypeLoader>)
            .collect(),
    )
}

/// `java/lang/Object` plus the handful of library types the tests build on.
pub fn runtime_classes() -> Vec<Vec<u8>> {
    vec![
        ClassWriter::new("java/lang/Object").no_super().build(),
        ClassWriter::new("java/io/Serializable").access(0x0601).build(),
        ClassWriter::new("java/lang/Cloneable").access(0x0601).build(),
        ClassWriter::new("java/lang/Comparable")
            .access(0x0601)
            .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
            .build(),
        ClassWriter::new("java/lang/Number")
            .access(0x0421)
            .interface("java/io/Serializable")
            .build(),
        ClassWriter::new("java/lang/Integer")
            .access(0x0031)
            .super_class("java/lang/Number")
            .interface("java/lang/Comparable")
            .signature("Ljava/lang/Number;Ljava/lang/Comparable<Ljava/lang/Integer;>;")
            .build(),
        ClassWriter::new("java/lang/String")
            .access(0x0031)
            .interface("java/io/Serializable")
            .interface("java/lang/Comparable")
            .signature("Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Comparable<Ljava/lang/String;>;")
            .build(),
        ClassWriter::new("java/lang/Enum")
            .access(0x0421)
            .interface("java/lang/Comparable")
            .signature("<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;")
            .build(),
        ClassWriter::new("java/util/Collection")
            .access(0x0601)
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
            .build(),
        ClassWriter::new("java/util/List")
            .access(0x0601)
            .interface("java/util/Collection")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
            .build(),
        ClassWriter::new("java/util/ArrayList")
            .interface("java/util/List")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
            .build(),
    ]
}
