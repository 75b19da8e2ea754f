//! Shared functionality which is used in unit- and integration-tests

/// Raw constant pool entries the builder can emit. Indices are 1-based.
enum PoolEntry {
    Utf8(String),
    Class(u16),
    NameAndType(u16, u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
}

struct RawField {
    access: u16,
    name: u16,
    descriptor: u16,
}

struct RawMethod {
    access: u16,
    name: u16,
    descriptor: u16,
    code: Option<RawCode>,
}

struct RawCode {
    code: Vec<u8>,
    lines: Vec<(u16, u16)>,
}

/// Assembles minimal but structurally valid class file binaries for tests.
///
/// Pool entries are interned, so `field_ref`/`method_ref` can be called up front
/// to obtain the operand indices a handwritten bytecode body needs.
pub struct ClassBuilder {
    pool: Vec<PoolEntry>,
    access: u16,
    this_class: u16,
    super_class: u16,
    fields: Vec<RawField>,
    methods: Vec<RawMethod>,
}

impl ClassBuilder {
    pub fn new(name: &str, super_name: &str) -> Self {
        let mut builder = ClassBuilder {
            pool: Vec::new(),
            access: 0x0021, // public super
            this_class: 0,
            super_class: 0,
            fields: Vec::new(),
            methods: Vec::new(),
        };
        builder.this_class = builder.class(name);
        builder.super_class = builder.class(super_name);
        builder
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        for (i, entry) in self.pool.iter().enumerate() {
            if let PoolEntry::Utf8(existing) = entry {
                if existing == text {
                    return (i + 1) as u16;
                }
            }
        }
        self.pool.push(PoolEntry::Utf8(text.to_string()));
        self.pool.len() as u16
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        for (i, entry) in self.pool.iter().enumerate() {
            if let PoolEntry::Class(existing) = entry {
                if *existing == name_index {
                    return (i + 1) as u16;
                }
            }
        }
        self.pool.push(PoolEntry::Class(name_index));
        self.pool.len() as u16
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.pool.push(PoolEntry::NameAndType(name_index, descriptor_index));
        self.pool.len() as u16
    }

    /// Intern a field reference; returns the pool index for a `getfield` operand.
    pub fn field_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat_index = self.name_and_type(name, descriptor);
        self.pool.push(PoolEntry::FieldRef(class_index, nat_index));
        self.pool.len() as u16
    }

    /// Intern a method reference; returns the pool index for an `invokespecial` operand.
    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat_index = self.name_and_type(name, descriptor);
        self.pool.push(PoolEntry::MethodRef(class_index, nat_index));
        self.pool.len() as u16
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.fields.push(RawField {
            access: 0x0002, // private
            name,
            descriptor,
        });
        self
    }

    pub fn static_field(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.fields.push(RawField {
            access: 0x000A, // private static
            name,
            descriptor,
        });
        self
    }

    /// Add a method with a `Code` attribute carrying `code` and a line number
    /// table mapping each `(start_pc, line)` pair.
    pub fn method(mut self, name: &str, descriptor: &str, code: &[u8], lines: &[(u16, u16)]) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.methods.push(RawMethod {
            access: 0x0001, // public
            name,
            descriptor,
            code: Some(RawCode {
                code: code.to_vec(),
                lines: lines.to_vec(),
            }),
        });
        self
    }

    /// Add a method without a `Code` attribute (abstract shape).
    pub fn abstract_method(mut self, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.methods.push(RawMethod {
            access: 0x0401, // public abstract
            name,
            descriptor,
            code: None,
        });
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        // Attribute names must be interned before the pool is serialized
        let code_name = self.utf8("Code");
        let lnt_name = self.utf8("LineNumberTable");

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&52u16.to_be_bytes()); // major (Java 8)

        out.extend_from_slice(&((self.pool.len() + 1) as u16).to_be_bytes());
        for entry in &self.pool {
            match entry {
                PoolEntry::Utf8(text) => {
                    out.push(1);
                    out.extend_from_slice(&(text.len() as u16).to_be_bytes());
                    out.extend_from_slice(text.as_bytes());
                }
                PoolEntry::Class(name) => {
                    out.push(7);
                    out.extend_from_slice(&name.to_be_bytes());
                }
                PoolEntry::NameAndType(name, descriptor) => {
                    out.push(12);
                    out.extend_from_slice(&name.to_be_bytes());
                    out.extend_from_slice(&descriptor.to_be_bytes());
                }
                PoolEntry::FieldRef(class, nat) => {
                    out.push(9);
                    out.extend_from_slice(&class.to_be_bytes());
                    out.extend_from_slice(&nat.to_be_bytes());
                }
                PoolEntry::MethodRef(class, nat) => {
                    out.push(10);
                    out.extend_from_slice(&class.to_be_bytes());
                    out.extend_from_slice(&nat.to_be_bytes());
                }
            }
        }

        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // interfaces

        out.extend_from_slice(&(self.fields.len() as u16).to_be_bytes());
        for field in &self.fields {
            out.extend_from_slice(&field.access.to_be_bytes());
            out.extend_from_slice(&field.name.to_be_bytes());
            out.extend_from_slice(&field.descriptor.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // attributes
        }

        out.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for method in &self.methods {
            out.extend_from_slice(&method.access.to_be_bytes());
            out.extend_from_slice(&method.name.to_be_bytes());
            out.extend_from_slice(&method.descriptor.to_be_bytes());

            match &method.code {
                Some(body) => {
                    out.extend_from_slice(&1u16.to_be_bytes());
                    out.extend_from_slice(&code_name.to_be_bytes());

                    let lnt_len = 2 + body.lines.len() * 4;
                    let attr_len = 2 + 2 + 4 + body.code.len() + 2 + 2 + 2 + 4 + lnt_len;
                    out.extend_from_slice(&(attr_len as u32).to_be_bytes());

                    out.extend_from_slice(&8u16.to_be_bytes()); // max_stack
                    out.extend_from_slice(&8u16.to_be_bytes()); // max_locals
                    out.extend_from_slice(&(body.code.len() as u32).to_be_bytes());
                    out.extend_from_slice(&body.code);
                    out.extend_from_slice(&0u16.to_be_bytes()); // exception table
                    out.extend_from_slice(&1u16.to_be_bytes()); // one nested attribute
                    out.extend_from_slice(&lnt_name.to_be_bytes());
                    out.extend_from_slice(&(lnt_len as u32).to_be_bytes());
                    out.extend_from_slice(&(body.lines.len() as u16).to_be_bytes());
                    for (pc, line) in &body.lines {
                        out.extend_from_slice(&pc.to_be_bytes());
                        out.extend_from_slice(&line.to_be_bytes());
                    }
                }
                None => out.extend_from_slice(&0u16.to_be_bytes()),
            }
        }

        out.extend_from_slice(&0u16.to_be_bytes()); // class attributes
        out
    }
}

/// Assembles a write-method body in the shape the compiler emits: per source
/// line, `aload_0; getfield; ...` with an optional leading `invokespecial`
/// super call. Tracks bytecode offsets to produce a consistent line table.
pub struct WriteMethodBuilder {
    code: Vec<u8>,
    lines: Vec<(u16, u16)>,
    next_line: u16,
}

impl WriteMethodBuilder {
    pub fn new() -> Self {
        WriteMethodBuilder {
            code: Vec::new(),
            lines: Vec::new(),
            next_line: 100,
        }
    }

    fn begin_line(&mut self) {
        self.lines.push((self.code.len() as u16, self.next_line));
        self.next_line += 1;
    }

    /// One statement line that reads a field: `aload_1; aload_0; getfield #ref; pop`.
    pub fn write_field(mut self, field_ref: u16) -> Self {
        self.begin_line();
        self.code.push(0x2B); // aload_1
        self.code.push(0x2A); // aload_0
        self.code.push(0xB4); // getfield
        self.code.extend_from_slice(&field_ref.to_be_bytes());
        self.code.push(0x57); // pop
        self
    }

    /// One statement line reading two fields; only the first may count.
    pub fn write_two_fields(mut self, first: u16, second: u16) -> Self {
        self.begin_line();
        self.code.push(0x2A); // aload_0
        self.code.push(0xB4);
        self.code.extend_from_slice(&first.to_be_bytes());
        self.code.push(0x2A);
        self.code.push(0xB4);
        self.code.extend_from_slice(&second.to_be_bytes());
        self.code.push(0x58); // pop2
        self
    }

    /// A `super.write(serializer)` call line: `aload_0; aload_1; invokespecial #ref`.
    pub fn super_call(mut self, method_ref: u16) -> Self {
        self.begin_line();
        self.code.push(0x2A); // aload_0
        self.code.push(0x2B); // aload_1
        self.code.push(0xB7); // invokespecial
        self.code.extend_from_slice(&method_ref.to_be_bytes());
        self
    }

    /// Terminate with `return` on its own line.
    pub fn finish(mut self) -> (Vec<u8>, Vec<(u16, u16)>) {
        self.begin_line();
        self.code.push(0xB1); // return
        (self.code, self.lines)
    }
}
