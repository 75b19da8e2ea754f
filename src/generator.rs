//! The generation pipeline, end to end for one message type.
//!
//! [`WrapperGenerator`] ties the stages together: catalog lookup (message type to
//! class), wire-order scan, memory-order enumeration, documentation lookup,
//! reconciliation, and source synthesis. One call generates one wrapper;
//! [`WrapperGenerator::generate_all`] fans the catalog out across a thread pool.
//!
//! Failure granularity is per message: a packet whose class is missing, whose
//! documentation table is absent, or whose binary is damaged yields an `Err` for
//! that entry of the batch and nothing else.

use rayon::prelude::*;

use crate::{
    docs::ProtocolDocs,
    message::{MessageCatalog, MessageType},
    provider::ClassSet,
    reconcile::Reconciler,
    scanner::WireScanner,
    synth::{wrapper_class_name, SourceSynthesizer},
    typemap::TypeMappingRegistry,
    Error, Result,
};

/// Knobs of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Internal-name prefix of the obfuscated server classes,
    /// e.g. `net/minecraft/server/v1_15_R1`
    pub server_package: String,
    /// Package the generated classes are emitted into
    pub output_package: String,
    /// Obfuscated name of the packet write method
    pub write_method: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            server_package: "net/minecraft/server".to_string(),
            output_package: "com.comphenix.packetwrapper".to_string(),
            write_method: "b".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Descriptor of the write method: one serializer argument, void return.
    #[must_use]
    pub fn write_descriptor(&self) -> String {
        format!("(L{}/PacketDataSerializer;)V", self.server_package)
    }

    /// Internal name of the common message base class.
    #[must_use]
    pub fn root_class(&self) -> String {
        format!("{}/Packet", self.server_package)
    }
}

/// One generated wrapper, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedWrapper {
    /// Simple name of the generated class (also the file stem)
    pub class_name: String,
    /// Complete source text
    pub source: String,
    /// Documented field count
    pub field_count: usize,
    /// Fields emitted as marker comments instead of accessors
    pub degraded: usize,
}

/// The assembled pipeline.
pub struct WrapperGenerator<'a> {
    classes: &'a ClassSet,
    docs: &'a ProtocolDocs,
    catalog: &'a MessageCatalog,
    registry: TypeMappingRegistry,
    synthesizer: SourceSynthesizer,
    write_method: String,
    write_descriptor: String,
}

impl<'a> WrapperGenerator<'a> {
    /// Assemble a generator with the standard accessor registry for the
    /// configured server package.
    #[must_use]
    pub fn new(
        classes: &'a ClassSet,
        docs: &'a ProtocolDocs,
        catalog: &'a MessageCatalog,
        config: &GeneratorConfig,
    ) -> Self {
        WrapperGenerator {
            classes,
            docs,
            catalog,
            registry: TypeMappingRegistry::standard(&config.server_package),
            synthesizer: SourceSynthesizer::new(&config.output_package),
            write_method: config.write_method.clone(),
            write_descriptor: config.write_descriptor(),
        }
    }

    /// Generate the wrapper for one message type.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] when the catalog has no class for the
    /// type or the class is not loaded, [`Error::DocsNotFound`] when the
    /// documentation has no table for it, and parse errors for damaged binaries.
    pub fn generate(&self, ty: &MessageType) -> Result<GeneratedWrapper> {
        let class_name = self
            .catalog
            .class_of(ty)
            .ok_or_else(|| Error::ClassNotFound(ty.to_string()))?
            .clone();

        let doc_fields = self.docs.fields(ty)?;

        let scanner = WireScanner::new(self.classes, &self.write_method, &self.write_descriptor);
        let wire = scanner.scan(&class_name)?;
        let memory = self.classes.memory_order(&class_name)?;

        let reconciler = Reconciler::new(&self.registry, self.classes);
        let reconciliation = reconciler.reconcile(doc_fields, &wire, &memory);

        if !reconciliation.extra_wire.is_empty() {
            log::warn!(
                "{ty}: write method emits {} more field(s) than the documentation lists",
                reconciliation.extra_wire.len()
            );
        }

        Ok(GeneratedWrapper {
            class_name: wrapper_class_name(ty),
            source: self.synthesizer.render(ty, &reconciliation),
            field_count: reconciliation.fields.len(),
            degraded: reconciliation.degraded_count(),
        })
    }

    /// Generate wrappers for every catalog entry, in parallel.
    ///
    /// Per-message failures are returned alongside the successes; the batch
    /// never aborts.
    #[must_use]
    pub fn generate_all(&self) -> Vec<(MessageType, Result<GeneratedWrapper>)> {
        self.catalog
            .entries()
            .par_iter()
            .map(|entry| (entry.ty.clone(), self.generate(&entry.ty)))
            .collect()
    }
}
