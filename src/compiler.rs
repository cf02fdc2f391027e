//! Compilation orchestrator
//!
//! Drives one run through its states: `Idle → Importing → Validating →
//! Emitting → WritingOutput → Done`, with `Failed` terminal from the
//! first two. `Validating` resolves every relationship and reference
//! target before any emitter runs, so no emitter ever observes a dangling
//! reference. Artifacts are buffered in memory and written last; a fatal
//! error never publishes partial output.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::CompilerConfig;
use crate::emit::{self, Artifact};
use crate::error::{CompileError, Result};
use crate::import::{self, Imported};
use crate::model::DomainModel;
use crate::report::{ArtifactInfo, CompileReport, WarningKind};

/// States of a compilation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileState {
    Idle,
    Importing,
    Validating,
    Emitting,
    WritingOutput,
    Done,
    Failed,
}

/// Where finished artifacts go.
///
/// Emitters are pure; the sink is the only write surface of a run. The
/// CLI uses [`DirectorySink`], tests use [`MemorySink`].
pub trait OutputSink {
    fn write(&mut self, artifact: &Artifact) -> std::io::Result<()>;
}

/// Writes each artifact as a file under a directory
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, artifact: &Artifact) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(artifact.file_name), &artifact.contents)
    }
}

/// Collects artifacts in memory (tests, dry runs)
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl OutputSink for MemorySink {
    fn write(&mut self, artifact: &Artifact) -> std::io::Result<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// The orchestrator for one compilation run
pub struct Compiler {
    state: CompileState,
    strict: bool,
    emit_validation: bool,
    emit_relational: bool,
    emit_interface: bool,
    emit_contract: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler with every backend enabled
    pub fn new() -> Self {
        Self {
            state: CompileState::Idle,
            strict: false,
            emit_validation: true,
            emit_relational: true,
            emit_interface: true,
            emit_contract: true,
        }
    }

    pub fn with_config(config: &CompilerConfig) -> Self {
        Self {
            state: CompileState::Idle,
            strict: config.import.strict,
            emit_validation: config.emit.validation,
            emit_relational: config.emit.relational,
            emit_interface: config.emit.interface,
            emit_contract: config.emit.contract,
        }
    }

    pub fn state(&self) -> CompileState {
        self.state
    }

    /// Run the full pipeline over a parsed source document.
    pub fn run(&mut self, doc: &Value, sink: &mut dyn OutputSink) -> Result<CompileReport> {
        self.transition(CompileState::Importing);
        let Imported { model, warnings } = match import::import(doc) {
            Ok(imported) => imported,
            Err(error) => return self.fail(error),
        };
        if self.strict {
            let skipped = warnings
                .iter()
                .filter(|w| w.kind == WarningKind::EntrySkipped)
                .count();
            if skipped > 0 {
                return self.fail(CompileError::StrictImport(skipped));
            }
        }
        info!(
            entities = model.entities.len(),
            operations = model.operations.len(),
            warnings = warnings.len(),
            "import finished"
        );

        self.transition(CompileState::Validating);
        if let Err(error) = validate(&model) {
            return self.fail(error);
        }

        self.transition(CompileState::Emitting);
        let artifacts: Vec<Artifact> = emit::backends()
            .iter()
            .filter(|backend| self.enabled(backend.name))
            .map(|backend| emit::render(&model, backend))
            .collect();

        self.transition(CompileState::WritingOutput);
        for artifact in &artifacts {
            if let Err(error) = sink.write(artifact) {
                return self.fail(error.into());
            }
            info!(
                file = artifact.file_name,
                bytes = artifact.contents.len(),
                "wrote artifact"
            );
        }

        self.transition(CompileState::Done);
        Ok(CompileReport {
            entities: model.entities.len(),
            operations: model.operations.len(),
            artifacts: artifacts
                .iter()
                .map(|a| ArtifactInfo {
                    backend: a.backend,
                    file_name: a.file_name,
                    bytes: a.contents.len(),
                    checksum: a.checksum.clone(),
                })
                .collect(),
            warnings,
        })
    }

    fn enabled(&self, backend: &str) -> bool {
        match backend {
            "validation" => self.emit_validation,
            "relational" => self.emit_relational,
            "interface" => self.emit_interface,
            "contract" => self.emit_contract,
            _ => true,
        }
    }

    fn transition(&mut self, next: CompileState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    fn fail<T>(&mut self, error: CompileError) -> Result<T> {
        debug!(from = ?self.state, "run failed");
        self.state = CompileState::Failed;
        Err(error)
    }
}

/// Resolve every relationship and reference target against the declared
/// entities. Runs after import, before any emitter.
pub fn validate(model: &DomainModel) -> Result<()> {
    for entity in &model.entities {
        for relationship in &entity.relationships {
            if !model.contains_entity(&relationship.target_entity) {
                return Err(CompileError::UnknownTarget {
                    entity: entity.name.clone(),
                    field: relationship.name.clone(),
                    target: relationship.target_entity.clone(),
                });
            }
        }
        for property in &entity.properties {
            if let Some(target) = property.ty.referenced_entity() {
                if !model.contains_entity(target) {
                    return Err(CompileError::UnknownTarget {
                        entity: entity.name.clone(),
                        field: property.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Compile a source document with the default configuration.
pub fn compile(doc: &Value, sink: &mut dyn OutputSink) -> Result<CompileReport> {
    Compiler::new().run(doc, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bookshop_doc() -> Value {
        json!({
            "entities": [{
                "name": "Book",
                "description": "A book in stock",
                "properties": [
                    { "name": "id", "type": "string", "required": true, "isKey": true },
                    { "name": "title", "type": "string", "required": true, "isKey": false }
                ],
                "rules": [],
                "relationships": []
            }],
            "operations": []
        })
    }

    #[test]
    fn test_successful_run_reaches_done() {
        let mut compiler = Compiler::new();
        let mut sink = MemorySink::default();
        let report = compiler.run(&bookshop_doc(), &mut sink).unwrap();
        assert_eq!(compiler.state(), CompileState::Done);
        assert_eq!(sink.artifacts.len(), 4);
        assert_eq!(report.artifacts.len(), 4);
        assert_eq!(report.entities, 1);
    }

    #[test]
    fn test_fatal_import_writes_nothing() {
        let mut compiler = Compiler::new();
        let mut sink = MemorySink::default();
        let doc = json!({ "info": {} });
        assert!(compiler.run(&doc, &mut sink).is_err());
        assert_eq!(compiler.state(), CompileState::Failed);
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn test_dangling_relationship_aborts_before_emitting() {
        let doc = json!({
            "entities": [{
                "name": "Order",
                "properties": [],
                "relationships": [
                    { "name": "items", "type": "toMany", "targetEntity": "Ghost" }
                ]
            }]
        });
        let mut compiler = Compiler::new();
        let mut sink = MemorySink::default();
        let error = compiler.run(&doc, &mut sink).unwrap_err();
        assert!(matches!(error, CompileError::UnknownTarget { .. }));
        assert_eq!(compiler.state(), CompileState::Failed);
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn test_strict_mode_promotes_skips() {
        let doc = json!({
            "entities": [
                { "name": "Book", "properties": [] },
                { "properties": [] }
            ]
        });
        let mut lenient = Compiler::new();
        let mut sink = MemorySink::default();
        assert!(lenient.run(&doc, &mut sink).is_ok());

        let mut config = CompilerConfig::default();
        config.import.strict = true;
        let mut strict = Compiler::with_config(&config);
        let mut sink = MemorySink::default();
        let error = strict.run(&doc, &mut sink).unwrap_err();
        assert!(matches!(error, CompileError::StrictImport(1)));
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn test_backend_selection() {
        let mut config = CompilerConfig::default();
        config.emit.contract = false;
        config.emit.relational = false;
        let mut compiler = Compiler::with_config(&config);
        let mut sink = MemorySink::default();
        compiler.run(&bookshop_doc(), &mut sink).unwrap();
        let names: Vec<&str> = sink.artifacts.iter().map(|a| a.backend).collect();
        assert_eq!(names, vec!["validation", "interface"]);
    }
}
