/*!
# jdt-treegen

Canonical tree generator for structural diffing of Java sources. Takes the
syntax tree produced by a JDT-style Java parser and turns it into an ordered,
labeled tree whose nodes are tagged with a fixed entity type taxonomy, the
input format of change-distilling diff engines.

## Architecture

```text
jdt-treegen
├── core        - Errors, source spans, line index
├── entity      - Entity type registry (taxonomy, legacy codes, classification)
├── native      - Native tree binding: kinds, roles, accessors, JSON loader
├── label       - Node label extraction
├── canonical   - Canonical tree arena and stack-based builder
├── convert     - Traversal driver with the reshaping rules
├── generator   - Single / batch (rayon) conversion facade
├── config      - TOML / YAML configuration
└── cli_common  - Logging setup and console output for the binary
```

## Usage

```rust,no_run
use jdt_treegen::{NativeTree, TreeGenerator};

let json = std::fs::read_to_string("Foo.native.json")?;
let tree = NativeTree::from_json(&json)?;
let canonical = TreeGenerator::default().generate(&tree)?;
println!("{}", canonical.to_tree_string(true));
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod canonical;
pub mod cli_common;
pub mod config;
pub mod convert;
pub mod core;
pub mod entity;
pub mod generator;
pub mod label;
pub mod native;

pub use canonical::{CanonicalTree, Node, NodeId, TreeBuilder};
pub use config::{OutputConfig, OutputFormat, ParallelConfig, TreeGenConfig};
pub use convert::{convert, Converter};
pub use crate::core::{LineColumn, LineIndex, Result, SourceSpan, TreeGenError, UNKNOWN_OFFSET};
pub use entity::{entity_type_of, number_of_types, registry_table, EntityType, RegistryEntry};
pub use generator::TreeGenerator;
pub use label::label_of;
pub use native::{
    walk, NativeAttrs, NativeDocument, NativeId, NativeKind, NativeNode, NativeTree, NativeTreeBuilder,
    NativeVisitor, Role, VisitControl,
};
