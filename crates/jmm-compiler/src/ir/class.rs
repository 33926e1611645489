//! IR Classes

use super::function::IrMethod;
use crate::symbols::{SymbolTable, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrField {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct IrClass {
    pub name: String,
    pub super_class: Option<String>,
    /// Qualified import names, dot separated
    pub imports: Vec<String>,
    pub fields: Vec<IrField>,
    /// Constructor first, then methods in declaration order
    pub methods: Vec<IrMethod>,
}

impl IrClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            imports: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Simple name -> slash-separated path, in import order.
    pub fn import_table(&self) -> Vec<(String, String)> {
        self.imports
            .iter()
            .map(|import| {
                (
                    SymbolTable::import_simple_name(import).to_string(),
                    import.replace('.', "/"),
                )
            })
            .collect()
    }

    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}
