//! IR Methods

use super::instr::IrInstr;
use crate::symbols::{Symbol, Type};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct IrMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub is_constructor: bool,
    pub return_type: Type,
    /// Parameters in declaration order
    pub params: Vec<Symbol>,
    /// Declared locals in declaration order
    pub locals: Vec<Symbol>,
    /// Compiler temporaries in allocation order
    pub temps: Vec<Symbol>,
    pub body: Vec<IrInstr>,
    labels: FxHashMap<String, usize>,
}

impl IrMethod {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            is_static: false,
            is_constructor: false,
            return_type,
            params: Vec::new(),
            locals: Vec::new(),
            temps: Vec::new(),
            body: Vec::new(),
            labels: FxHashMap::default(),
        }
    }

    /// The no-argument constructor of `class`.
    pub fn constructor(class: impl Into<String>) -> Self {
        let mut method = Self::new(class, Type::void());
        method.is_constructor = true;
        method
    }

    pub fn is_main(&self) -> bool {
        self.name == "main" && self.is_static
    }

    /// Append an instruction, recording label positions.
    pub fn push(&mut self, instr: IrInstr) {
        if let IrInstr::Label(label) = &instr {
            self.labels.insert(label.clone(), self.body.len());
        }
        self.body.push(instr);
    }

    pub fn extend(&mut self, instrs: impl IntoIterator<Item = IrInstr>) {
        for instr in instrs {
            self.push(instr);
        }
    }

    /// Index of the instruction a label marks.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn ends_with_return(&self) -> bool {
        self.body.last().is_some_and(IrInstr::is_return)
    }

    /// Params, then locals, then temporaries: the frame's variable order.
    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.params
            .iter()
            .chain(self.locals.iter())
            .chain(self.temps.iter())
    }
}
