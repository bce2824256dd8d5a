//! Variable selection sets.
//!
//! A [`VariableSet`] is the ordered, deduplicated subset of the vocabulary
//! one compilation unit actually references. It drives both declaration
//! passes: defaults on the compiler side so the unit can compile, computed
//! values on the scanner side before matching runs. A compiled unit keeps one
//! set; every concurrent scan path takes its own clone so no selection state
//! is ever shared mutably.

use rustc_hash::FxHashSet;

use crate::context::ScanContext;
use crate::errors::{DeclareError, DefineError};
use crate::registry::{ScanTarget, VariableType};
use crate::traits::VariableDefiner;
use crate::valuers::ValuerTable;

/// Ordered, deduplicated selection of external variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    list: Vec<VariableType>,
}

impl VariableSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection from `vars`, deduplicated in first-occurrence order.
    pub fn with_variables(vars: &[VariableType]) -> Self {
        let mut set = Self::default();
        set.init(vars);
        set
    }

    /// Replace the selection with `vars`, silently dropping duplicates and
    /// preserving first-occurrence order. Calling again fully replaces the
    /// prior membership.
    pub fn init(&mut self, vars: &[VariableType]) {
        self.list.clear();
        let mut seen = FxHashSet::default();
        for &var in vars {
            if seen.insert(var) {
                self.list.push(var);
            }
        }
    }

    /// Like [`init`](Self::init), additionally dropping variables that are
    /// not meaningful for the given scan target.
    pub fn init_for(&mut self, target: ScanTarget, vars: &[VariableType]) {
        self.list.clear();
        let mut seen = FxHashSet::default();
        for &var in vars {
            if var.applies_to(target) && seen.insert(var) {
                self.list.push(var);
            }
        }
    }

    /// The selected variables, in order.
    pub fn variables(&self) -> &[VariableType] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Declare every member with its type default, in order. The engine
    /// requires each referenced external to exist before compilation; the
    /// actual values arrive at scan time. The first rejection aborts the
    /// pass — the caller must treat the whole operation as failed.
    pub fn declare_defaults(&self, definer: &mut dyn VariableDefiner) -> Result<(), DefineError> {
        for &var in &self.list {
            definer.define_variable(var.name(), var.default_value())?;
        }
        Ok(())
    }

    /// Declare every member with its computed value using the standard
    /// valuers. See [`declare_computed_with`](Self::declare_computed_with).
    pub fn declare_computed(
        &self,
        ctx: &ScanContext,
        definer: &mut dyn VariableDefiner,
    ) -> Result<(), DeclareError> {
        self.declare_computed_with(&ValuerTable::default(), ctx, definer)
    }

    /// Declare every member, in order, with its value computed against `ctx`.
    ///
    /// Every declared variable always ends up with a value: when a valuer
    /// reports absence or fails, the type default is declared in its place.
    /// A valuer failure is then routed through the context's value-error
    /// handler — the pass continues if the handler suppresses it and aborts
    /// with the handler's error otherwise (no handler installed means
    /// propagate). A rejection from the declaration interface itself aborts
    /// immediately, without the handler detour.
    pub fn declare_computed_with(
        &self,
        valuers: &ValuerTable,
        ctx: &ScanContext,
        definer: &mut dyn VariableDefiner,
    ) -> Result<(), DeclareError> {
        for &var in &self.list {
            match valuers.value(var, ctx) {
                Ok(Some(value)) => {
                    definer
                        .define_variable(var.name(), value)
                        .map_err(DeclareError::Define)?;
                }
                Ok(None) => {
                    definer
                        .define_variable(var.name(), var.default_value())
                        .map_err(DeclareError::Define)?;
                }
                Err(value_error) => {
                    tracing::debug!(
                        variable = var.name(),
                        error = %value_error,
                        "value computation failed, declaring type default"
                    );
                    if let Err(define_error) =
                        definer.define_variable(var.name(), var.default_value())
                    {
                        return Err(DeclareError::FallbackFailed {
                            name: var.name(),
                            value_error,
                            define_error,
                        });
                    }
                    ctx.handle_value_error(definer, var, value_error)
                        .map_err(DeclareError::Value)?;
                }
            }
        }
        Ok(())
    }
}
